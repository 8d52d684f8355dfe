use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::core::interfaces::adapters::RecognitionClient;
use crate::core::models::{EncodedPayload, PipelineError, RecognitionResponse, TextAnnotation};
use crate::global_constants;

const TSV_COLUMN_COUNT: usize = 12;
const TSV_WORD_LEVEL: &str = "5";

/// On-device recognizer backed by the `tesseract` executable.
///
/// The image is piped through stdin and word rows of the TSV output are
/// folded into the same annotation layout the remote service returns.
pub struct TesseractRecognitionClient {
    binary: PathBuf,
    language: String,
}

impl TesseractRecognitionClient {
    pub fn locate(language: &str) -> Result<Self> {
        log::info!("[TESSERACT] Initializing on-device recognizer");

        let binary = which::which(global_constants::TESSERACT_BINARY)
            .context(global_constants::MESSAGE_MISSING_TESSERACT)?;

        log::debug!("[TESSERACT] Using binary at {:?}", binary);
        Ok(Self::with_binary(binary, language))
    }

    pub fn with_binary(binary: PathBuf, language: &str) -> Self {
        Self {
            binary,
            language: language.to_string(),
        }
    }

    fn convert_tsv_to_response(tsv: &str) -> RecognitionResponse {
        let mut lines: Vec<Vec<String>> = Vec::new();
        let mut words: Vec<TextAnnotation> = Vec::new();
        let mut current_line_key: Option<(String, String, String)> = None;

        for row in tsv.lines().skip(1) {
            let columns: Vec<&str> = row.splitn(TSV_COLUMN_COUNT, '\t').collect();
            if columns.len() < TSV_COLUMN_COUNT || columns[0] != TSV_WORD_LEVEL {
                continue;
            }

            let text = columns[11].trim();
            if text.is_empty() {
                continue;
            }

            let line_key = (
                columns[2].to_string(),
                columns[3].to_string(),
                columns[4].to_string(),
            );
            if current_line_key.as_ref() != Some(&line_key) {
                lines.push(Vec::new());
                current_line_key = Some(line_key);
            }

            if let Some(line) = lines.last_mut() {
                line.push(text.to_string());
            }
            words.push(TextAnnotation::with_text(text));
        }

        if words.is_empty() {
            return RecognitionResponse::from_annotations(Vec::new());
        }

        let full_text = lines
            .iter()
            .map(|line| line.join(" "))
            .collect::<Vec<_>>()
            .join("\n");

        let mut annotations = Vec::with_capacity(words.len() + 1);
        annotations.push(TextAnnotation::with_text(full_text));
        annotations.extend(words);

        RecognitionResponse::from_annotations(annotations)
    }

    fn process_failure(message: String) -> PipelineError {
        PipelineError::Remote {
            status: None,
            message,
        }
    }
}

#[async_trait]
impl RecognitionClient for TesseractRecognitionClient {
    fn backend_name(&self) -> &'static str {
        "on-device"
    }

    async fn recognize(
        &self,
        payload: &EncodedPayload,
    ) -> Result<RecognitionResponse, PipelineError> {
        log::info!("[TESSERACT] Starting text extraction");

        let image_bytes = payload
            .decode_bytes()
            .map_err(|error| PipelineError::Parse(format!("payload is not base64: {}", error)))?;

        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", self.language.as_str(), "tsv"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| {
                Self::process_failure(format!("failed to start {:?}: {}", self.binary, error))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Self::process_failure("tesseract stdin unavailable".to_string()))?;

        let feed_image = async move {
            let result = stdin.write_all(&image_bytes).await;
            drop(stdin);
            result
        };

        let (write_result, output) = tokio::join!(feed_image, child.wait_with_output());

        let output = output.map_err(|error| {
            Self::process_failure(format!("tesseract did not finish: {}", error))
        })?;

        if !output.status.success() {
            return Err(Self::process_failure(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        if let Err(error) = write_result {
            log::warn!("[TESSERACT] Image was not fully written to stdin: {}", error);
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let response = Self::convert_tsv_to_response(&tsv);

        log::info!(
            "[TESSERACT] Text extraction complete. Found {} annotations",
            response.first_annotations().len()
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::FailureKind;

    const TSV_HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word_row(block: u32, line: u32, word: u32, text: &str) -> String {
        format!("5\t1\t{}\t1\t{}\t{}\t10\t10\t40\t20\t91.5\t{}", block, line, word, text)
    }

    #[test]
    fn test_convert_tsv_builds_full_text_then_words() {
        let tsv = [
            TSV_HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t".to_string(),
            "4\t1\t1\t1\t1\t0\t10\t10\t200\t20\t-1\t".to_string(),
            word_row(1, 1, 1, "SpO2"),
            word_row(1, 1, 2, "98"),
            word_row(1, 2, 1, "HR"),
            word_row(1, 2, 2, "72"),
        ]
        .join("\n");

        let response = TesseractRecognitionClient::convert_tsv_to_response(&tsv);
        let texts: Vec<&str> = response
            .first_annotations()
            .iter()
            .map(|annotation| annotation.description.as_str())
            .collect();

        assert_eq!(texts, vec!["SpO2 98\nHR 72", "SpO2", "98", "HR", "72"]);
    }

    #[test]
    fn test_convert_tsv_skips_blank_words() {
        let tsv = [
            TSV_HEADER.to_string(),
            word_row(1, 1, 1, " "),
            word_row(1, 1, 2, "98"),
        ]
        .join("\n");

        let response = TesseractRecognitionClient::convert_tsv_to_response(&tsv);

        assert_eq!(response.first_annotations().len(), 2);
        assert_eq!(response.first_annotations()[0].description, "98");
    }

    #[test]
    fn test_convert_tsv_without_words_yields_no_annotations() {
        let response = TesseractRecognitionClient::convert_tsv_to_response(TSV_HEADER);

        assert!(response.first_annotations().is_empty());
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported_as_remote_error() {
        let client = TesseractRecognitionClient::with_binary(
            PathBuf::from("/nonexistent/bin/tesseract"),
            "eng",
        );

        let error = client
            .recognize(&EncodedPayload::build_from_bytes(b"img"))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::RemoteError);
    }
}
