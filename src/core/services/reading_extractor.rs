use regex::Regex;

use crate::core::models::{
    ExtractedReading, ExtractionStrategy, PipelineError, RecognitionResponse, TextAnnotation,
};
use crate::global_constants::{
    FULL_TEXT_ANNOTATION_INDEX, HEART_RATE_ANNOTATION_INDEX, POSITIONAL_ANNOTATION_MINIMUM,
    SATURATION_ANNOTATION_INDEX,
};

/// Turns a recognition response into a reading.
///
/// `Positional` trusts the annotation order: full text at 0, saturation at 2,
/// heart rate at 4. `Labeled` looks for the token after a label such as
/// `SpO2` or `HR`, then falls back to `label: value` inside the full text.
pub struct ReadingExtractor {
    strategy: ExtractionStrategy,
    saturation_pattern: LabelPattern,
    heart_rate_pattern: LabelPattern,
}

struct LabelPattern {
    field_name: &'static str,
    label: String,
    token_regex: Regex,
    inline_regex: Regex,
}

impl LabelPattern {
    fn compile(field_name: &'static str, label: &str) -> anyhow::Result<Self> {
        let token_regex = Regex::new(&format!(r"(?i)^(?:{})\s*[:=]?$", label))?;
        let inline_regex = Regex::new(&format!(r"(?i)\b(?:{})\b\s*[:=]?\s*([+-]?\d+)", label))?;

        Ok(Self {
            field_name,
            label: label.to_string(),
            token_regex,
            inline_regex,
        })
    }

    fn locate(&self, tokens: &[TextAnnotation], full_text: &str) -> Result<i32, PipelineError> {
        let following_token = tokens
            .iter()
            .position(|token| self.token_regex.is_match(token.description.trim()))
            .and_then(|label_index| tokens.get(label_index + 1));

        match following_token {
            Some(token) => match parse_integer(&token.description, self.field_name) {
                Ok(value) => Ok(value),
                Err(error) => self.inline_value(full_text).unwrap_or(Err(error)),
            },
            None => self.inline_value(full_text).unwrap_or_else(|| {
                Err(PipelineError::Shape(format!(
                    "no {} value found after label '{}'",
                    self.field_name, self.label
                )))
            }),
        }
    }

    fn inline_value(&self, full_text: &str) -> Option<Result<i32, PipelineError>> {
        self.inline_regex
            .captures(full_text)
            .and_then(|captures| captures.get(1))
            .map(|value| parse_integer(value.as_str(), self.field_name))
    }
}

impl ReadingExtractor {
    pub fn build(
        strategy: ExtractionStrategy,
        saturation_label: &str,
        heart_rate_label: &str,
    ) -> anyhow::Result<Self> {
        log::debug!(
            "[EXTRACTOR] Building {} extractor, labels: saturation='{}' heart_rate='{}'",
            strategy,
            saturation_label,
            heart_rate_label
        );

        Ok(Self {
            strategy,
            saturation_pattern: LabelPattern::compile("saturation", saturation_label)?,
            heart_rate_pattern: LabelPattern::compile("heart rate", heart_rate_label)?,
        })
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    pub fn extract_reading(
        &self,
        response: &RecognitionResponse,
    ) -> Result<ExtractedReading, PipelineError> {
        match self.strategy {
            ExtractionStrategy::Positional => Self::extract(response),
            ExtractionStrategy::Labeled => self.extract_labeled(response),
        }
    }

    pub fn extract(response: &RecognitionResponse) -> Result<ExtractedReading, PipelineError> {
        let annotations = response.first_annotations();

        if annotations.len() < POSITIONAL_ANNOTATION_MINIMUM {
            return Err(PipelineError::Shape(format!(
                "expected at least {} annotations, found {}",
                POSITIONAL_ANNOTATION_MINIMUM,
                annotations.len()
            )));
        }

        let saturation = parse_integer(
            &annotations[SATURATION_ANNOTATION_INDEX].description,
            "annotation 2",
        )?;
        let heart_rate = parse_integer(
            &annotations[HEART_RATE_ANNOTATION_INDEX].description,
            "annotation 4",
        )?;

        Ok(ExtractedReading {
            all: annotations[FULL_TEXT_ANNOTATION_INDEX].description.clone(),
            saturation,
            heart_rate,
        })
    }

    pub fn extract_labeled(
        &self,
        response: &RecognitionResponse,
    ) -> Result<ExtractedReading, PipelineError> {
        let annotations = response.first_annotations();

        let (full_text, tokens) = annotations
            .split_first()
            .ok_or_else(|| PipelineError::Shape("response has no annotations".to_string()))?;

        let saturation = self
            .saturation_pattern
            .locate(tokens, &full_text.description)?;
        let heart_rate = self
            .heart_rate_pattern
            .locate(tokens, &full_text.description)?;

        Ok(ExtractedReading {
            all: full_text.description.clone(),
            saturation,
            heart_rate,
        })
    }
}

fn parse_integer(text: &str, field_name: &str) -> Result<i32, PipelineError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| PipelineError::Format {
            field: field_name.to_string(),
            text: text.to_string(),
        })
}
