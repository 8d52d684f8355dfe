use crate::core::models::{CapturedImage, EncodedPayload, PipelineError};

pub struct PayloadEncoder;

impl PayloadEncoder {
    pub async fn encode(image: &CapturedImage) -> Result<EncodedPayload, PipelineError> {
        log::debug!("[ENCODER] Reading image bytes from {:?}", image.uri);

        let raw_bytes = tokio::fs::read(&image.uri)
            .await
            .map_err(|source| PipelineError::io(&image.uri, source))?;

        let payload = EncodedPayload::build_from_bytes(&raw_bytes);

        if payload.format.is_none() {
            log::warn!(
                "[ENCODER] {:?} does not look like a known image format, sending it anyway",
                image.uri
            );
        }

        log::info!(
            "[ENCODER] Encoded {} bytes into {} base64 characters",
            payload.byte_length,
            payload.content.len()
        );

        Ok(payload)
    }
}
