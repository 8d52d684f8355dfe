use async_trait::async_trait;

use crate::core::models::{EncodedPayload, PipelineError, RecognitionResponse};

#[async_trait]
pub trait RecognitionClient: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn recognize(&self, payload: &EncodedPayload) -> Result<RecognitionResponse, PipelineError>;
}
