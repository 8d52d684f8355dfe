use async_trait::async_trait;

use crate::core::models::{CapturedImage, PipelineError};

#[async_trait]
pub trait AcquisitionSource: Send + Sync {
    /// Returns `None` when the user backs out without choosing an image.
    async fn launch(&self) -> Result<Option<CapturedImage>, PipelineError>;
}
