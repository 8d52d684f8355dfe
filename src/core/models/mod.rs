mod acquisition;
mod encoded_payload;
mod pipeline_error;
mod pipeline_state;
mod reading;
mod recognition;
mod user_settings;

pub use acquisition::{AcquisitionMode, Capability, CapturedImage, PermissionStatus};
pub use encoded_payload::EncodedPayload;
pub use pipeline_error::PipelineError;
pub use pipeline_state::{FailureKind, PipelineFailure, PipelineOutcome, PipelineState};
pub use reading::ExtractedReading;
pub use recognition::{RecognitionRequest, RecognitionResponse, TextAnnotation};
pub use user_settings::{ExtractionStrategy, RecognizerKind, UserSettings};
