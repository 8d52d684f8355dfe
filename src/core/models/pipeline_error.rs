use std::path::PathBuf;

use thiserror::Error;

use super::acquisition::Capability;
use super::pipeline_state::FailureKind;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0} permission was not granted")]
    PermissionDenied(Capability),

    #[error("image selection was cancelled")]
    UserCancelled,

    #[error("pipeline run was cancelled")]
    Cancelled,

    #[error("a reading is already in progress")]
    Busy,

    #[error("could not read image at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network request failed: {0}")]
    Network(String),

    #[error("recognition backend failed: {message}")]
    Remote { status: Option<u16>, message: String },

    #[error("recognition response is not valid JSON: {0}")]
    Parse(String),

    #[error("unexpected annotation layout: {0}")]
    Shape(String),

    #[error("'{text}' at {field} is not an integer")]
    Format { field: String, text: String },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::PermissionDenied(_) => FailureKind::PermissionDenied,
            PipelineError::UserCancelled => FailureKind::UserCancelled,
            PipelineError::Cancelled => FailureKind::Cancelled,
            PipelineError::Busy => FailureKind::Busy,
            PipelineError::Io { .. } => FailureKind::IoError,
            PipelineError::Network(_) => FailureKind::NetworkError,
            PipelineError::Remote { .. } => FailureKind::RemoteError,
            PipelineError::Parse(_) => FailureKind::ParseError,
            PipelineError::Shape(_) => FailureKind::ShapeError,
            PipelineError::Format { .. } => FailureKind::FormatError,
        }
    }
}
