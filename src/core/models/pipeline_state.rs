use std::fmt;

use super::acquisition::CapturedImage;
use super::reading::ExtractedReading;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    PermissionDenied,
    UserCancelled,
    Cancelled,
    Busy,
    IoError,
    NetworkError,
    RemoteError,
    ParseError,
    ShapeError,
    FormatError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::PermissionDenied => "permission denied",
            FailureKind::UserCancelled => "cancelled by user",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Busy => "busy",
            FailureKind::IoError => "io error",
            FailureKind::NetworkError => "network error",
            FailureKind::RemoteError => "remote error",
            FailureKind::ParseError => "parse error",
            FailureKind::ShapeError => "shape error",
            FailureKind::FormatError => "format error",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutcome {
    pub reading: ExtractedReading,
    pub image: CapturedImage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// One update published by the orchestrator per stage transition.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineState {
    Idle,
    Acquiring,
    Encoding,
    Submitting,
    Extracting,
    Done(PipelineOutcome),
    Failed(PipelineFailure),
}

impl PipelineState {
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            PipelineState::Acquiring
                | PipelineState::Encoding
                | PipelineState::Submitting
                | PipelineState::Extracting
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "Idle"),
            PipelineState::Acquiring => write!(f, "Acquiring"),
            PipelineState::Encoding => write!(f, "Encoding"),
            PipelineState::Submitting => write!(f, "Submitting"),
            PipelineState::Extracting => write!(f, "Extracting"),
            PipelineState::Done(_) => write!(f, "Done"),
            PipelineState::Failed(failure) => write!(f, "Failed({})", failure.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_progress_states_are_loading() {
        assert!(PipelineState::Acquiring.is_loading());
        assert!(PipelineState::Encoding.is_loading());
        assert!(PipelineState::Submitting.is_loading());
        assert!(PipelineState::Extracting.is_loading());
        assert!(!PipelineState::Idle.is_loading());
    }

    #[test]
    fn test_failed_state_is_not_loading() {
        let state = PipelineState::Failed(PipelineFailure {
            kind: FailureKind::NetworkError,
            message: "connection refused".to_string(),
        });

        assert!(!state.is_loading());
        assert_eq!(state.to_string(), "Failed(network error)");
    }
}
