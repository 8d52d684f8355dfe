use std::io::Write;

use tokio::sync::mpsc;

use crate::core::models::{FailureKind, PipelineOutcome, PipelineState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Terminal renderer for pipeline state updates.
pub struct ReadingView {
    output_format: OutputFormat,
}

impl ReadingView {
    pub fn new(output_format: OutputFormat) -> Self {
        Self { output_format }
    }

    pub fn render_state(&self, state: &PipelineState) -> Option<String> {
        if state.is_loading() && self.output_format == OutputFormat::Json {
            return None;
        }

        match state {
            PipelineState::Idle => None,
            PipelineState::Acquiring => Some("Waiting for an image...".to_string()),
            PipelineState::Encoding => Some("Preparing image...".to_string()),
            PipelineState::Submitting => Some("Recognizing text...".to_string()),
            PipelineState::Extracting => Some("Reading values...".to_string()),
            PipelineState::Done(outcome) => Some(self.render_outcome(outcome)),
            PipelineState::Failed(failure) => match failure.kind {
                FailureKind::UserCancelled => Some("No image selected.".to_string()),
                _ => Some(format!("Failed ({}): {}", failure.kind, failure.message)),
            },
        }
    }

    pub fn render_outcome(&self, outcome: &PipelineOutcome) -> String {
        match self.output_format {
            OutputFormat::Json => serde_json::json!({
                "image": outcome.image.uri.to_string_lossy(),
                "reading": outcome.reading,
            })
            .to_string(),
            OutputFormat::Text => format!(
                "Image:      {}\nSaturation: {}%\nHeart rate: {} bpm\n\n{}",
                outcome.image.uri.display(),
                outcome.reading.saturation,
                outcome.reading.heart_rate,
                outcome.reading.all
            ),
        }
    }

    /// Prints every update until the orchestrator drops its sender.
    pub async fn consume(self, mut states: mpsc::UnboundedReceiver<PipelineState>) {
        while let Some(state) = states.recv().await {
            let Some(rendered) = self.render_state(&state) else {
                continue;
            };

            let is_failure = matches!(state, PipelineState::Failed(_));
            let written = if is_failure {
                writeln!(std::io::stderr().lock(), "{}", rendered)
            } else {
                writeln!(std::io::stdout().lock(), "{}", rendered)
            };

            if let Err(error) = written {
                log::error!("[VIEW] Failed to write output: {}", error);
            }
        }

        log::debug!("[VIEW] State channel closed");
    }
}
