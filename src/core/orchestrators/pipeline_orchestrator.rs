use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::interfaces::adapters::RecognitionClient;
use crate::core::interfaces::ports::UserNotifier;
use crate::core::models::{
    AcquisitionMode, CapturedImage, PipelineError, PipelineFailure, PipelineOutcome,
    PipelineState,
};
use crate::core::services::{ImageAcquirer, PayloadEncoder, ReadingExtractor};
use crate::global_constants::LOG_TAG_PIPELINE;

/// Runs acquire -> encode -> recognize -> extract for one user trigger.
///
/// Each stage transition is published on the state channel. Any failure ends
/// the run with `Failed(kind)` followed by `Idle`; nothing is retried.
pub struct PipelineOrchestrator {
    acquirer: ImageAcquirer,
    recognition_client: Arc<dyn RecognitionClient>,
    extractor: ReadingExtractor,
    notifier: Arc<dyn UserNotifier>,
    state_sender: mpsc::UnboundedSender<PipelineState>,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl PipelineOrchestrator {
    pub fn build(
        acquirer: ImageAcquirer,
        recognition_client: Arc<dyn RecognitionClient>,
        extractor: ReadingExtractor,
        notifier: Arc<dyn UserNotifier>,
    ) -> (Self, mpsc::UnboundedReceiver<PipelineState>) {
        let (state_sender, state_receiver) = mpsc::unbounded_channel();

        log::info!(
            "{} Using {} recognizer with {} extraction",
            LOG_TAG_PIPELINE,
            recognition_client.backend_name(),
            extractor.strategy()
        );

        let orchestrator = Self {
            acquirer,
            recognition_client,
            extractor,
            notifier,
            state_sender,
            in_flight: AtomicBool::new(false),
        };

        (orchestrator, state_receiver)
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn run(
        &self,
        mode: AcquisitionMode,
        cancel: CancellationToken,
    ) -> Result<PipelineOutcome, PipelineError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("{} Ignoring trigger, a run is in flight", LOG_TAG_PIPELINE);
            let error = PipelineError::Busy;
            self.notifier.show_status(&error.to_string());
            return Err(error);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let run_id = Uuid::new_v4();
        log::info!("{} Run {} started ({})", LOG_TAG_PIPELINE, run_id, mode);

        let result = self.execute(mode, &cancel, run_id).await;

        match &result {
            Ok(outcome) => {
                log::info!(
                    "{} Run {} done: saturation={} heart_rate={}",
                    LOG_TAG_PIPELINE,
                    run_id,
                    outcome.reading.saturation,
                    outcome.reading.heart_rate
                );
                self.publish(PipelineState::Done(outcome.clone()));
            }
            Err(error) => {
                log::error!("{} Run {} failed: {}", LOG_TAG_PIPELINE, run_id, error);

                // Permission denials already produced a blocking notice.
                if !matches!(error, PipelineError::PermissionDenied(_)) {
                    self.notifier
                        .show_status(&format!("Reading failed: {}", error));
                }

                self.publish(PipelineState::Failed(PipelineFailure {
                    kind: error.kind(),
                    message: error.to_string(),
                }));
            }
        }

        self.publish(PipelineState::Idle);
        result
    }

    async fn execute(
        &self,
        mode: AcquisitionMode,
        cancel: &CancellationToken,
        run_id: Uuid,
    ) -> Result<PipelineOutcome, PipelineError> {
        self.enter_stage(PipelineState::Acquiring, cancel, run_id)?;
        let image = Self::until_cancelled(cancel, self.acquirer.acquire(mode))
            .await?
            .ok_or(PipelineError::UserCancelled)?;

        let encoded = match self.enter_stage(PipelineState::Encoding, cancel, run_id) {
            Ok(()) => PayloadEncoder::encode(&image).await,
            Err(error) => Err(error),
        };
        Self::discard_temporary(&image, run_id).await;
        let payload = encoded?;

        self.enter_stage(PipelineState::Submitting, cancel, run_id)?;
        let response =
            Self::until_cancelled(cancel, self.recognition_client.recognize(&payload)).await?;
        drop(payload);

        self.enter_stage(PipelineState::Extracting, cancel, run_id)?;
        let reading = self.extractor.extract_reading(&response)?;

        Ok(PipelineOutcome { reading, image })
    }

    /// Camera frames live only until they are encoded, whatever the outcome.
    async fn discard_temporary(image: &CapturedImage, run_id: Uuid) {
        if !image.temporary {
            return;
        }

        match tokio::fs::remove_file(&image.uri).await {
            Ok(()) => log::debug!(
                "{} Run {} removed temporary image {:?}",
                LOG_TAG_PIPELINE,
                run_id,
                image.uri
            ),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => log::warn!(
                "{} Run {} could not remove temporary image {:?}: {}",
                LOG_TAG_PIPELINE,
                run_id,
                image.uri,
                error
            ),
        }
    }

    fn enter_stage(
        &self,
        stage: PipelineState,
        cancel: &CancellationToken,
        run_id: Uuid,
    ) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        log::debug!("{} Run {} -> {}", LOG_TAG_PIPELINE, run_id, stage);
        self.publish(stage);
        Ok(())
    }

    async fn until_cancelled<T>(
        cancel: &CancellationToken,
        step: impl Future<Output = Result<T, PipelineError>>,
    ) -> Result<T, PipelineError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            result = step => result,
        }
    }

    fn publish(&self, state: PipelineState) {
        if self.state_sender.send(state).is_err() {
            log::debug!("{} State listener is gone", LOG_TAG_PIPELINE);
        }
    }
}
