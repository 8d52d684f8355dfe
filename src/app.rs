use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::adapters::{
    CommandCameraSource, ConsoleNotifier, ConsolePermissionAuthority, FileLibrarySource,
    GoogleVisionRecognitionClient, TesseractRecognitionClient, VisionCredentials,
};
use crate::cli::Cli;
use crate::core::interfaces::adapters::RecognitionClient;
use crate::core::interfaces::ports::UserNotifier;
use crate::core::models::{AcquisitionMode, PipelineState, RecognizerKind, UserSettings};
use crate::core::orchestrators::PipelineOrchestrator;
use crate::core::services::{ImageAcquirer, ReadingExtractor};
use crate::global_constants::{APPLICATION_TITLE, LOG_TAG_APP};
use crate::presentation::{OutputFormat, ReadingView};

pub struct VitalsApp {
    orchestrator: PipelineOrchestrator,
    states: mpsc::UnboundedReceiver<PipelineState>,
    view: ReadingView,
    mode: AcquisitionMode,
}

impl VitalsApp {
    /// Wires every adapter from settings. Configuration problems, including
    /// missing credentials, fail here before any image is acquired.
    pub fn build(cli: &Cli) -> Result<Self> {
        log::info!("{} Initializing {}", LOG_TAG_APP, APPLICATION_TITLE);

        let settings_path = match &cli.settings {
            Some(path) => path.clone(),
            None => UserSettings::default_settings_path()?,
        };
        let mut settings = UserSettings::load(&settings_path)?;

        if let Some(recognizer) = cli.recognizer {
            settings.recognizer = recognizer;
        }
        if let Some(strategy) = cli.strategy {
            settings.extraction_strategy = strategy;
        }

        let extractor = ReadingExtractor::build(
            settings.extraction_strategy,
            &settings.saturation_label,
            &settings.heart_rate_label,
        )
        .context("Invalid saturation or heart rate label pattern in settings")?;

        let recognition_client = Self::build_recognition_client(&settings)?;

        let notifier: Arc<dyn UserNotifier> = Arc::new(ConsoleNotifier::new());
        let camera_source = Arc::new(CommandCameraSource::new(
            settings.capture_command.clone(),
            std::env::temp_dir(),
        ));
        let library_source = Arc::new(FileLibrarySource::new(
            cli.command.selected_path(),
            settings.library_directory.clone(),
        ));
        let permission_authority = Arc::new(ConsolePermissionAuthority::new(
            settings,
            settings_path,
        ));

        let acquirer = ImageAcquirer::new(
            permission_authority,
            notifier.clone(),
            camera_source,
            library_source,
        );

        let (orchestrator, states) =
            PipelineOrchestrator::build(acquirer, recognition_client, extractor, notifier);

        let output_format = if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        Ok(Self {
            orchestrator,
            states,
            view: ReadingView::new(output_format),
            mode: cli.command.mode(),
        })
    }

    fn build_recognition_client(settings: &UserSettings) -> Result<Arc<dyn RecognitionClient>> {
        match settings.recognizer {
            RecognizerKind::Remote => {
                let credentials = VisionCredentials::from_env()?;
                let client = GoogleVisionRecognitionClient::build(
                    settings.vision_endpoint.clone(),
                    credentials,
                    settings.request_timeout_seconds.map(Duration::from_secs),
                )?;
                Ok(Arc::new(client))
            }
            RecognizerKind::OnDevice => Ok(Arc::new(TesseractRecognitionClient::locate(
                &settings.tesseract_language,
            )?)),
        }
    }

    pub async fn run(self) -> Result<ExitCode> {
        let Self {
            orchestrator,
            states,
            view,
            mode,
        } = self;

        let presenter = tokio::spawn(view.consume(states));

        let cancel = CancellationToken::new();
        let ctrl_c_token = cancel.clone();
        let ctrl_c_listener = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("{} Ctrl-C received, cancelling", LOG_TAG_APP);
                ctrl_c_token.cancel();
            }
        });

        let result = orchestrator.run(mode, cancel).await;

        ctrl_c_listener.abort();
        drop(orchestrator);
        presenter.await.context("Presentation task failed")?;

        Ok(match result {
            Ok(_) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        })
    }
}
