use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;

use crate::core::interfaces::ports::AcquisitionSource;
use crate::core::models::{AcquisitionMode, CapturedImage, PipelineError};
use crate::global_constants::{CAPTURE_FILE_PREFIX, CAPTURE_OUTPUT_PLACEHOLDER};

/// Captures a frame by running an external camera command.
///
/// `{output}` in the command is replaced with a fresh file path. A command
/// that exits cleanly without writing that file counts as a cancelled capture.
/// Frames are handed out as temporary images; the pipeline removes them.
pub struct CommandCameraSource {
    command: Vec<String>,
    output_directory: PathBuf,
}

impl CommandCameraSource {
    pub fn new(command: Vec<String>, output_directory: PathBuf) -> Self {
        if !command
            .iter()
            .any(|part| part.contains(CAPTURE_OUTPUT_PLACEHOLDER))
        {
            log::warn!(
                "[CAMERA] Capture command has no {} placeholder, captures will look cancelled",
                CAPTURE_OUTPUT_PLACEHOLDER
            );
        }

        Self {
            command,
            output_directory,
        }
    }

    fn build_output_path(&self) -> PathBuf {
        self.output_directory
            .join(format!("{}-{}.jpg", CAPTURE_FILE_PREFIX, Uuid::new_v4()))
    }

    async fn remove_partial_frame(output_path: &Path) {
        match tokio::fs::remove_file(output_path).await {
            Ok(()) => log::debug!("[CAMERA] Removed partial frame {:?}", output_path),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => log::warn!("[CAMERA] Could not remove partial frame: {}", error),
        }
    }

    fn render_arguments(arguments: &[String], output_path: &str) -> Vec<String> {
        arguments
            .iter()
            .map(|argument| argument.replace(CAPTURE_OUTPUT_PLACEHOLDER, output_path))
            .collect()
    }
}

#[async_trait]
impl AcquisitionSource for CommandCameraSource {
    async fn launch(&self) -> Result<Option<CapturedImage>, PipelineError> {
        let (program, arguments) = self.command.split_first().ok_or_else(|| {
            PipelineError::io(
                &self.output_directory,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "no capture command configured",
                ),
            )
        })?;

        let output_path = self.build_output_path();
        let rendered_arguments =
            Self::render_arguments(arguments, &output_path.to_string_lossy());

        log::info!("[CAMERA] Running capture command: {}", program);
        log::debug!("[CAMERA] Arguments: {:?}", rendered_arguments);

        let status = Command::new(program)
            .args(&rendered_arguments)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|error| PipelineError::io(program, error))?;

        if !status.success() {
            Self::remove_partial_frame(&output_path).await;
            return Err(PipelineError::io(
                program,
                std::io::Error::other(format!("capture command exited with {}", status)),
            ));
        }

        match tokio::fs::metadata(&output_path).await {
            Ok(metadata) if metadata.len() > 0 => Ok(Some(
                CapturedImage::at_temporary_location(output_path, AcquisitionMode::Capture),
            )),
            Ok(_) => {
                log::info!("[CAMERA] Empty frame written to {:?}", output_path);
                if let Err(error) = tokio::fs::remove_file(&output_path).await {
                    log::warn!("[CAMERA] Could not remove empty frame: {}", error);
                }
                Ok(None)
            }
            Err(_) => {
                log::info!("[CAMERA] No frame written to {:?}", output_path);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::models::FailureKind;

    fn shell_command(script: &str) -> Vec<String> {
        vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
            CAPTURE_OUTPUT_PLACEHOLDER.to_string(),
        ]
    }

    #[test]
    fn test_render_arguments_substitutes_output_placeholder() {
        let arguments = vec![
            "--no-banner".to_string(),
            "--save={output}".to_string(),
            "{output}".to_string(),
        ];

        let rendered = CommandCameraSource::render_arguments(&arguments, "/tmp/frame.jpg");

        assert_eq!(
            rendered,
            vec!["--no-banner", "--save=/tmp/frame.jpg", "/tmp/frame.jpg"]
        );
    }

    #[tokio::test]
    async fn test_launch_returns_written_frame() {
        let source = CommandCameraSource::new(
            shell_command("printf 'frame' > \"$1\""),
            std::env::temp_dir(),
        );

        let image = source.launch().await.unwrap().unwrap();

        assert_eq!(image.mode, AcquisitionMode::Capture);
        assert_eq!(std::fs::read(&image.uri).unwrap(), b"frame");

        std::fs::remove_file(&image.uri).ok();
    }

    fn create_output_dir() -> PathBuf {
        let directory =
            std::env::temp_dir().join(format!("vitals-ocr-camera-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&directory).unwrap();
        directory
    }

    #[tokio::test]
    async fn test_frame_is_marked_temporary() {
        let directory = create_output_dir();
        let source =
            CommandCameraSource::new(shell_command("printf 'frame' > \"$1\""), directory.clone());

        let image = source.launch().await.unwrap().unwrap();

        assert!(image.temporary);
        assert!(image.uri.starts_with(&directory));

        std::fs::remove_dir_all(&directory).ok();
    }

    #[tokio::test]
    async fn test_empty_frame_is_removed_and_treated_as_cancellation() {
        let directory = create_output_dir();
        let source = CommandCameraSource::new(shell_command(": > \"$1\""), directory.clone());

        let image = source.launch().await.unwrap();

        assert_eq!(image, None);
        assert_eq!(std::fs::read_dir(&directory).unwrap().count(), 0);

        std::fs::remove_dir_all(&directory).ok();
    }

    #[tokio::test]
    async fn test_failing_command_leaves_no_partial_frame() {
        let directory = create_output_dir();
        let source = CommandCameraSource::new(
            shell_command("printf 'half' > \"$1\"; exit 1"),
            directory.clone(),
        );

        let error = source.launch().await.unwrap_err();

        assert_eq!(error.kind(), FailureKind::IoError);
        assert_eq!(std::fs::read_dir(&directory).unwrap().count(), 0);

        std::fs::remove_dir_all(&directory).ok();
    }

    #[tokio::test]
    async fn test_abandoned_capture_kills_the_command() {
        let directory = create_output_dir();
        let source = CommandCameraSource::new(
            shell_command("sleep 0.4; printf 'late' > \"$1\""),
            directory.clone(),
        );

        tokio::select! {
            _ = source.launch() => panic!("capture finished before it was abandoned"),
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
        tokio::time::sleep(Duration::from_millis(800)).await;

        assert_eq!(std::fs::read_dir(&directory).unwrap().count(), 0);

        std::fs::remove_dir_all(&directory).ok();
    }

    #[tokio::test]
    async fn test_launch_without_frame_is_cancellation() {
        let source = CommandCameraSource::new(shell_command("exit 0"), std::env::temp_dir());

        let image = source.launch().await.unwrap();

        assert_eq!(image, None);
    }

    #[tokio::test]
    async fn test_failing_command_is_io_error() {
        let source = CommandCameraSource::new(shell_command("exit 3"), std::env::temp_dir());

        let error = source.launch().await.unwrap_err();

        assert_eq!(error.kind(), FailureKind::IoError);
    }

    #[tokio::test]
    async fn test_empty_command_is_io_error() {
        let source = CommandCameraSource::new(Vec::new(), std::env::temp_dir());

        let error = source.launch().await.unwrap_err();

        assert_eq!(error.kind(), FailureKind::IoError);
    }
}
