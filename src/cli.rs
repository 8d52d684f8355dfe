use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::models::{AcquisitionMode, ExtractionStrategy, RecognizerKind};

#[derive(Debug, Parser)]
#[command(name = "vitals-ocr", version, about = "Read pulse-oximeter displays from a photo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "VITALS_OCR_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub recognizer: Option<RecognizerKind>,

    #[arg(long, global = true, value_enum)]
    pub strategy: Option<ExtractionStrategy>,

    /// Print the reading as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum CliCommand {
    /// Take a photo with the configured camera command
    Capture,
    /// Use an existing photo, or the newest one in the library directory
    Library { path: Option<PathBuf> },
}

impl CliCommand {
    pub fn mode(&self) -> AcquisitionMode {
        match self {
            CliCommand::Capture => AcquisitionMode::Capture,
            CliCommand::Library { .. } => AcquisitionMode::Library,
        }
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        match self {
            CliCommand::Capture => None,
            CliCommand::Library { path } => path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_subcommand_parses() {
        let cli = Cli::try_parse_from(["vitals-ocr", "capture"]).unwrap();

        assert_eq!(cli.command, CliCommand::Capture);
        assert_eq!(cli.command.mode(), AcquisitionMode::Capture);
        assert!(!cli.json);
    }

    #[test]
    fn test_library_subcommand_with_path_and_global_flags() {
        let cli = Cli::try_parse_from([
            "vitals-ocr",
            "library",
            "/photos/monitor.jpg",
            "--recognizer",
            "on-device",
            "--strategy",
            "positional",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.command.mode(), AcquisitionMode::Library);
        assert_eq!(
            cli.command.selected_path(),
            Some(PathBuf::from("/photos/monitor.jpg"))
        );
        assert_eq!(cli.recognizer, Some(RecognizerKind::OnDevice));
        assert_eq!(cli.strategy, Some(ExtractionStrategy::Positional));
        assert!(cli.json);
    }

    #[test]
    fn test_unknown_recognizer_is_rejected() {
        let result = Cli::try_parse_from(["vitals-ocr", "capture", "--recognizer", "cloud"]);

        assert!(result.is_err());
    }
}
