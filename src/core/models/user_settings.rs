use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::models::{Capability, PermissionStatus};
use crate::global_constants;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RecognizerKind {
    Remote,
    OnDevice,
}

impl fmt::Display for RecognizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognizerKind::Remote => write!(f, "remote"),
            RecognizerKind::OnDevice => write!(f, "on-device"),
        }
    }
}

impl Default for RecognizerKind {
    fn default() -> Self {
        RecognizerKind::Remote
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategy {
    Positional,
    Labeled,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Positional => write!(f, "positional"),
            ExtractionStrategy::Labeled => write!(f, "labeled"),
        }
    }
}

impl Default for ExtractionStrategy {
    fn default() -> Self {
        ExtractionStrategy::Labeled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    #[serde(default)]
    pub recognizer: RecognizerKind,
    #[serde(default)]
    pub extraction_strategy: ExtractionStrategy,
    pub vision_endpoint: String,
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub capture_command: Vec<String>,
    #[serde(default)]
    pub library_directory: Option<PathBuf>,
    pub saturation_label: String,
    pub heart_rate_label: String,
    #[serde(default = "default_tesseract_language")]
    pub tesseract_language: String,
    #[serde(default)]
    pub permissions: BTreeMap<Capability, PermissionStatus>,
}

fn default_tesseract_language() -> String {
    global_constants::DEFAULT_TESSERACT_LANGUAGE.to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            recognizer: RecognizerKind::default(),
            extraction_strategy: ExtractionStrategy::default(),
            vision_endpoint: global_constants::DEFAULT_VISION_ENDPOINT.to_string(),
            request_timeout_seconds: None,
            capture_command: global_constants::DEFAULT_CAPTURE_COMMAND
                .iter()
                .map(|part| part.to_string())
                .collect(),
            library_directory: dirs::picture_dir(),
            saturation_label: global_constants::DEFAULT_SATURATION_LABEL.to_string(),
            heart_rate_label: global_constants::DEFAULT_HEART_RATE_LABEL.to_string(),
            tesseract_language: default_tesseract_language(),
            permissions: BTreeMap::new(),
        }
    }
}

impl UserSettings {
    pub fn load(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            let default_settings = Self::default();
            default_settings.save(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)
            .with_context(|| format!("Failed to read settings from {:?}", settings_path))?;
        let settings: UserSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Settings file {:?} is not valid", settings_path))?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!("[SETTINGS] Recognizer: {}", settings.recognizer);
        log::debug!(
            "[SETTINGS] Extraction strategy: {}",
            settings.extraction_strategy
        );

        Ok(settings)
    }

    pub fn save(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    pub fn default_settings_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::CONFIG_DIRECTORY_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }

    pub fn permission_status(&self, capability: Capability) -> PermissionStatus {
        self.permissions
            .get(&capability)
            .copied()
            .unwrap_or_default()
    }
}
