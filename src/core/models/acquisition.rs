use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMode {
    Capture,
    Library,
}

impl AcquisitionMode {
    pub fn required_capabilities(&self) -> &'static [Capability] {
        match self {
            AcquisitionMode::Capture => &[Capability::Camera, Capability::MediaLibrary],
            AcquisitionMode::Library => &[Capability::MediaLibrary],
        }
    }
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionMode::Capture => write!(f, "capture"),
            AcquisitionMode::Library => write!(f, "library"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Camera,
    MediaLibrary,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Camera => write!(f, "camera"),
            Capability::MediaLibrary => write!(f, "media library"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    #[default]
    Undetermined,
    Granted,
    Denied,
}

/// A single image obtained from the camera or the library.
///
/// `temporary` images were written by this run and are removed once encoded.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedImage {
    pub uri: PathBuf,
    pub mode: AcquisitionMode,
    pub temporary: bool,
}

impl CapturedImage {
    pub fn at_location(uri: PathBuf, mode: AcquisitionMode) -> Self {
        log::debug!("[CAPTURED_IMAGE] {} image at {:?}", mode, uri);
        Self {
            uri,
            mode,
            temporary: false,
        }
    }

    pub fn at_temporary_location(uri: PathBuf, mode: AcquisitionMode) -> Self {
        log::debug!("[CAPTURED_IMAGE] temporary {} image at {:?}", mode, uri);
        Self {
            uri,
            mode,
            temporary: true,
        }
    }
}
