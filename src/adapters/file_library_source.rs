use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

use crate::core::interfaces::ports::AcquisitionSource;
use crate::core::models::{AcquisitionMode, CapturedImage, PipelineError};
use crate::global_constants::LIBRARY_IMAGE_EXTENSIONS;

pub struct FileLibrarySource {
    selected_path: Option<PathBuf>,
    library_directory: Option<PathBuf>,
}

impl FileLibrarySource {
    pub fn new(selected_path: Option<PathBuf>, library_directory: Option<PathBuf>) -> Self {
        Self {
            selected_path,
            library_directory,
        }
    }

    fn is_library_image(path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| {
                LIBRARY_IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(extension))
            })
            .unwrap_or(false)
    }

    async fn find_newest_image(directory: &Path) -> Result<Option<PathBuf>, PipelineError> {
        let mut entries = tokio::fs::read_dir(directory)
            .await
            .map_err(|error| PipelineError::io(directory, error))?;

        let mut newest: Option<(SystemTime, PathBuf)> = None;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|error| PipelineError::io(directory, error))?
        {
            let path = entry.path();
            if !Self::is_library_image(&path) {
                continue;
            }

            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            if newest
                .as_ref()
                .map_or(true, |(newest_time, _)| modified > *newest_time)
            {
                newest = Some((modified, path));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }
}

#[async_trait]
impl AcquisitionSource for FileLibrarySource {
    async fn launch(&self) -> Result<Option<CapturedImage>, PipelineError> {
        if let Some(selected_path) = &self.selected_path {
            log::info!("[LIBRARY] Using selected image {:?}", selected_path);
            return Ok(Some(CapturedImage::at_location(
                selected_path.clone(),
                AcquisitionMode::Library,
            )));
        }

        let Some(directory) = &self.library_directory else {
            log::warn!("[LIBRARY] No image selected and no library directory configured");
            return Ok(None);
        };

        log::info!("[LIBRARY] Picking newest image in {:?}", directory);

        let newest = Self::find_newest_image(directory).await?;
        if newest.is_none() {
            log::info!("[LIBRARY] No images found in {:?}", directory);
        }

        Ok(newest.map(|path| CapturedImage::at_location(path, AcquisitionMode::Library)))
    }
}
