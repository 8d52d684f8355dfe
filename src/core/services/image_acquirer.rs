use std::sync::Arc;

use crate::core::interfaces::ports::{AcquisitionSource, PermissionAuthority, UserNotifier};
use crate::core::models::{
    AcquisitionMode, Capability, CapturedImage, PermissionStatus, PipelineError,
};
use crate::global_constants::{
    LOG_TAG_ACQUIRER, LOG_TAG_PERMISSIONS, NOTICE_PERMISSION_MESSAGE, NOTICE_PERMISSION_TITLE,
};

pub struct ImageAcquirer {
    permission_authority: Arc<dyn PermissionAuthority>,
    notifier: Arc<dyn UserNotifier>,
    camera_source: Arc<dyn AcquisitionSource>,
    library_source: Arc<dyn AcquisitionSource>,
}

impl ImageAcquirer {
    pub fn new(
        permission_authority: Arc<dyn PermissionAuthority>,
        notifier: Arc<dyn UserNotifier>,
        camera_source: Arc<dyn AcquisitionSource>,
        library_source: Arc<dyn AcquisitionSource>,
    ) -> Self {
        Self {
            permission_authority,
            notifier,
            camera_source,
            library_source,
        }
    }

    /// Every capability the mode needs is checked before its source is
    /// launched. The first denial stops the gate with a single notice.
    pub async fn acquire(
        &self,
        mode: AcquisitionMode,
    ) -> Result<Option<CapturedImage>, PipelineError> {
        log::info!("{} Acquiring image via {}", LOG_TAG_ACQUIRER, mode);

        for &capability in mode.required_capabilities() {
            if !self.verify_capability(capability).await {
                let message = NOTICE_PERMISSION_MESSAGE.replace("{}", &capability.to_string());
                self.notifier
                    .show_blocking_notice(NOTICE_PERMISSION_TITLE, &message);
                return Err(PipelineError::PermissionDenied(capability));
            }
        }

        let source = match mode {
            AcquisitionMode::Capture => &self.camera_source,
            AcquisitionMode::Library => &self.library_source,
        };

        let image = source.launch().await?;

        match &image {
            Some(captured) => {
                log::info!("{} Acquired image at {:?}", LOG_TAG_ACQUIRER, captured.uri)
            }
            None => log::info!("{} Acquisition cancelled by user", LOG_TAG_ACQUIRER),
        }

        Ok(image)
    }

    async fn verify_capability(&self, capability: Capability) -> bool {
        let status = match self.permission_authority.status(capability) {
            PermissionStatus::Undetermined => {
                log::info!(
                    "{} {} permission undetermined, requesting",
                    LOG_TAG_PERMISSIONS,
                    capability
                );
                match self.permission_authority.request(capability).await {
                    Ok(answer) => answer,
                    Err(error) => {
                        log::warn!(
                            "{} {} permission request failed: {}",
                            LOG_TAG_PERMISSIONS,
                            capability,
                            error
                        );
                        PermissionStatus::Denied
                    }
                }
            }
            known => known,
        };

        if status == PermissionStatus::Granted {
            log::debug!("{} {} permission granted", LOG_TAG_PERMISSIONS, capability);
            true
        } else {
            log::warn!("{} {} permission not granted", LOG_TAG_PERMISSIONS, capability);
            false
        }
    }
}
