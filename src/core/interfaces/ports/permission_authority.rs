use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::{Capability, PermissionStatus};

#[async_trait]
pub trait PermissionAuthority: Send + Sync {
    fn status(&self, capability: Capability) -> PermissionStatus;

    async fn request(&self, capability: Capability) -> Result<PermissionStatus>;
}
