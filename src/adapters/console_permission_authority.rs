use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::core::interfaces::ports::PermissionAuthority;
use crate::core::models::{Capability, PermissionStatus, UserSettings};
use crate::global_constants::{APPLICATION_NAME, LOG_TAG_PERMISSIONS};

type PromptReader = Arc<dyn Fn(Capability) -> std::io::Result<String> + Send + Sync>;

/// Grants live in the settings file; undetermined ones are asked on the terminal.
pub struct ConsolePermissionAuthority {
    settings: Mutex<UserSettings>,
    settings_path: PathBuf,
    prompt_reader: PromptReader,
}

impl ConsolePermissionAuthority {
    pub fn new(settings: UserSettings, settings_path: PathBuf) -> Self {
        Self::with_prompt_reader(settings, settings_path, Arc::new(Self::prompt_on_terminal))
    }

    pub fn with_prompt_reader(
        settings: UserSettings,
        settings_path: PathBuf,
        prompt_reader: PromptReader,
    ) -> Self {
        Self {
            settings: Mutex::new(settings),
            settings_path,
            prompt_reader,
        }
    }

    fn prompt_on_terminal(capability: Capability) -> std::io::Result<String> {
        let mut stderr = std::io::stderr();
        write!(
            stderr,
            "Allow {} to use the {}? [y/N] ",
            APPLICATION_NAME, capability
        )?;
        stderr.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }

    fn interpret_answer(answer: &str) -> PermissionStatus {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => PermissionStatus::Granted,
            _ => PermissionStatus::Denied,
        }
    }

    fn record_decision(&self, capability: Capability, status: PermissionStatus) -> Result<()> {
        let snapshot = {
            let mut settings = self
                .settings
                .lock()
                .map_err(|_| anyhow::anyhow!("permission settings lock poisoned"))?;
            settings.permissions.insert(capability, status);
            settings.clone()
        };

        snapshot
            .save(&self.settings_path)
            .context("Failed to persist permission decision")
    }
}

#[async_trait]
impl PermissionAuthority for ConsolePermissionAuthority {
    fn status(&self, capability: Capability) -> PermissionStatus {
        match self.settings.lock() {
            Ok(settings) => settings.permission_status(capability),
            Err(_) => {
                log::error!("{} Settings lock poisoned", LOG_TAG_PERMISSIONS);
                PermissionStatus::Denied
            }
        }
    }

    async fn request(&self, capability: Capability) -> Result<PermissionStatus> {
        let prompt_reader = Arc::clone(&self.prompt_reader);
        let (answer_sender, answer_receiver) = oneshot::channel();

        // Detached thread: a cancelled run must not wait on a blocked stdin read.
        std::thread::Builder::new()
            .name("permission-prompt".to_string())
            .spawn(move || {
                if answer_sender.send(prompt_reader(capability)).is_err() {
                    log::debug!("{} Prompt answered after the run ended", LOG_TAG_PERMISSIONS);
                }
            })
            .context("Failed to start permission prompt")?;

        let answer = answer_receiver
            .await
            .context("Permission prompt ended without an answer")?
            .context("Failed to read permission answer")?;

        let status = Self::interpret_answer(&answer);
        log::info!(
            "{} User answered {:?} for {}",
            LOG_TAG_PERMISSIONS,
            status,
            capability
        );

        self.record_decision(capability, status)?;
        Ok(status)
    }
}
