use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::core::interfaces::adapters::RecognitionClient;
use crate::core::interfaces::ports::{AcquisitionSource, PermissionAuthority, UserNotifier};
use crate::core::models::{
    Capability, CapturedImage, EncodedPayload, PermissionStatus, PipelineError,
    RecognitionResponse, TextAnnotation,
};

pub struct MockPermissionAuthority {
    statuses: Mutex<HashMap<Capability, PermissionStatus>>,
    answer: PermissionStatus,
    requested: Mutex<Vec<Capability>>,
}

impl MockPermissionAuthority {
    pub fn with_statuses(
        statuses: &[(Capability, PermissionStatus)],
        answer: PermissionStatus,
    ) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            answer,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn granting_all() -> Self {
        Self::with_statuses(
            &[
                (Capability::Camera, PermissionStatus::Granted),
                (Capability::MediaLibrary, PermissionStatus::Granted),
            ],
            PermissionStatus::Granted,
        )
    }

    pub fn requested_capabilities(&self) -> Vec<Capability> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PermissionAuthority for MockPermissionAuthority {
    fn status(&self, capability: Capability) -> PermissionStatus {
        self.statuses
            .lock()
            .unwrap()
            .get(&capability)
            .copied()
            .unwrap_or_default()
    }

    async fn request(&self, capability: Capability) -> Result<PermissionStatus> {
        self.requested.lock().unwrap().push(capability);
        self.statuses.lock().unwrap().insert(capability, self.answer);
        Ok(self.answer)
    }
}

#[derive(Default)]
pub struct MockNotifier {
    notices: Mutex<Vec<String>>,
    statuses: Mutex<Vec<String>>,
}

impl MockNotifier {
    pub fn notice_count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn status_messages(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }
}

impl UserNotifier for MockNotifier {
    fn show_blocking_notice(&self, title: &str, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(format!("{}: {}", title, message));
    }

    fn show_status(&self, message: &str) {
        self.statuses.lock().unwrap().push(message.to_string());
    }
}

pub struct MockAcquisitionSource {
    image: Option<CapturedImage>,
    launches: AtomicUsize,
}

impl MockAcquisitionSource {
    pub fn returning(image: Option<CapturedImage>) -> Self {
        Self {
            image,
            launches: AtomicUsize::new(0),
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AcquisitionSource for MockAcquisitionSource {
    async fn launch(&self) -> Result<Option<CapturedImage>, PipelineError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(self.image.clone())
    }
}

pub enum MockReply {
    Respond(RecognitionResponse),
    NetworkFailure(String),
    /// Signals `entered`, then waits for `release` before responding.
    Gated {
        response: RecognitionResponse,
        entered: Arc<Notify>,
        release: Arc<Notify>,
    },
    Hang,
}

pub struct MockRecognitionClient {
    reply: MockReply,
    calls: AtomicUsize,
    received_payloads: Mutex<Vec<String>>,
}

impl MockRecognitionClient {
    pub fn replying(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            received_payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received_payloads(&self) -> Vec<String> {
        self.received_payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecognitionClient for MockRecognitionClient {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn recognize(
        &self,
        payload: &EncodedPayload,
    ) -> Result<RecognitionResponse, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received_payloads
            .lock()
            .unwrap()
            .push(payload.content.clone());

        match &self.reply {
            MockReply::Respond(response) => Ok(response.clone()),
            MockReply::NetworkFailure(message) => Err(PipelineError::Network(message.clone())),
            MockReply::Gated {
                response,
                entered,
                release,
            } => {
                entered.notify_one();
                release.notified().await;
                Ok(response.clone())
            }
            MockReply::Hang => std::future::pending().await,
        }
    }
}

pub fn fixture_response() -> RecognitionResponse {
    RecognitionResponse::from_annotations(
        ["SpO2 98 HR 72", "SpO2", "98", "HR", "72"]
            .into_iter()
            .map(TextAnnotation::with_text)
            .collect(),
    )
}
