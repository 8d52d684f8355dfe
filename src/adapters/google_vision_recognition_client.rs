use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::core::interfaces::adapters::RecognitionClient;
use crate::core::models::{EncodedPayload, PipelineError, RecognitionRequest, RecognitionResponse};
use crate::global_constants;

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

#[derive(Clone)]
pub struct VisionCredentials {
    access_token: String,
    project_id: String,
}

impl std::fmt::Debug for VisionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionCredentials")
            .field("access_token", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}

impl VisionCredentials {
    pub fn new(access_token: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            project_id: project_id.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        match (
            read(global_constants::ENV_VISION_ACCESS_TOKEN),
            read(global_constants::ENV_VISION_PROJECT_ID),
        ) {
            (Some(access_token), Some(project_id)) => Ok(Self::new(access_token, project_id)),
            _ => anyhow::bail!(global_constants::MESSAGE_MISSING_CREDENTIALS),
        }
    }
}

pub struct GoogleVisionRecognitionClient {
    http_client: reqwest::Client,
    endpoint: String,
    credentials: VisionCredentials,
}

impl GoogleVisionRecognitionClient {
    pub fn build(
        endpoint: String,
        credentials: VisionCredentials,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        log::info!("[VISION] Initializing remote recognizer for {}", endpoint);

        let endpoint_url = reqwest::Url::parse(&endpoint)
            .with_context(|| format!("Invalid vision endpoint '{}'", endpoint))?;

        let mut builder = reqwest::Client::builder();
        if Self::is_loopback(&endpoint_url) {
            log::debug!("[VISION] Loopback endpoint, bypassing proxies");
            builder = builder.no_proxy();
        }
        if let Some(timeout) = request_timeout {
            log::debug!("[VISION] Request timeout: {:?}", timeout);
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            endpoint,
            credentials,
        })
    }

    fn is_loopback(endpoint_url: &reqwest::Url) -> bool {
        let Some(host) = endpoint_url.host_str() else {
            return false;
        };
        if host.eq_ignore_ascii_case("localhost") {
            return true;
        }
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<std::net::IpAddr>()
            .is_ok_and(|address| address.is_loopback())
    }

    fn interpret_response(status: u16, body: &str) -> Result<RecognitionResponse, PipelineError> {
        if !(200..300).contains(&status) {
            return Err(PipelineError::Remote {
                status: Some(status),
                message: format!("HTTP {}: {}", status, Self::summarize_error_body(body)),
            });
        }

        let response: RecognitionResponse =
            serde_json::from_str(body).map_err(|error| PipelineError::Parse(error.to_string()))?;

        if let Some(error) = response
            .responses
            .iter()
            .find_map(|item| item.error.as_ref())
        {
            return Err(PipelineError::Remote {
                status: Some(status),
                message: format!("code {}: {}", error.code, error.message),
            });
        }

        Ok(response)
    }

    fn summarize_error_body(body: &str) -> String {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json["error"]["message"].as_str().map(str::to_string));

        match message {
            Some(message) => message,
            None => body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
        }
    }
}

#[async_trait]
impl RecognitionClient for GoogleVisionRecognitionClient {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn recognize(
        &self,
        payload: &EncodedPayload,
    ) -> Result<RecognitionResponse, PipelineError> {
        log::info!(
            "[VISION] Submitting {} image bytes for text detection",
            payload.byte_length
        );

        let request = RecognitionRequest::text_detection(payload.content.clone());

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.credentials.access_token)
            .header(
                global_constants::HEADER_USER_PROJECT,
                &self.credentials.project_id,
            )
            .json(&request)
            .send()
            .await
            .map_err(|error| PipelineError::Network(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| PipelineError::Network(error.to_string()))?;

        log::debug!("[VISION] Response status {} ({} bytes)", status, body.len());

        let recognition = Self::interpret_response(status, &body)?;

        log::info!(
            "[VISION] Received {} annotations",
            recognition.first_annotations().len()
        );

        Ok(recognition)
    }
}
