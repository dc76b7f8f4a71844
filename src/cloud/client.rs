//! HTTP client for the cloud speech API.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{ClonePayload, ClonedVoice, SynthesisPayload, SynthesizedSpeech};
use crate::config::CloudConfig;
use crate::constants;
use crate::error::{Error, Result};

/// Handle to the remote speech service.
///
/// Built once from [`CloudConfig`] and passed explicitly to whoever needs
/// it; there is no process-wide client.
pub struct CloudSpeechClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    app_id: String,
}

impl CloudSpeechClient {
    pub fn new(config: &CloudConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            app_id: config.app_id.clone(),
        })
    }

    /// Synthesize `payload.text` into a complete audio clip.
    pub async fn synthesize(&self, payload: &SynthesisPayload) -> Result<SynthesizedSpeech> {
        tracing::debug!(
            request_id = %payload.request_id,
            voice_id = %payload.voice_id,
            chars = payload.text.chars().count(),
            "forwarding synthesis request"
        );
        self.post_json(constants::SYNTHESIS_PATH, payload).await
    }

    /// Register a new cloned voice from a reference sample.
    pub async fn clone_voice(&self, payload: &ClonePayload) -> Result<ClonedVoice> {
        tracing::debug!(name = %payload.name, "forwarding voice clone request");
        self.post_json(constants::VOICE_CLONE_PATH, payload).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(&url).json(body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        if !self.app_id.is_empty() {
            request = request.header("X-App-Id", self.app_id.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}
