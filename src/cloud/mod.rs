//! Cloud speech API client and wire types.
//!
//! The remote service does all of the actual work; these types only
//! describe the JSON that crosses the wire. Audio travels base64-encoded
//! in both directions and is never transformed locally.

pub mod client;

pub use client::CloudSpeechClient;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Body of a synthesis call.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisPayload {
    /// Client-generated id, echoed back by the API for correlation.
    pub request_id: String,
    pub text: String,
    pub voice_id: String,
    pub audio_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_ratio: Option<f32>,
}

impl SynthesisPayload {
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>, speed: Option<f32>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().simple().to_string(),
            text: text.into(),
            voice_id: voice_id.into(),
            audio_format: constants::DEFAULT_AUDIO_FORMAT.to_string(),
            speed_ratio: speed,
        }
    }
}

/// Synthesis reply: the complete audio clip, base64 as returned.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesizedSpeech {
    #[serde(default)]
    pub request_id: Option<String>,
    pub audio: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

/// Body of a voice-clone call. `audio` holds the uploaded sample,
/// base64-encoded byte for byte.
#[derive(Debug, Clone, Serialize)]
pub struct ClonePayload {
    pub name: String,
    pub audio: String,
    pub audio_format: String,
}

/// Clone reply: the identifier of the newly registered voice.
#[derive(Debug, Clone, Deserialize)]
pub struct ClonedVoice {
    pub voice_id: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_payload_serializes_expected_fields() {
        let payload = SynthesisPayload::new("hello", "standard_female_1", None);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["text"], "hello");
        assert_eq!(value["voice_id"], "standard_female_1");
        assert_eq!(value["audio_format"], "wav");
        // Unset speed must not appear on the wire.
        assert!(value.get("speed_ratio").is_none());
        assert!(!value["request_id"].as_str().unwrap().is_empty());
    }

    #[test]
    fn speed_ratio_is_forwarded_when_set() {
        let payload = SynthesisPayload::new("hello", "v1", Some(1.2));
        let value = serde_json::to_value(&payload).unwrap();
        assert!((value["speed_ratio"].as_f64().unwrap() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn synthesized_speech_tolerates_missing_optional_fields() {
        let reply: SynthesizedSpeech = serde_json::from_str(r#"{"audio":"UklGRg=="}"#).unwrap();
        assert_eq!(reply.audio, "UklGRg==");
        assert!(reply.request_id.is_none());
        assert!(reply.duration_ms.is_none());
    }
}
