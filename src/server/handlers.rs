//! Request handlers for the demo endpoints.

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use futures_util::Stream;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::cloud::{ClonePayload, SynthesisPayload};
use crate::constants;
use crate::error::{Error, Result};
use crate::store::ClonedVoiceRecord;
use crate::wav::{self, SampleWarning, WaveFormatInfo};

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub request_id: String,
    pub voice_id: String,
    pub format: String,
    /// Base64 audio exactly as returned by the cloud API.
    pub audio: String,
}

/// Synchronous synthesis: one request, one complete clip.
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Json<SynthesizeResponse>> {
    let payload = build_synthesis_payload(&state, &request)?;
    let speech = state.cloud.synthesize(&payload).await?;
    Ok(Json(SynthesizeResponse {
        request_id: speech.request_id.unwrap_or(payload.request_id),
        voice_id: payload.voice_id,
        format: payload.audio_format,
        audio: speech.audio,
    }))
}

#[derive(Debug, Serialize)]
struct StreamStart<'a> {
    request_id: &'a str,
    voice_id: &'a str,
    format: &'a str,
    pieces: usize,
}

#[derive(Debug, Serialize)]
struct StreamPiece<'a> {
    seq: usize,
    audio: &'a str,
}

/// Pseudo-streaming synthesis.
///
/// The upstream call completes before the first event goes out; the
/// finished base64 payload is then re-sliced into fixed-size pieces and
/// drip-fed with an artificial delay so the demo UI can animate
/// progressive playback. No partial synthesis results ever exist.
pub async fn synthesize_stream(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let payload = build_synthesis_payload(&state, &request)?;
    let speech = state.cloud.synthesize(&payload).await?;
    let request_id = speech.request_id.as_deref().unwrap_or(&payload.request_id);

    let pieces = split_into_pieces(&speech.audio, constants::STREAM_PIECE_COUNT);
    let mut events = Vec::with_capacity(pieces.len() + 2);
    events.push(named_event(
        "start",
        &StreamStart {
            request_id,
            voice_id: &payload.voice_id,
            format: &payload.audio_format,
            pieces: pieces.len(),
        },
    )?);
    for (seq, audio) in pieces.iter().copied().enumerate() {
        events.push(named_event("chunk", &StreamPiece { seq, audio })?);
    }
    events.push(Event::default().event("done").data("{}"));

    let delay = Duration::from_millis(constants::STREAM_PIECE_DELAY_MS);
    let stream = stream::iter(events.into_iter().enumerate()).then(move |(index, event)| {
        async move {
            if index > 0 {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, Infallible>(event)
        }
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Summary of the parsed upload, echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct SampleReport {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub bits_per_sample: u16,
    pub duration_seconds: f64,
    pub is_estimated: bool,
}

impl From<&WaveFormatInfo> for SampleReport {
    fn from(info: &WaveFormatInfo) -> Self {
        Self {
            sample_rate: info.sample_rate,
            channel_count: info.channel_count,
            bits_per_sample: info.bits_per_sample,
            duration_seconds: info.duration_seconds(),
            is_estimated: info.is_estimated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CloneResponse {
    pub voice_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub sample: SampleReport,
    pub warnings: Vec<SampleWarning>,
}

/// Voice cloning from a multipart WAV upload.
///
/// The sample is parsed and validated locally first; a rejected sample
/// never reaches the cloud API. On success the original bytes are
/// forwarded untouched (base64-encoded) and the returned voice id is
/// persisted.
pub async fn clone_voice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CloneResponse>> {
    let mut name: Option<String> = None;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| Error::InvalidRequest(format!("invalid multipart body: {err}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| Error::InvalidRequest(format!("unreadable name field: {err}")))?;
                name = Some(value);
            }
            "audio" => {
                let bytes = field.bytes().await.map_err(|err| {
                    Error::InvalidRequest(format!("unreadable audio field: {err}"))
                })?;
                audio = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::InvalidRequest("`name` field is required".to_string()))?;
    let audio =
        audio.ok_or_else(|| Error::InvalidRequest("`audio` file field is required".to_string()))?;

    let sample = wav::validate_clone_sample(&audio)?;
    if !sample.warnings.is_empty() {
        tracing::debug!(name = %name, warnings = ?sample.warnings, "sample accepted with warnings");
    }

    let payload = ClonePayload {
        name: name.clone(),
        audio: BASE64.encode(&audio),
        audio_format: constants::DEFAULT_AUDIO_FORMAT.to_string(),
    };
    let cloned = state.cloud.clone_voice(&payload).await?;

    let record = ClonedVoiceRecord {
        voice_id: cloned.voice_id,
        name,
        created_at: Utc::now(),
    };
    state.voices.append(record.clone()).await?;
    tracing::info!(voice_id = %record.voice_id, name = %record.name, "cloned voice registered");

    Ok(Json(CloneResponse {
        voice_id: record.voice_id,
        name: record.name,
        created_at: record.created_at,
        sample: SampleReport::from(&sample.info),
        warnings: sample.warnings,
    }))
}

/// All cloned voices known to this instance.
pub async fn list_voices(State(state): State<AppState>) -> Json<serde_json::Value> {
    let voices = state.voices.list().await;
    Json(serde_json::json!({
        "count": voices.len(),
        "voices": voices,
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn build_synthesis_payload(
    state: &AppState,
    request: &SynthesizeRequest,
) -> Result<SynthesisPayload> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(Error::InvalidRequest("`text` must not be empty".to_string()));
    }
    let voice_id = request
        .voice_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(&state.config.cloud.default_voice_id)
        .to_string();
    Ok(SynthesisPayload::new(text, voice_id, request.speed))
}

fn named_event<T: Serialize>(name: &str, data: &T) -> Result<Event> {
    Ok(Event::default()
        .event(name)
        .data(serde_json::to_string(data)?))
}

/// Slice `payload` into `count` equal pieces by ceil division; the last
/// piece absorbs the remainder. Base64 is ASCII, so byte offsets always
/// land on char boundaries.
fn split_into_pieces(payload: &str, count: usize) -> Vec<&str> {
    if payload.is_empty() {
        return Vec::new();
    }
    let size = payload.len().div_ceil(count).max(1);
    let mut pieces = Vec::with_capacity(count);
    let mut start = 0;
    while start < payload.len() {
        let end = usize::min(start + size, payload.len());
        pieces.push(&payload[start..end]);
        start = end;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_splits_into_five_equal_pieces() {
        let payload = "a".repeat(100);
        let pieces = split_into_pieces(&payload, 5);
        assert_eq!(pieces.len(), 5);
        assert!(pieces.iter().all(|p| p.len() == 20));
    }

    #[test]
    fn last_piece_absorbs_the_remainder() {
        let payload = "b".repeat(101);
        let pieces = split_into_pieces(&payload, 5);
        assert_eq!(pieces.len(), 5);
        assert_eq!(pieces[0].len(), 21);
        assert_eq!(pieces[4].len(), 17);
        assert_eq!(pieces.concat(), payload);
    }

    #[test]
    fn tiny_payload_yields_fewer_pieces() {
        let pieces = split_into_pieces("abc", 5);
        assert_eq!(pieces, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_payload_yields_no_pieces() {
        assert!(split_into_pieces("", 5).is_empty());
    }

    #[test]
    fn reassembly_is_lossless() {
        let payload = "c".repeat(12_345);
        assert_eq!(split_into_pieces(&payload, 5).concat(), payload);
    }
}
