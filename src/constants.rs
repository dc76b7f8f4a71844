//! Upstream endpoint paths and fixed service policy values.

/// Path of the cloud synthesis endpoint, joined onto the configured base URL.
pub const SYNTHESIS_PATH: &str = "/v1/tts/synthesize";

/// Path of the cloud voice-clone endpoint.
pub const VOICE_CLONE_PATH: &str = "/v1/voice/clone";

/// Audio container requested from the cloud API.
pub const DEFAULT_AUDIO_FORMAT: &str = "wav";

/// Number of pieces the pseudo-stream endpoint slices a finished
/// synthesis response into. The slicing exists only so the demo UI can
/// animate progressive playback.
pub const STREAM_PIECE_COUNT: usize = 5;

/// Artificial delay between successive pseudo-stream events.
pub const STREAM_PIECE_DELAY_MS: u64 = 150;
