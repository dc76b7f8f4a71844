//! RIFF/WAVE container inspection.
//!
//! Clone uploads are gated on a pre-flight parse of the WAV header: the
//! buffer is walked chunk by chunk, format fields are pulled out of the
//! `fmt ` chunk and the PCM payload size out of the `data` chunk, and the
//! derived duration decides whether the upload is forwarded to the cloud
//! cloning API at all. The audio bytes themselves are never modified.

use thiserror::Error;

/// Minimal size of a canonical WAV file (12-byte RIFF/WAVE header,
/// 24-byte `fmt ` chunk, 8-byte `data` chunk header).
const MIN_HEADER_LEN: usize = 44;

/// Sample rate the cloning API is tuned for. Other rates are accepted
/// with a warning.
pub const IDEAL_SAMPLE_RATE: u32 = 16_000;

/// Enforced lower bound on clip duration. Clips under this are rejected
/// before any upstream call. The UI copy recommends 5-12s, but the
/// enforced minimum is 4s.
pub const MIN_CLIP_SECONDS: f64 = 4.0;

/// Upper bound of the recommended clip duration. Longer clips are
/// accepted with a warning.
pub const RECOMMENDED_MAX_SECONDS: f64 = 12.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WavError {
    #[error("buffer of {0} bytes is smaller than a minimal WAV header")]
    TooSmall(usize),
    #[error("not a RIFF/WAVE container")]
    NotRiffWave,
    #[error("malformed chunk table, no usable fmt chunk found")]
    MalformedChunkTable,
    #[error("degenerate format, zero sample rate, channel count or bit depth")]
    DegenerateFormat,
}

/// Format fields extracted from a WAV container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormatInfo {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub bits_per_sample: u16,
    /// Declared size of the `data` chunk payload in bytes.
    pub data_byte_size: u32,
    /// True when no `data` chunk was found and the payload size was
    /// estimated from the bytes remaining after the last readable chunk
    /// header.
    pub is_estimated: bool,
}

impl WaveFormatInfo {
    /// Playable duration derived from the declared PCM payload size.
    ///
    /// Callers must only see this after a successful parse, which
    /// guarantees the divisor is non-zero.
    pub fn duration_seconds(&self) -> f64 {
        let bytes_per_second = f64::from(self.sample_rate)
            * f64::from(self.channel_count)
            * (f64::from(self.bits_per_sample) / 8.0);
        f64::from(self.data_byte_size) / bytes_per_second
    }
}

/// Parse the RIFF chunk table of `buffer` and extract format metadata.
///
/// The walk tolerates non-standard chunk ordering and unknown chunks;
/// it does not assume the `data` chunk sits at a fixed offset. Odd-sized
/// chunks are skipped with their word-alignment pad byte. A zero-size
/// chunk or a skip that would overrun the buffer terminates the walk; if
/// a `fmt ` chunk was already seen, the remaining bytes are treated as an
/// estimate of the PCM payload instead of failing outright.
pub fn parse_wave_info(buffer: &[u8]) -> Result<WaveFormatInfo, WavError> {
    if buffer.len() < MIN_HEADER_LEN {
        return Err(WavError::TooSmall(buffer.len()));
    }
    if &buffer[0..4] != b"RIFF" || &buffer[8..12] != b"WAVE" {
        return Err(WavError::NotRiffWave);
    }

    let mut format: Option<(u32, u16, u16)> = None;
    let mut data_byte_size: Option<u32> = None;
    let mut cursor = 12usize;

    while cursor + 8 <= buffer.len() {
        let id = &buffer[cursor..cursor + 4];
        let size = u32::from_le_bytes([
            buffer[cursor + 4],
            buffer[cursor + 5],
            buffer[cursor + 6],
            buffer[cursor + 7],
        ]) as usize;

        if id == b"data" {
            // Only the declared size matters; the payload is not re-read.
            data_byte_size = Some(size as u32);
            break;
        }

        if id == b"fmt " {
            let payload = cursor + 8;
            if size < 16 || payload + 16 > buffer.len() {
                return Err(WavError::MalformedChunkTable);
            }
            let channel_count = u16::from_le_bytes([buffer[payload + 2], buffer[payload + 3]]);
            let sample_rate = u32::from_le_bytes([
                buffer[payload + 4],
                buffer[payload + 5],
                buffer[payload + 6],
                buffer[payload + 7],
            ]);
            let bits_per_sample = u16::from_le_bytes([buffer[payload + 14], buffer[payload + 15]]);
            format = Some((sample_rate, channel_count, bits_per_sample));
        }

        if size == 0 {
            // A zero-size chunk would never advance the cursor.
            break;
        }

        // RIFF chunks are word-aligned: odd sizes carry one pad byte.
        let next = cursor + 8 + size + (size & 1);
        if next > buffer.len() {
            break;
        }
        cursor = next;
    }

    let Some((sample_rate, channel_count, bits_per_sample)) = format else {
        return Err(WavError::MalformedChunkTable);
    };

    let (data_byte_size, is_estimated) = match data_byte_size {
        Some(size) => (size, false),
        None => (buffer.len().saturating_sub(cursor + 8) as u32, true),
    };

    if sample_rate == 0 || channel_count == 0 || bits_per_sample == 0 {
        return Err(WavError::DegenerateFormat);
    }

    Ok(WaveFormatInfo {
        sample_rate,
        channel_count,
        bits_per_sample,
        data_byte_size,
        is_estimated,
    })
}

/// Advisory tags attached to an accepted clone sample. Warnings never
/// block the upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleWarning {
    /// Sample rate differs from the 16kHz the cloning API is tuned for.
    NonIdealSampleRate,
    /// Clip runs past the recommended 12s.
    LongerThanRecommended,
}

/// An accepted clone sample: parsed format plus advisory warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSample {
    pub info: WaveFormatInfo,
    pub warnings: Vec<SampleWarning>,
}

/// Why an upload was refused before reaching the cloning API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleRejected {
    #[error(transparent)]
    Wav(#[from] WavError),
    #[error("reference clip is {seconds:.1}s long, at least 4s of audio is required")]
    TooShort { seconds: f64 },
}

/// Apply the upload policy on top of [`parse_wave_info`].
///
/// Too-short clips are a hard reject; a non-ideal sample rate and an
/// over-long clip only produce warnings on the accepted result.
pub fn validate_clone_sample(buffer: &[u8]) -> Result<ValidatedSample, SampleRejected> {
    let info = parse_wave_info(buffer)?;
    let seconds = info.duration_seconds();

    if seconds < MIN_CLIP_SECONDS {
        return Err(SampleRejected::TooShort { seconds });
    }

    let mut warnings = Vec::new();
    if info.sample_rate != IDEAL_SAMPLE_RATE {
        warnings.push(SampleWarning::NonIdealSampleRate);
    }
    if seconds > RECOMMENDED_MAX_SECONDS {
        warnings.push(SampleWarning::LongerThanRecommended);
    }

    Ok(ValidatedSample { info, warnings })
}
