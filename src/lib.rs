//! Demo web service over a cloud text-to-speech / voice-cloning API.
//!
//! All synthesis and voice modeling happens in the remote service; this
//! crate marshals HTTP requests, validates upload shape and re-serializes
//! responses. Three endpoints matter:
//!
//! + `POST /api/tts`: synchronous synthesis, the complete base64 clip in
//!   one JSON reply.
//! + `POST /api/tts/stream`: the same synthesis delivered as server-sent
//!   events. The finished base64 payload is sliced into five pieces and
//!   drip-fed with fixed delays so a UI can animate progressive playback.
//!   There is no incremental synthesis behind it.
//! + `POST /api/voices/clone`: multipart WAV upload. The container is
//!   parsed and validated locally ([wav]) before the original bytes are
//!   forwarded to the cloning API; accepted voices land as JSON records in
//!   a flat file ([store]).
//!
//! Configuration comes from an optional `speechgate.toml` plus
//! `SPEECHGATE__*` environment variables ([config]). The cloud client
//! handle is built once from those settings and passed explicitly through
//! [server::AppState]; nothing is constructed per request.
//!
//! The only real parsing logic in the crate is the RIFF/WAVE chunk walk in
//! [wav]; everything else is route glue around the remote API.

mod constants;

pub mod cloud;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod wav;
