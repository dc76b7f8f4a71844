//! HTTP surface: shared state and router.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cloud::CloudSpeechClient;
use crate::config::Settings;
use crate::error::Result;
use crate::store::VoiceStore;

/// State shared across all handlers. Everything is passed explicitly;
/// nothing here is a process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub cloud: Arc<CloudSpeechClient>,
    pub voices: Arc<VoiceStore>,
}

impl AppState {
    pub fn new(config: Settings) -> Result<Self> {
        let cloud = CloudSpeechClient::new(&config.cloud)?;
        let voices = VoiceStore::open(&config.store.voices_path)?;
        Ok(Self {
            config: Arc::new(config),
            cloud: Arc::new(cloud),
            voices: Arc::new(voices),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let max_upload = state.config.server.max_upload_bytes;
    Router::new()
        .route("/api/tts", post(handlers::synthesize))
        .route("/api/tts/stream", post(handlers::synthesize_stream))
        .route("/api/voices/clone", post(handlers::clone_voice))
        .route("/api/voices", get(handlers::list_voices))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
