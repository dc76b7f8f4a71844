//! Service settings.
//!
//! Loaded from an optional `speechgate.toml` next to the binary plus
//! `SPEECHGATE__`-prefixed environment variables
//! (e.g. `SPEECHGATE__CLOUD__API_KEY`). Every field has a default so the
//! service boots with no configuration present.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("speechgate").required(false))
            .add_source(Environment::with_prefix("SPEECHGATE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on upload request bodies. Clone samples are WAV files
    /// and easily exceed the framework default.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Remote speech API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the cloud API. Empty means unauthenticated demo
    /// mode; the service still boots but upstream calls will be refused.
    #[serde(default)]
    pub api_key: String,

    /// Tenant identifier forwarded with every upstream request.
    #[serde(default)]
    pub app_id: String,

    /// Voice used when a synthesis request names none.
    #[serde(default = "default_voice_id")]
    pub default_voice_id: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            app_id: String::new(),
            default_voice_id: default_voice_id(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Flat-file voice store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_voices_path")]
    pub voices_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            voices_path: default_voices_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_base_url() -> String {
    "https://api.speechcloud.example.com".to_string()
}

fn default_voice_id() -> String {
    "standard_female_1".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_voices_path() -> String {
    "voices.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.cloud.api_key.is_empty());
        assert_eq!(settings.store.voices_path, "voices.json");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                "[cloud]\napi_key = \"sk-test\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.cloud.api_key, "sk-test");
        assert_eq!(settings.cloud.timeout_seconds, 30);
        assert_eq!(settings.server.host, "0.0.0.0");
    }
}
