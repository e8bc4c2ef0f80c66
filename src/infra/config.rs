// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the platform API. PULSEDECK_API_URL overrides this.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".into(),
            timeout_seconds: 30,
        }
    }
}

impl ApiConfig {
    /// Effective base URL: env override wins over the config file.
    pub fn effective_base_url(&self) -> String {
        std::env::var("PULSEDECK_API_URL").unwrap_or_else(|_| self.base_url.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Staleness window in seconds. Entries older than this are refetched.
    pub stale_after_seconds: u64,
    /// Extra attempts after a retriable failure.
    pub retry_attempts: u32,
    /// Delay before the retry attempt.
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after_seconds: 300,
            retry_attempts: 1,
            retry_delay_ms: 500,
        }
    }
}

impl CacheConfig {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Capture command override. When unset, sox/arecord are probed on PATH.
    pub capture_command: Option<String>,
    /// Playback command override. When unset, aplay/afplay are probed.
    pub playback_command: Option<String>,
    /// Hard cap on a single recording, in seconds.
    #[serde(default = "default_max_record_seconds")]
    pub max_record_seconds: u64,
}

fn default_max_record_seconds() -> u64 {
    60
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            capture_command: None,
            playback_command: None,
            max_record_seconds: default_max_record_seconds(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(c.api.timeout_seconds, 30);
        assert_eq!(c.cache.stale_after_seconds, 300);
        assert_eq!(c.cache.retry_attempts, 1);
        assert_eq!(c.voice.max_record_seconds, 60);
        assert!(c.voice.capture_command.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = "";
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cache.stale_after_seconds, 300);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[api]
base_url = "https://api.example.com/v1"
timeout_seconds = 10

[cache]
stale_after_seconds = 60
retry_attempts = 2
retry_delay_ms = 100

[voice]
capture_command = "sox -d -t wav -"
max_record_seconds = 30
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com/v1");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.cache.stale_after_seconds, 60);
        assert_eq!(config.cache.retry_attempts, 2);
        assert_eq!(config.cache.retry_delay_ms, 100);
        assert_eq!(
            config.voice.capture_command.as_deref(),
            Some("sox -d -t wav -")
        );
        assert_eq!(config.voice.max_record_seconds, 30);
    }

    #[test]
    fn test_stale_after_duration() {
        let c = CacheConfig::default();
        assert_eq!(c.stale_after(), Duration::from_secs(300));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.base_url, config.api.base_url);
        assert_eq!(
            deserialized.cache.stale_after_seconds,
            config.cache.stale_after_seconds
        );
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
