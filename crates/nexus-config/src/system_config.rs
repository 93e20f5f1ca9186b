//! Launcher-level settings: logging and the assistant service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file; the terminal belongs to the UI. Defaults to the temp dir.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl LoggingSettings {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("nexus-launcher.log"))
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: default_filter(),
        }
    }
}

/// Generative content endpoint used by the assistant app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_text_model")]
    pub text_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl AssistantSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_default() {
        let logging = LoggingSettings::default();
        assert!(logging.file_path().ends_with("nexus-launcher.log"));
        assert_eq!(logging.filter, "info");
    }

    #[test]
    fn test_assistant_defaults() {
        let assistant = AssistantSettings::default();
        assert_eq!(assistant.timeout(), Duration::from_secs(30));
        assert!(assistant.endpoint.starts_with("https://"));
    }

    #[test]
    fn test_missing_api_key() {
        let assistant = AssistantSettings {
            api_key_env: "NEXUS_TEST_UNSET_API_KEY_VAR".into(),
            ..AssistantSettings::default()
        };
        assert!(assistant.api_key().is_none());
    }
}
