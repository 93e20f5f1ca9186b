//! Configuration management for the Nexus handset simulator
//!
//! Handles device simulation timings, key bindings, audio, logging and the
//! assistant endpoint. Configuration is TOML; `load_default` layers the user
//! or system file under `NEXUS_*` environment overrides, e.g.
//! `NEXUS_POWER__DRAIN_INTERVAL_MS=1000`.

mod device_config;
mod keys;
mod system_config;

pub use device_config::{
    AppSettings, AudioSettings, BootSettings, ClockSettings, DeviceSettings, PowerSettings,
};
pub use keys::{KeyAction, KeyBindings};
pub use system_config::{AssistantSettings, LoggingSettings};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Layered configuration error: {0}")]
    Layered(#[from] config::ConfigError),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/nexus";
pub const CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "NEXUS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NexusConfig {
    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub power: PowerSettings,

    #[serde(default)]
    pub boot: BootSettings,

    #[serde(default)]
    pub clock: ClockSettings,

    #[serde(default)]
    pub apps: AppSettings,

    #[serde(default)]
    pub keys: KeyBindings,

    #[serde(default)]
    pub audio: AudioSettings,

    #[serde(default)]
    pub assistant: AssistantSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl NexusConfig {
    /// Load configuration from a single TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an optional file overlaid with `<env_prefix>_SECTION__KEY` variables
    pub fn load_layered(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let layered = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = layered.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default locations with environment overrides
    pub fn load_default() -> Result<Self, ConfigError> {
        // Try user config first, then system config
        let candidates = [user_config_path(), Some(Path::new(CONFIG_DIR).join(CONFIG_FILE))];
        let found = candidates.into_iter().flatten().find(|p| p.exists());

        match &found {
            Some(path) => tracing::info!("Loading configuration from {}", path.display()),
            None => tracing::warn!("No configuration file found, using defaults"),
        }

        Self::load_layered(found.as_deref(), ENV_PREFIX)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.power.initial_level > 100 {
            return Err(ConfigError::Invalid(format!(
                "power.initial_level must be 0-100, got {}",
                self.power.initial_level
            )));
        }

        let periods = [
            ("power.charge_interval_ms", self.power.charge_interval_ms),
            ("power.drain_interval_ms", self.power.drain_interval_ms),
            ("boot.logo_ms", self.boot.logo_ms),
            ("boot.animation_ms", self.boot.animation_ms),
            ("clock.tick_ms", self.clock.tick_ms),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be non-zero", name)));
            }
        }

        if let Some(minutes) = self.clock.utc_offset_minutes {
            if minutes.abs() >= 24 * 60 {
                return Err(ConfigError::Invalid(format!(
                    "clock.utc_offset_minutes must be within one day, got {}",
                    minutes
                )));
            }
        }

        if self.audio.volume > 100 {
            return Err(ConfigError::Invalid(format!(
                "audio.volume must be 0-100, got {}",
                self.audio.volume
            )));
        }

        let conflicts = self.keys.conflicts();
        if !conflicts.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "keys bound more than once: {}",
                conflicts.join(", ")
            )));
        }

        Ok(())
    }
}

/// `$HOME/.config/nexus/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("nexus")
            .join(CONFIG_FILE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = NexusConfig::default();
        assert_eq!(config.power.initial_level, 85);
        assert!(!config.power.charging);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = NexusConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: NexusConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.power.drain_interval_ms, parsed.power.drain_interval_ms);
        assert_eq!(config.keys.power, parsed.keys.power);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/etc/nexus/config.toml"));
        assert!(format!("{}", err).contains("not found"));

        let err = ConfigError::Invalid("test error".to_string());
        assert!(format!("{}", err).contains("Invalid"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[power]
initial_level = 40
charging = true

[boot]
logo_ms = 100

[keys]
power = "p"
"#;
        write!(temp_file, "{}", config_content).unwrap();

        let config = NexusConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.power.initial_level, 40);
        assert!(config.power.charging);
        assert_eq!(config.boot.logo_ms, 100);
        assert_eq!(config.boot.animation_ms, 4_000);
        assert_eq!(config.keys.action_for("p"), Some(KeyAction::Power));
    }

    #[test]
    fn test_load_missing_file() {
        let err = NexusConfig::load(Path::new("/nonexistent/nexus.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[power]\ncharge_interval_ms = 0\n").unwrap();

        let err = NexusConfig::load(temp_file.path()).unwrap_err();
        assert!(format!("{}", err).contains("charge_interval_ms"));
    }

    #[test]
    fn test_rejects_key_conflict() {
        let mut config = NexusConfig::default();
        config.keys.bind(KeyAction::Quit, "esc".into());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_clock_offset_defaults_to_local_time() {
        let mut config = NexusConfig::default();
        assert_eq!(config.clock.utc_offset_minutes, None);

        config.clock.utc_offset_minutes = Some(24 * 60);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.clock.utc_offset_minutes = Some(-330);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = NexusConfig::default();
        config.power.initial_level = 12;

        config.save(temp_file.path()).unwrap();

        let loaded = NexusConfig::load(temp_file.path()).unwrap();
        assert_eq!(loaded.power.initial_level, 12);
    }

    #[test]
    fn test_layered_file_only() {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(temp_file, "[device]\nprofile = \"/opt/profiles/dream.toml\"\n").unwrap();
        write!(temp_file, "[clock]\nutc_offset_minutes = -300\n").unwrap();

        let config =
            NexusConfig::load_layered(Some(temp_file.path()), "NEXUSLAYERFILETEST").unwrap();
        assert_eq!(config.clock.utc_offset_minutes, Some(-300));
        assert_eq!(
            config.device.profile.as_deref(),
            Some(Path::new("/opt/profiles/dream.toml"))
        );
        assert_eq!(config.power.initial_level, 85);
    }

    #[test]
    fn test_layered_env_overrides_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(temp_file, "[power]\ndrain_interval_ms = 9000\ninitial_level = 50\n").unwrap();

        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("NEXUSLAYERENVTEST_POWER__DRAIN_INTERVAL_MS", "1000");
        }
        let config =
            NexusConfig::load_layered(Some(temp_file.path()), "NEXUSLAYERENVTEST").unwrap();
        unsafe {
            std::env::remove_var("NEXUSLAYERENVTEST_POWER__DRAIN_INTERVAL_MS");
        }

        assert_eq!(config.power.drain_interval_ms, 1000);
        assert_eq!(config.power.initial_level, 50);
    }

    #[test]
    fn test_constants() {
        assert_eq!(CONFIG_DIR, "/etc/nexus");
        assert_eq!(ENV_PREFIX, "NEXUS");
    }
}
