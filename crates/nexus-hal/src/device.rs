//! Device profile
//!
//! Describes the simulated chassis. Profiles are plain TOML so alternative
//! handsets can be described without code changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::HardwareKey;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Invalid device profile: {0}")]
    InvalidProfile(String),

    #[error("Profile declares unknown key: {0}")]
    UnknownKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Device profile containing hardware specifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub id: String,
    pub name: String,
    pub chipset: String,
    pub os_version: String,
    pub display: DisplaySpec,
    pub keys: Vec<String>,
    /// mAh
    pub battery_capacity: u32,
    #[serde(default)]
    pub has_trackball: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySpec {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_refresh")]
    pub refresh_rate: u32,
}

fn default_refresh() -> u32 {
    60
}

impl DeviceProfile {
    /// The stock handset
    pub fn nexus_one() -> Self {
        Self {
            id: "nexus_one".into(),
            name: "Nexus One".into(),
            chipset: "QSD8250".into(),
            os_version: "Android 2.3.7 (Gingerbread)".into(),
            display: DisplaySpec {
                width: 480,
                height: 800,
                refresh_rate: 60,
            },
            keys: HardwareKey::all()
                .iter()
                .map(|k| k.name().to_string())
                .collect(),
            battery_capacity: 1400,
            has_trackball: true,
        }
    }

    /// Load a profile from a TOML file
    pub fn from_profile_file(path: &Path) -> Result<Self, DeviceError> {
        let contents = fs::read_to_string(path)?;
        let profile: Self = toml::from_str(&contents)
            .map_err(|e| DeviceError::InvalidProfile(e.to_string()))?;
        profile.validate()?;
        tracing::info!("Loaded device profile {} from {}", profile.name, path.display());
        Ok(profile)
    }

    /// Every declared key must be a known hardware key
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.name.trim().is_empty() {
            return Err(DeviceError::InvalidProfile("empty name".into()));
        }
        for key in &self.keys {
            if HardwareKey::parse(key).is_none() {
                return Err(DeviceError::UnknownKey(key.clone()));
            }
        }
        Ok(())
    }

    /// Keys present on this chassis
    pub fn hardware_keys(&self) -> Vec<HardwareKey> {
        self.keys
            .iter()
            .filter_map(|k| HardwareKey::parse(k))
            .collect()
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::nexus_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_stock_profile() {
        let profile = DeviceProfile::nexus_one();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.hardware_keys().len(), 7);
        assert!(profile.has_trackball);
    }

    #[test]
    fn test_profile_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
id = "dream"
name = "T-Mobile G1"
chipset = "MSM7201A"
os_version = "Android 1.6"
keys = ["back", "menu", "home", "trackball", "power"]
battery_capacity = 1150

[display]
width = 320
height = 480
"#
        )
        .unwrap();

        let profile = DeviceProfile::from_profile_file(file.path()).unwrap();
        assert_eq!(profile.name, "T-Mobile G1");
        assert_eq!(profile.display.refresh_rate, 60);
        assert!(profile.hardware_keys().contains(&HardwareKey::Search));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut profile = DeviceProfile::nexus_one();
        profile.keys.push("camera".into());
        assert!(matches!(profile.validate(), Err(DeviceError::UnknownKey(k)) if k == "camera"));
    }
}
