//! Device simulation settings: chassis, battery, boot timings, clock, apps, audio

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Simulated chassis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// TOML device profile; the stock Nexus One when unset
    #[serde(default)]
    pub profile: Option<PathBuf>,
}

/// Battery simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerSettings {
    /// Battery level at startup (percentage)
    #[serde(default = "default_initial_level")]
    pub initial_level: u8,

    /// Charger connected at startup
    #[serde(default)]
    pub charging: bool,

    /// Battery tick period while charging
    #[serde(default = "default_charge_interval")]
    pub charge_interval_ms: u64,

    /// Battery tick period while draining
    #[serde(default = "default_drain_interval")]
    pub drain_interval_ms: u64,

    /// Battery indicator turns red below this level
    #[serde(default = "default_low_battery")]
    pub low_battery_threshold: u8,
}

fn default_initial_level() -> u8 {
    85
}

fn default_charge_interval() -> u64 {
    500
}

fn default_drain_interval() -> u64 {
    25_000
}

fn default_low_battery() -> u8 {
    20
}

impl PowerSettings {
    pub fn charge_interval(&self) -> Duration {
        Duration::from_millis(self.charge_interval_ms)
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }
}

impl Default for PowerSettings {
    fn default() -> Self {
        Self {
            initial_level: default_initial_level(),
            charging: false,
            charge_interval_ms: default_charge_interval(),
            drain_interval_ms: default_drain_interval(),
            low_battery_threshold: default_low_battery(),
        }
    }
}

/// Boot sequence timings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootSettings {
    /// Time on the boot logo before the animation starts
    #[serde(default = "default_logo_ms")]
    pub logo_ms: u64,

    /// Length of the boot animation
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
}

fn default_logo_ms() -> u64 {
    2_000
}

fn default_animation_ms() -> u64 {
    4_000
}

impl BootSettings {
    pub fn logo(&self) -> Duration {
        Duration::from_millis(self.logo_ms)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

impl Default for BootSettings {
    fn default() -> Self {
        Self {
            logo_ms: default_logo_ms(),
            animation_ms: default_animation_ms(),
        }
    }
}

/// Status bar clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockSettings {
    #[serde(default = "default_clock_tick")]
    pub tick_ms: u64,

    /// Fixed offset from UTC; host local time when unset
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

fn default_clock_tick() -> u64 {
    1_000
}

impl ClockSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_clock_tick(),
            utc_offset_minutes: None,
        }
    }
}

/// Application behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Apps that bring up the virtual keyboard when opened
    #[serde(default = "default_text_entry_apps")]
    pub text_entry: Vec<String>,
}

fn default_text_entry_apps() -> Vec<String> {
    ["gemini", "browser", "whatsapp", "messages", "gallery"]
        .into_iter()
        .map(Into::into)
        .collect()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            text_entry: default_text_entry_apps(),
        }
    }
}

/// UI sound settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Volume (0-100)
    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default)]
    pub muted: bool,

    /// Ring the terminal bell on clicks
    #[serde(default)]
    pub bell: bool,
}

fn default_volume() -> u8 {
    70
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            muted: false,
            bell: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let power = PowerSettings::default();
        assert_eq!(power.initial_level, 85);
        assert_eq!(power.charge_interval(), Duration::from_millis(500));
        assert_eq!(power.drain_interval(), Duration::from_secs(25));

        let boot = BootSettings::default();
        assert_eq!(boot.logo() + boot.animation(), Duration::from_secs(6));

        assert_eq!(ClockSettings::default().tick(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_section() {
        let power: PowerSettings = toml::from_str("charging = true").unwrap();
        assert!(power.charging);
        assert_eq!(power.drain_interval_ms, 25_000);
    }

    #[test]
    fn test_text_entry_defaults() {
        let apps = AppSettings::default();
        assert!(apps.text_entry.iter().any(|a| a == "gemini"));
        assert!(!apps.text_entry.iter().any(|a| a == "phone"));
    }
}
