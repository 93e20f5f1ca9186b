//! Power management
//!
//! Simulated battery: one percentage point per tick, up while the charger is
//! connected and down otherwise. The tick cadence depends on the charger.

use std::time::Duration;

/// Battery charging status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStatus {
    Charging,
    Discharging,
    Full,
    Empty,
}

impl BatteryStatus {
    /// Label shown on the charger panel
    pub fn label(&self) -> &'static str {
        match self {
            BatteryStatus::Charging => "CHARGING",
            BatteryStatus::Discharging => "DRAINING",
            BatteryStatus::Full => "FULL",
            BatteryStatus::Empty => "EMPTY",
        }
    }
}

/// Battery simulation configuration
#[derive(Debug, Clone)]
pub struct PowerConfig {
    pub initial_level: u8,
    pub charging: bool,
    pub charge_interval: Duration,
    pub drain_interval: Duration,
    pub low_battery_threshold: u8,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            initial_level: 85,
            charging: false,
            charge_interval: Duration::from_millis(500),
            drain_interval: Duration::from_millis(25_000),
            low_battery_threshold: 20,
        }
    }
}

/// Outcome of a single battery tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryTick {
    pub previous: u8,
    pub level: u8,
}

impl BatteryTick {
    pub fn changed(&self) -> bool {
        self.previous != self.level
    }

    /// The level is zero after this tick
    pub fn is_empty(&self) -> bool {
        self.level == 0
    }
}

/// Simulated battery
#[derive(Debug, Clone)]
pub struct Battery {
    config: PowerConfig,
    level: u8,
    charging: bool,
}

impl Battery {
    /// Create a battery at the configured initial level
    pub fn new(config: PowerConfig) -> Self {
        let level = config.initial_level.min(100);
        let charging = config.charging;
        Self {
            config,
            level,
            charging,
        }
    }

    /// Current level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Connect or disconnect the charger. Returns true if the flag changed.
    pub fn set_charging(&mut self, charging: bool) -> bool {
        if self.charging == charging {
            return false;
        }
        self.charging = charging;
        tracing::info!(
            "Charger {} at {}%",
            if charging { "connected" } else { "disconnected" },
            self.level
        );
        true
    }

    /// Period between battery ticks for the current charger state
    pub fn tick_interval(&self) -> Duration {
        if self.charging {
            self.config.charge_interval
        } else {
            self.config.drain_interval
        }
    }

    /// Apply one tick: +1 while charging, -1 otherwise, clamped to [0, 100]
    pub fn tick(&mut self) -> BatteryTick {
        let previous = self.level;
        self.level = if self.charging {
            self.level.saturating_add(1).min(100)
        } else {
            self.level.saturating_sub(1)
        };
        tracing::debug!("Battery tick: {}% -> {}%", previous, self.level);
        BatteryTick {
            previous,
            level: self.level,
        }
    }

    /// Force the level (clamped), e.g. when restoring a simulated scenario
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    pub fn status(&self) -> BatteryStatus {
        if self.charging {
            if self.level >= 100 {
                BatteryStatus::Full
            } else {
                BatteryStatus::Charging
            }
        } else if self.level == 0 {
            BatteryStatus::Empty
        } else {
            BatteryStatus::Discharging
        }
    }

    /// Below the low-battery threshold and not charging
    pub fn is_low(&self) -> bool {
        self.level < self.config.low_battery_threshold && !self.charging
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    pub fn config(&self) -> &PowerConfig {
        &self.config
    }
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(PowerConfig::default())
    }
}
