//! Device state types shared by the controller and its renderers

use serde::Serialize;
use std::fmt;

/// System power state. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    Off,
    /// Initial state of a never-booted device
    Recovery,
    BootLogo,
    BootAnimation,
    SetupWizard,
    Home,
    AppOpen,
}

impl PowerState {
    pub fn name(&self) -> &'static str {
        match self {
            PowerState::Off => "off",
            PowerState::Recovery => "recovery",
            PowerState::BootLogo => "boot_logo",
            PowerState::BootAnimation => "boot_animation",
            PowerState::SetupWizard => "setup_wizard",
            PowerState::Home => "home",
            PowerState::AppOpen => "app_open",
        }
    }

    /// The timed boot chain, during which input is dropped
    pub fn is_booting(&self) -> bool {
        matches!(self, PowerState::BootLogo | PowerState::BootAnimation)
    }

    /// Home screen or an app: overlays and a foreground app are meaningful
    pub fn is_interactive(&self) -> bool {
        matches!(self, PowerState::Home | PowerState::AppOpen)
    }

    /// States the battery can empty in without forcing a shutdown
    pub fn survives_empty_battery(&self) -> bool {
        matches!(self, PowerState::Off | PowerState::Recovery)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a running boot sequence ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BootTarget {
    /// Cold boot from `Off`
    Home,
    /// First boot from `Recovery`
    SetupWizard,
}

impl From<BootTarget> for PowerState {
    fn from(target: BootTarget) -> Self {
        match target {
            BootTarget::Home => PowerState::Home,
            BootTarget::SetupWizard => PowerState::SetupWizard,
        }
    }
}

/// Visibility of the transient UI layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overlays {
    pub drawer: bool,
    pub menu: bool,
    pub shade: bool,
    pub keyboard: bool,
}

impl Overlays {
    pub fn any(&self) -> bool {
        self.drawer || self.menu || self.shade || self.keyboard
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Layer closed by a single Back press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackLayer {
    Shade,
    Menu,
    App,
    Drawer,
}

/// One-shot user notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Notice {
    BatteryEmpty,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::BatteryEmpty => "Battery is empty. Please connect charger.",
        }
    }
}

/// Everything a renderer reads, captured at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub power: PowerState,
    pub battery_level: u8,
    pub charging: bool,
    pub battery_low: bool,
    pub foreground_app: Option<String>,
    pub overlays: Overlays,
    pub time: String,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_classes() {
        assert!(PowerState::BootLogo.is_booting());
        assert!(!PowerState::SetupWizard.is_booting());
        assert!(PowerState::AppOpen.is_interactive());
        assert!(!PowerState::SetupWizard.is_interactive());
        assert!(PowerState::Recovery.survives_empty_battery());
        assert!(!PowerState::BootAnimation.survives_empty_battery());
    }

    #[test]
    fn test_boot_target_state() {
        assert_eq!(PowerState::from(BootTarget::Home), PowerState::Home);
        assert_eq!(
            PowerState::from(BootTarget::SetupWizard),
            PowerState::SetupWizard
        );
    }

    #[test]
    fn test_overlays_clear() {
        let mut overlays = Overlays {
            shade: true,
            keyboard: true,
            ..Overlays::default()
        };
        assert!(overlays.any());
        overlays.clear();
        assert!(!overlays.any());
    }

    #[test]
    fn test_notice_message() {
        assert!(Notice::BatteryEmpty.message().contains("charger"));
    }
}
