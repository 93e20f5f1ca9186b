//! Hardware keys
//!
//! The handset has four capacitive keys under the screen (Back, Menu, Home,
//! Search), a clickable trackball, a power key on the top edge and a volume
//! rocker. The trackball press is delivered as `Search`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical keys on the chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareKey {
    Back,
    Menu,
    Home,
    Search, // Capacitive search key and trackball press
    Power,
    VolUp,
    VolDown,
}

impl HardwareKey {
    /// Get all keys, in chassis order
    pub fn all() -> &'static [HardwareKey] {
        &[
            HardwareKey::Back,
            HardwareKey::Menu,
            HardwareKey::Home,
            HardwareKey::Search,
            HardwareKey::Power,
            HardwareKey::VolUp,
            HardwareKey::VolDown,
        ]
    }

    /// Get key name
    pub fn name(&self) -> &'static str {
        match self {
            HardwareKey::Back => "back",
            HardwareKey::Menu => "menu",
            HardwareKey::Home => "home",
            HardwareKey::Search => "search",
            HardwareKey::Power => "power",
            HardwareKey::VolUp => "vol_up",
            HardwareKey::VolDown => "vol_down",
        }
    }

    /// Parse from a key name. `trackball` is accepted as an alias for `search`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "back" => Some(HardwareKey::Back),
            "menu" => Some(HardwareKey::Menu),
            "home" => Some(HardwareKey::Home),
            "search" | "trackball" => Some(HardwareKey::Search),
            "power" => Some(HardwareKey::Power),
            "vol_up" | "volume_up" => Some(HardwareKey::VolUp),
            "vol_down" | "volume_down" => Some(HardwareKey::VolDown),
            _ => None,
        }
    }

    /// Whether the key sits on the capacitive strip below the screen
    pub fn is_capacitive(&self) -> bool {
        matches!(
            self,
            HardwareKey::Back | HardwareKey::Menu | HardwareKey::Home | HardwareKey::Search
        )
    }
}

impl fmt::Display for HardwareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(HardwareKey::Back.name(), "back");
        assert_eq!(HardwareKey::VolDown.name(), "vol_down");
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(HardwareKey::parse("POWER"), Some(HardwareKey::Power));
        assert_eq!(HardwareKey::parse("trackball"), Some(HardwareKey::Search));
        assert_eq!(HardwareKey::parse(" volume_up "), Some(HardwareKey::VolUp));
        assert_eq!(HardwareKey::parse("camera"), None);
    }

    #[test]
    fn test_names_parse_back() {
        for key in HardwareKey::all() {
            assert_eq!(HardwareKey::parse(key.name()), Some(*key));
        }
    }

    #[test]
    fn test_capacitive_strip() {
        let strip: Vec<_> = HardwareKey::all()
            .iter()
            .filter(|k| k.is_capacitive())
            .collect();
        assert_eq!(strip.len(), 4);
        assert!(!HardwareKey::Power.is_capacitive());
    }
}
