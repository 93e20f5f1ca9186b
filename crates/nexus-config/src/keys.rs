//! Keyboard bindings for the simulated hardware keys
//!
//! Bindings map an action to a terminal key name (`esc`, `f1`, `pageup`,
//! a single character, ...). Function keys are used by default so that
//! printable characters stay free for the virtual keyboard.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Actions that can be bound to a terminal key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Back,
    Menu,
    Home,
    Search,
    Power,
    VolumeUp,
    VolumeDown,
    /// Plug or unplug the charger
    ToggleCharger,
    /// Leave the simulator
    Quit,
}

impl KeyAction {
    pub fn all() -> &'static [KeyAction] {
        &[
            KeyAction::Back,
            KeyAction::Menu,
            KeyAction::Home,
            KeyAction::Search,
            KeyAction::Power,
            KeyAction::VolumeUp,
            KeyAction::VolumeDown,
            KeyAction::ToggleCharger,
            KeyAction::Quit,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            KeyAction::Back => "Back",
            KeyAction::Menu => "Menu",
            KeyAction::Home => "Home",
            KeyAction::Search => "Search",
            KeyAction::Power => "Power",
            KeyAction::VolumeUp => "Vol+",
            KeyAction::VolumeDown => "Vol-",
            KeyAction::ToggleCharger => "Charger",
            KeyAction::Quit => "Quit",
        }
    }
}

/// Key binding configuration, one terminal key per action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub back: String,
    pub menu: String,
    pub home: String,
    pub search: String,
    pub power: String,
    pub volume_up: String,
    pub volume_down: String,
    pub toggle_charger: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            back: "esc".to_string(),
            menu: "f1".to_string(),
            home: "f2".to_string(),
            search: "f3".to_string(),
            power: "f4".to_string(),
            volume_up: "pageup".to_string(),
            volume_down: "pagedown".to_string(),
            toggle_charger: "f5".to_string(),
            quit: "f10".to_string(),
        }
    }
}

impl KeyBindings {
    /// Get the key bound to an action
    pub fn key_for(&self, action: KeyAction) -> &str {
        match action {
            KeyAction::Back => &self.back,
            KeyAction::Menu => &self.menu,
            KeyAction::Home => &self.home,
            KeyAction::Search => &self.search,
            KeyAction::Power => &self.power,
            KeyAction::VolumeUp => &self.volume_up,
            KeyAction::VolumeDown => &self.volume_down,
            KeyAction::ToggleCharger => &self.toggle_charger,
            KeyAction::Quit => &self.quit,
        }
    }

    /// Find the action bound to a key name (case-insensitive)
    pub fn action_for(&self, key: &str) -> Option<KeyAction> {
        KeyAction::all()
            .iter()
            .copied()
            .find(|action| self.key_for(*action).eq_ignore_ascii_case(key))
    }

    pub fn bind(&mut self, action: KeyAction, key: String) {
        let slot = match action {
            KeyAction::Back => &mut self.back,
            KeyAction::Menu => &mut self.menu,
            KeyAction::Home => &mut self.home,
            KeyAction::Search => &mut self.search,
            KeyAction::Power => &mut self.power,
            KeyAction::VolumeUp => &mut self.volume_up,
            KeyAction::VolumeDown => &mut self.volume_down,
            KeyAction::ToggleCharger => &mut self.toggle_charger,
            KeyAction::Quit => &mut self.quit,
        };
        *slot = key;
    }

    /// Key names bound to more than one action
    pub fn conflicts(&self) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for action in KeyAction::all() {
            *seen.entry(self.key_for(*action).to_lowercase()).or_default() += 1;
        }
        let mut dupes: Vec<String> = seen
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(k, _)| k)
            .collect();
        dupes.sort();
        dupes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(keys.key_for(KeyAction::Power), "f4");
        assert_eq!(keys.action_for("ESC"), Some(KeyAction::Back));
        assert_eq!(keys.action_for("x"), None);
        assert!(keys.conflicts().is_empty());
    }

    #[test]
    fn test_rebinding_detects_conflict() {
        let mut keys = KeyBindings::default();
        keys.bind(KeyAction::Home, "esc".into());
        assert_eq!(keys.conflicts(), vec!["esc".to_string()]);
    }

    #[test]
    fn test_partial_table() {
        let keys: KeyBindings = toml::from_str(r#"power = "p""#).unwrap();
        assert_eq!(keys.action_for("p"), Some(KeyAction::Power));
        assert_eq!(keys.key_for(KeyAction::Back), "esc");
    }
}
