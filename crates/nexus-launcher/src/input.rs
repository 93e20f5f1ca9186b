//! Terminal key translation

use crossterm::event::KeyCode;
use nexus_config::KeyAction;
use nexus_hal::HardwareKey;

/// Name of a terminal key as written in the `[keys]` config table
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };
    Some(name)
}

/// Chassis key behind a bound action, if any
pub fn hardware_key(action: KeyAction) -> Option<HardwareKey> {
    match action {
        KeyAction::Back => Some(HardwareKey::Back),
        KeyAction::Menu => Some(HardwareKey::Menu),
        KeyAction::Home => Some(HardwareKey::Home),
        KeyAction::Search => Some(HardwareKey::Search),
        KeyAction::Power => Some(HardwareKey::Power),
        KeyAction::VolumeUp => Some(HardwareKey::VolUp),
        KeyAction::VolumeDown => Some(HardwareKey::VolDown),
        KeyAction::ToggleCharger | KeyAction::Quit => None,
    }
}

/// Move a selection by `delta`, wrapping within `len`
pub fn cycle(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_config::KeyBindings;

    #[test]
    fn test_default_bindings_resolve() {
        let keys = KeyBindings::default();
        let action = key_name(KeyCode::F(4)).and_then(|n| keys.action_for(&n));
        assert_eq!(action, Some(KeyAction::Power));
        assert_eq!(hardware_key(KeyAction::Power), Some(HardwareKey::Power));

        let action = key_name(KeyCode::Esc).and_then(|n| keys.action_for(&n));
        assert_eq!(action.and_then(hardware_key), Some(HardwareKey::Back));
    }

    #[test]
    fn test_printable_keys_unbound_by_default() {
        let keys = KeyBindings::default();
        for c in ['a', 'q', 'c', '1', ' '] {
            let name = key_name(KeyCode::Char(c)).unwrap();
            assert_eq!(keys.action_for(&name), None, "{} is bound", name);
        }
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle(0, -1, 4), 3);
        assert_eq!(cycle(3, 1, 4), 0);
        assert_eq!(cycle(1, 1, 4), 2);
        assert_eq!(cycle(5, 1, 0), 0);
    }
}
