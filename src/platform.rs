//! Platform-specific configuration

use crossterm::event::{KeyEvent, KeyModifiers};

/// Platform-appropriate modifier for save shortcuts
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const COPY_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const COPY_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Save shortcut display for form help text
/// Ctrl+S works on all platforms (Cmd+W/Ctrl+W also work as fallback)
pub const SAVE_SHORTCUT: &str = "Ctrl+S";

/// True for Ctrl+S, or the platform modifier with W
pub fn is_save_shortcut(key: &KeyEvent) -> bool {
    use crossterm::event::KeyCode;
    match key.code {
        KeyCode::Char('s') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('w') => key.modifiers.contains(COPY_MODIFIER),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctrl, key};
    use crossterm::event::KeyCode;

    #[test]
    fn test_save_shortcut() {
        assert!(is_save_shortcut(&ctrl('s')));
        assert!(!is_save_shortcut(&key(KeyCode::Char('s'))));
        assert!(is_save_shortcut(&KeyEvent::new(KeyCode::Char('w'), COPY_MODIFIER)));
    }
}
