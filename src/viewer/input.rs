//! Key-to-command mapping.
//!
//! The viewer's whole input surface is three commands. Mapping lives in a
//! pure function over winit's logical key so the table is testable without
//! an event loop.

use winit::keyboard::{Key, NamedKey};

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Quit the application.
    Exit,
    /// Cycle to the next render mode.
    CycleMode,
    /// Show this character's glyph.
    SelectSymbol(char),
}

/// Map a logical key to a command.
///
/// - Escape quits, Space cycles the render mode.
/// - Any other single printable character selects that symbol.
/// - Everything else (function keys, arrows, modifiers, IME output longer
///   than one char) is ignored.
pub fn command_for_key(key: &Key) -> Option<Command> {
    match key {
        Key::Named(NamedKey::Escape) => Some(Command::Exit),
        Key::Named(NamedKey::Space) => Some(Command::CycleMode),
        Key::Character(text) => {
            let mut chars = text.chars();
            let ch = chars.next()?;
            if chars.next().is_some() || ch.is_control() {
                return None;
            }
            // Some platforms report the space bar as a character key.
            if ch == ' ' {
                Some(Command::CycleMode)
            } else {
                Some(Command::SelectSymbol(ch))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn character(s: &str) -> Key {
        Key::Character(SmolStr::new(s))
    }

    #[test]
    fn escape_exits() {
        assert_eq!(
            command_for_key(&Key::Named(NamedKey::Escape)),
            Some(Command::Exit)
        );
    }

    #[test]
    fn space_cycles_mode_in_both_encodings() {
        assert_eq!(
            command_for_key(&Key::Named(NamedKey::Space)),
            Some(Command::CycleMode)
        );
        assert_eq!(command_for_key(&character(" ")), Some(Command::CycleMode));
    }

    #[test]
    fn printable_characters_select_symbols() {
        assert_eq!(
            command_for_key(&character("a")),
            Some(Command::SelectSymbol('a'))
        );
        assert_eq!(
            command_for_key(&character("Q")),
            Some(Command::SelectSymbol('Q'))
        );
        assert_eq!(
            command_for_key(&character("&")),
            Some(Command::SelectSymbol('&'))
        );
    }

    #[test]
    fn non_printable_keys_are_ignored() {
        assert_eq!(command_for_key(&Key::Named(NamedKey::F1)), None);
        assert_eq!(command_for_key(&Key::Named(NamedKey::ArrowLeft)), None);
        assert_eq!(command_for_key(&Key::Named(NamedKey::Shift)), None);
        assert_eq!(command_for_key(&Key::Named(NamedKey::Enter)), None);
    }

    #[test]
    fn multi_char_and_control_sequences_are_ignored() {
        assert_eq!(command_for_key(&character("ab")), None);
        assert_eq!(command_for_key(&character("\u{7}")), None);
    }
}
