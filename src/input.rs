//! Input handling - key reading and translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Modifier bits packed above the character code
pub mod key_flags {
    pub const CONTROL: u32 = 0x1000_0000;
    pub const META: u32 = 0x2000_0000;
    pub const CTLX: u32 = 0x4000_0000;
    pub const SPEC: u32 = 0x8000_0000;
}

/// Special key codes
pub mod special {
    pub const HOME: u32 = 0x47;
    pub const UP: u32 = 0x48;
    pub const PAGE_UP: u32 = 0x49;
    pub const LEFT: u32 = 0x4b;
    pub const RIGHT: u32 = 0x4d;
    pub const END: u32 = 0x4f;
    pub const DOWN: u32 = 0x50;
    pub const PAGE_DOWN: u32 = 0x51;
    pub const DELETE: u32 = 0x53;
}

/// Represents a key input with modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub u32);

impl Key {
    /// Create a key from a character
    pub fn char(ch: char) -> Self {
        Key(ch as u32)
    }

    /// Create a control key (C-x)
    pub fn ctrl(ch: char) -> Self {
        Key(key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Create a meta key (M-x or ESC x)
    pub fn meta(ch: char) -> Self {
        Key(key_flags::META | ch.to_ascii_lowercase() as u32)
    }

    /// Create a C-x prefixed key (C-x x)
    pub fn ctlx(ch: char) -> Self {
        Key(key_flags::CTLX | ch.to_ascii_lowercase() as u32)
    }

    /// Create a C-x C-x key (C-x C-x)
    pub fn ctlx_ctrl(ch: char) -> Self {
        Key(key_flags::CTLX | key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Create a special key (arrows, paging)
    pub fn special(code: u32) -> Self {
        Key(key_flags::SPEC | code)
    }

    /// The same key with Meta held
    pub fn with_meta(self) -> Self {
        Key(self.0 | key_flags::META)
    }

    /// Enter
    pub fn enter() -> Self {
        Key::ctrl('m')
    }

    /// Tab
    pub fn tab() -> Self {
        Key::ctrl('i')
    }

    /// Backspace
    pub fn backspace() -> Self {
        Key(0x7f)
    }

    /// Check if this is a control key
    pub fn is_ctrl(&self) -> bool {
        self.0 & key_flags::CONTROL != 0
    }

    /// Check if this is a meta key
    pub fn is_meta(&self) -> bool {
        self.0 & key_flags::META != 0
    }

    /// Check if this is a C-x prefixed key
    pub fn is_ctlx(&self) -> bool {
        self.0 & key_flags::CTLX != 0
    }

    /// Check if this is a special key
    pub fn is_special(&self) -> bool {
        self.0 & key_flags::SPEC != 0
    }

    /// The printable character this key inserts, if any
    pub fn self_insert_char(&self) -> Option<char> {
        if self.0 & 0xF000_0000 != 0 {
            return None;
        }
        char::from_u32(self.0).filter(|ch| *ch >= ' ' && *ch != '\x7f')
    }

    /// Convert key to a human-readable string (e.g., "C-f", "M-/", "C-x C-s")
    pub fn display_name(&self) -> String {
        let mut result = String::new();
        if self.is_ctlx() {
            result.push_str("C-x ");
        }
        if self.is_meta() {
            result.push_str("M-");
        }
        if self.is_ctrl() {
            result.push_str("C-");
        }

        if self.is_special() {
            let name = match self.0 & 0xFF {
                special::HOME => "Home",
                special::UP => "Up",
                special::PAGE_UP => "PageUp",
                special::LEFT => "Left",
                special::RIGHT => "Right",
                special::END => "End",
                special::DOWN => "Down",
                special::PAGE_DOWN => "PageDown",
                special::DELETE => "Delete",
                code => return format!("{result}special-0x{code:02x}"),
            };
            result.push_str(name);
            return result;
        }

        match self.0 & 0x00FF_FFFF {
            0x7f => result.push_str("Backspace"),
            0x20 => result.push_str("SPC"),
            base => match char::from_u32(base) {
                Some(ch) => result.push(ch),
                None => result.push_str(&format!("0x{base:x}")),
            },
        }
        result
    }
}

/// Input state for handling multi-key sequences
#[derive(Debug, Default)]
pub struct InputState {
    /// Waiting for C-x continuation
    ctlx_pending: bool,
    /// Waiting for Meta continuation (after ESC)
    meta_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if waiting for C-x continuation
    pub fn is_ctlx_pending(&self) -> bool {
        self.ctlx_pending
    }

    /// Check if waiting for Meta/ESC continuation
    pub fn is_meta_pending(&self) -> bool {
        self.meta_pending
    }

    /// Translate a crossterm KeyEvent to our Key representation.
    /// Returns None for prefix keys and ignored events.
    pub fn translate_key(&mut self, event: KeyEvent) -> Option<Key> {
        let KeyEvent {
            code, modifiers, kind, ..
        } = event;

        // Windows reports release and repeat events too
        if kind != KeyEventKind::Press {
            return None;
        }

        if self.meta_pending {
            self.meta_pending = false;
            return translate_normal(code, modifiers).map(Key::with_meta);
        }

        if self.ctlx_pending {
            self.ctlx_pending = false;
            return translate_with_ctlx(code, modifiers);
        }

        if code == KeyCode::Esc {
            self.meta_pending = true;
            return None;
        }

        if code == KeyCode::Char('x') && modifiers.contains(KeyModifiers::CONTROL) {
            self.ctlx_pending = true;
            return None;
        }

        translate_normal(code, modifiers)
    }
}

fn translate_normal(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    let key = match code {
        KeyCode::Char(ch) => {
            return Some(match (ctrl, alt) {
                (true, true) => Key::ctrl(ch).with_meta(),
                (true, false) => Key::ctrl(ch),
                (false, true) => Key::meta(ch),
                (false, false) => Key::char(ch),
            });
        }
        KeyCode::Enter => Key::enter(),
        KeyCode::Tab => Key::tab(),
        KeyCode::Backspace => Key::backspace(),
        KeyCode::Delete => Key::special(special::DELETE),
        KeyCode::Home => Key::special(special::HOME),
        KeyCode::End => Key::special(special::END),
        KeyCode::PageUp => Key::special(special::PAGE_UP),
        KeyCode::PageDown => Key::special(special::PAGE_DOWN),
        KeyCode::Up => Key::special(special::UP),
        KeyCode::Down => Key::special(special::DOWN),
        KeyCode::Left => Key::special(special::LEFT),
        KeyCode::Right => Key::special(special::RIGHT),
        KeyCode::Esc => Key::ctrl('['),
        _ => return None,
    };

    Some(if alt { key.with_meta() } else { key })
}

fn translate_with_ctlx(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    match code {
        KeyCode::Char(ch) => {
            let mut key_code = key_flags::CTLX | ch.to_ascii_lowercase() as u32;
            if modifiers.contains(KeyModifiers::CONTROL) {
                key_code |= key_flags::CONTROL;
            }
            Some(Key(key_code))
        }
        _ => translate_normal(code, modifiers).map(|k| Key(k.0 | key_flags::CTLX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_and_control_keys() {
        let mut input = InputState::new();
        assert_eq!(
            input.translate_key(press(KeyCode::Char('H'), KeyModifiers::SHIFT)),
            Some(Key::char('H'))
        );
        assert_eq!(
            input.translate_key(press(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Key::ctrl('n'))
        );
        assert_eq!(
            input.translate_key(press(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Key::tab())
        );
    }

    #[test]
    fn test_escape_prefix_is_meta() {
        let mut input = InputState::new();
        assert_eq!(input.translate_key(press(KeyCode::Esc, KeyModifiers::NONE)), None);
        assert!(input.is_meta_pending());
        assert_eq!(
            input.translate_key(press(KeyCode::Char('/'), KeyModifiers::NONE)),
            Some(Key::meta('/'))
        );

        input.translate_key(press(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(
            input.translate_key(press(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Key::tab().with_meta())
        );
    }

    #[test]
    fn test_alt_modifier_is_meta() {
        let mut input = InputState::new();
        assert_eq!(
            input.translate_key(press(KeyCode::Char('/'), KeyModifiers::ALT)),
            Some(Key::meta('/'))
        );
        assert_eq!(
            input.translate_key(press(KeyCode::Tab, KeyModifiers::ALT)),
            Some(Key::tab().with_meta())
        );
    }

    #[test]
    fn test_ctlx_sequences() {
        let mut input = InputState::new();
        assert_eq!(
            input.translate_key(press(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
        assert!(input.is_ctlx_pending());
        assert_eq!(
            input.translate_key(press(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Key::ctlx_ctrl('s'))
        );
    }

    #[test]
    fn test_self_insert_and_names() {
        assert_eq!(Key::char('a').self_insert_char(), Some('a'));
        assert_eq!(Key::ctrl('a').self_insert_char(), None);
        assert_eq!(Key::backspace().self_insert_char(), None);
        assert_eq!(Key::ctlx_ctrl('s').display_name(), "C-x C-s");
        assert_eq!(Key::meta('/').display_name(), "M-/");
        assert_eq!(Key::special(special::DOWN).display_name(), "Down");
    }
}
