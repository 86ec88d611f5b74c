//! Key identifiers, modifier state tracking, and chord matching
//!
//! Provides the key identity type shared by the event tap and the chord
//! detector, plus a struct for tracking which modifier keys are held.

use std::collections::HashSet;
use std::fmt;

/// A single key identity as seen by the global event tap.
///
/// Character keys carry their unshifted character; keys without a
/// character payload are tracked by hardware keycode only and can never
/// match a chord entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Command key
    Command,
    /// Shift key
    Shift,
    /// Control key
    Control,
    /// Option/Alt key
    Option,
    /// A character-producing key
    Char(char),
    /// The escape key
    Escape,
    /// Any other key, identified by hardware keycode
    Other(u16),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Command => write!(f, "Cmd"),
            Key::Shift => write!(f, "Shift"),
            Key::Control => write!(f, "Ctrl"),
            Key::Option => write!(f, "Opt"),
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::Escape => write!(f, "Esc"),
            Key::Other(code) => write!(f, "key({})", code),
        }
    }
}

/// A press or release of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Modifier key flag masks from macOS CGEventFlags
#[cfg(target_os = "macos")]
pub mod flags {
    use core_graphics::event::CGEventFlags;

    /// Command key modifier flag
    pub const COMMAND: CGEventFlags = CGEventFlags::CGEventFlagCommand;
    /// Shift key modifier flag
    pub const SHIFT: CGEventFlags = CGEventFlags::CGEventFlagShift;
    /// Control key modifier flag
    pub const CONTROL: CGEventFlags = CGEventFlags::CGEventFlagControl;
    /// Option/Alt key modifier flag
    pub const OPTION: CGEventFlags = CGEventFlags::CGEventFlagAlternate;
}

/// Tracks which modifier keys are currently pressed.
///
/// The OS reports modifiers as flag transitions rather than key up/down
/// events, so the listener diffs consecutive states into per-key events
/// before handing them to the chord detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    /// Command key is held
    pub command: bool,
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub control: bool,
    /// Option/Alt key is held
    pub option: bool,
}

impl ModifierState {
    /// Create a new ModifierState from CGEventFlags
    #[cfg(target_os = "macos")]
    pub fn from_flags(event_flags: core_graphics::event::CGEventFlags) -> Self {
        Self {
            command: event_flags.contains(flags::COMMAND),
            shift: event_flags.contains(flags::SHIFT),
            control: event_flags.contains(flags::CONTROL),
            option: event_flags.contains(flags::OPTION),
        }
    }

    /// Check if all modifiers are released
    pub fn is_empty(&self) -> bool {
        !self.command && !self.shift && !self.control && !self.option
    }

    /// Per-key press/release events for every modifier that changed.
    pub fn diff(&self, new: &ModifierState) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for (held_before, held_now, key) in [
            (self.command, new.command, Key::Command),
            (self.shift, new.shift, Key::Shift),
            (self.control, new.control, Key::Control),
            (self.option, new.option, Key::Option),
        ] {
            match (held_before, held_now) {
                (false, true) => events.push(KeyEvent::Pressed(key)),
                (true, false) => events.push(KeyEvent::Released(key)),
                _ => {}
            }
        }
        events
    }
}

/// An immutable set of keys that must be simultaneously held to trigger
/// an activation.
#[derive(Debug, Clone)]
pub struct HotkeyChord {
    keys: Vec<Key>,
}

impl HotkeyChord {
    /// Create a chord from its required keys
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// The keys this chord requires
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// True when every chord key is in the pressed set
    pub fn is_satisfied_by(&self, pressed: &HashSet<Key>) -> bool {
        self.keys.iter().all(|key| pressed.contains(key))
    }
}

impl fmt::Display for HotkeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(keys: &[Key]) -> HashSet<Key> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_empty_state() {
        let state = ModifierState::default();
        assert!(state.is_empty());
        assert!(state.diff(&state).is_empty());
    }

    #[test]
    fn test_diff_reports_presses() {
        let before = ModifierState::default();
        let after = ModifierState {
            command: true,
            shift: true,
            ..ModifierState::default()
        };

        let events = before.diff(&after);
        assert!(events.contains(&KeyEvent::Pressed(Key::Command)));
        assert!(events.contains(&KeyEvent::Pressed(Key::Shift)));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_diff_reports_releases() {
        let before = ModifierState {
            command: true,
            control: true,
            ..ModifierState::default()
        };
        let after = ModifierState {
            command: true,
            ..ModifierState::default()
        };

        let events = before.diff(&after);
        assert_eq!(events, vec![KeyEvent::Released(Key::Control)]);
    }

    #[test]
    fn test_chord_requires_every_key() {
        let chord = HotkeyChord::new([Key::Command, Key::Shift, Key::Char('v')]);

        assert!(!chord.is_satisfied_by(&pressed(&[Key::Command, Key::Shift])));
        assert!(!chord.is_satisfied_by(&pressed(&[Key::Command, Key::Char('v')])));
        assert!(chord.is_satisfied_by(&pressed(&[
            Key::Command,
            Key::Shift,
            Key::Char('v')
        ])));
    }

    #[test]
    fn test_chord_ignores_extra_keys() {
        let chord = HotkeyChord::new([Key::Command, Key::Shift, Key::Char('v')]);
        let held = pressed(&[
            Key::Command,
            Key::Shift,
            Key::Char('v'),
            Key::Char('x'),
            Key::Other(99),
        ]);

        assert!(chord.is_satisfied_by(&held));
    }

    #[test]
    fn test_chord_display() {
        let chord = HotkeyChord::new([Key::Command, Key::Shift, Key::Char('v')]);
        assert_eq!(chord.to_string(), "Cmd+Shift+V");
    }
}
