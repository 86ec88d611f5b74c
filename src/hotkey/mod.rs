//! Hotkey module for global keyboard event listening
//!
//! A CGEventTap forwards system-wide key press/release events into the
//! chord detector, which signals activation when the full chord is held.

mod detector;
mod keys;
mod listener;

pub use detector::{ChordDetector, ChordSignal};
pub use keys::{HotkeyChord, Key, KeyEvent, ModifierState};
pub use listener::{HotkeyError, KeyEventListener};
