//! Chord detection over the global key event stream
//!
//! Maintains the set of currently held keys and signals the session
//! controller when the full chord becomes held or the exit key is
//! released. Pure in-memory set operations with no failure path.

use std::collections::HashSet;

use tracing::debug;

use super::keys::{HotkeyChord, Key, KeyEvent};

/// Signals surfaced to the session controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordSignal {
    /// The full chord just became held
    Activated,
    /// The exit key was released
    ExitRequested,
}

/// Tracks held keys and detects the activation chord.
///
/// The pressed-key set is owned by the detector instance; keys leave the
/// set only through their own release events.
pub struct ChordDetector {
    chord: HotkeyChord,
    exit_key: Key,
    pressed: HashSet<Key>,
    chord_held: bool,
}

impl ChordDetector {
    /// Create a detector for the given chord and exit key
    pub fn new(chord: HotkeyChord, exit_key: Key) -> Self {
        Self {
            chord,
            exit_key,
            pressed: HashSet::new(),
            chord_held: false,
        }
    }

    /// Whether the full chord is currently held
    pub fn is_chord_held(&self) -> bool {
        self.chord_held
    }

    /// Record one key event and report any resulting signal.
    ///
    /// Activation fires only when the event moves the pressed set from
    /// not covering the chord to covering it, so OS key-repeat presses of
    /// an already-held key cannot re-fire; releasing one chord key and
    /// pressing it again while the others stay held fires again.
    pub fn observe(&mut self, event: KeyEvent) -> Option<ChordSignal> {
        match event {
            KeyEvent::Pressed(key) => {
                self.pressed.insert(key);
                let held = self.chord.is_satisfied_by(&self.pressed);
                let fired = held && !self.chord_held;
                self.chord_held = held;

                if fired {
                    debug!(chord = %self.chord, "chord activated");
                    return Some(ChordSignal::Activated);
                }
                None
            }
            KeyEvent::Released(key) => {
                self.pressed.remove(&key);
                self.chord_held = self.chord.is_satisfied_by(&self.pressed);

                if key == self.exit_key {
                    debug!(key = %key, "exit key released");
                    return Some(ChordSignal::ExitRequested);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ChordDetector {
        ChordDetector::new(
            HotkeyChord::new([Key::Command, Key::Shift, Key::Char('v')]),
            Key::Escape,
        )
    }

    #[test]
    fn test_partial_chord_never_fires() {
        let mut d = detector();

        assert_eq!(d.observe(KeyEvent::Pressed(Key::Command)), None);
        assert_eq!(d.observe(KeyEvent::Pressed(Key::Shift)), None);
        assert_eq!(d.observe(KeyEvent::Released(Key::Shift)), None);
        assert_eq!(d.observe(KeyEvent::Pressed(Key::Char('v'))), None);
        assert!(!d.is_chord_held());
    }

    #[test]
    fn test_full_chord_fires_in_any_order() {
        let mut d = detector();

        assert_eq!(d.observe(KeyEvent::Pressed(Key::Char('v'))), None);
        assert_eq!(d.observe(KeyEvent::Pressed(Key::Command)), None);
        assert_eq!(
            d.observe(KeyEvent::Pressed(Key::Shift)),
            Some(ChordSignal::Activated)
        );
        assert!(d.is_chord_held());
    }

    #[test]
    fn test_key_repeat_does_not_refire() {
        let mut d = detector();

        d.observe(KeyEvent::Pressed(Key::Command));
        d.observe(KeyEvent::Pressed(Key::Shift));
        assert_eq!(
            d.observe(KeyEvent::Pressed(Key::Char('v'))),
            Some(ChordSignal::Activated)
        );

        // OS key-repeat delivers further press events for the held key
        assert_eq!(d.observe(KeyEvent::Pressed(Key::Char('v'))), None);
        assert_eq!(d.observe(KeyEvent::Pressed(Key::Char('v'))), None);
    }

    #[test]
    fn test_release_and_repress_fires_again() {
        let mut d = detector();

        d.observe(KeyEvent::Pressed(Key::Command));
        d.observe(KeyEvent::Pressed(Key::Shift));
        assert_eq!(
            d.observe(KeyEvent::Pressed(Key::Char('v'))),
            Some(ChordSignal::Activated)
        );

        assert_eq!(d.observe(KeyEvent::Released(Key::Char('v'))), None);
        assert!(!d.is_chord_held());
        assert_eq!(
            d.observe(KeyEvent::Pressed(Key::Char('v'))),
            Some(ChordSignal::Activated)
        );
    }

    #[test]
    fn test_unrecognized_keys_are_tracked_by_identity() {
        let mut d = detector();

        assert_eq!(d.observe(KeyEvent::Pressed(Key::Other(120))), None);
        d.observe(KeyEvent::Pressed(Key::Command));
        d.observe(KeyEvent::Pressed(Key::Shift));
        assert_eq!(
            d.observe(KeyEvent::Pressed(Key::Char('v'))),
            Some(ChordSignal::Activated)
        );
        assert_eq!(d.observe(KeyEvent::Released(Key::Other(120))), None);
        assert!(d.is_chord_held());
    }

    #[test]
    fn test_exit_key_release_signals_exit() {
        let mut d = detector();

        assert_eq!(d.observe(KeyEvent::Pressed(Key::Escape)), None);
        assert_eq!(
            d.observe(KeyEvent::Released(Key::Escape)),
            Some(ChordSignal::ExitRequested)
        );
    }

    #[test]
    fn test_releasing_non_chord_key_keeps_chord_held() {
        let mut d = detector();

        d.observe(KeyEvent::Pressed(Key::Char('x')));
        d.observe(KeyEvent::Pressed(Key::Command));
        d.observe(KeyEvent::Pressed(Key::Shift));
        assert_eq!(
            d.observe(KeyEvent::Pressed(Key::Char('v'))),
            Some(ChordSignal::Activated)
        );
        assert_eq!(d.observe(KeyEvent::Released(Key::Char('x'))), None);
        assert!(d.is_chord_held());
    }
}
