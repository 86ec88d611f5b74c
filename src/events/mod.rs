//! Session events emitted during an activation cycle
//!
//! Broadcast by the session controller and rendered as operator-facing
//! status lines on stdout.

use serde::{Deserialize, Serialize};

/// Events emitted by the session controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The chord was recognized and an activation began
    ActivationStarted,

    /// The clipboard held nothing after trimming; pipeline skipped
    ClipboardEmpty,

    /// Enhanced text was written back to the clipboard
    Enhanced {
        /// Length of the enhanced text in characters
        chars: usize,
        /// Time from activation to clipboard write in milliseconds
        duration_ms: u64,
    },

    /// The activation aborted; clipboard left untouched
    ActivationFailed { reason: String },

    /// The paste keystroke was delivered to the focused application
    Pasted,

    /// Auto-paste failed; enhanced text remains on the clipboard
    PasteFailed { reason: String },

    /// The exit key was released
    ExitRequested,
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::ActivationStarted => {
                write!(f, "Hotkey activated, enhancing clipboard text...")
            }
            SessionEvent::ClipboardEmpty => {
                write!(f, "Nothing to enhance: clipboard is empty. Copy some text first.")
            }
            SessionEvent::Enhanced { chars, duration_ms } => {
                write!(
                    f,
                    "Enhanced text copied to clipboard ({} chars in {}ms)",
                    chars, duration_ms
                )
            }
            SessionEvent::ActivationFailed { reason } => {
                write!(f, "Enhancement failed: {}. Clipboard left unchanged.", reason)
            }
            SessionEvent::Pasted => {
                write!(f, "Enhanced text pasted into the active application")
            }
            SessionEvent::PasteFailed { reason } => {
                write!(
                    f,
                    "Could not paste automatically ({}); paste manually with the paste shortcut",
                    reason
                )
            }
            SessionEvent::ExitRequested => write!(f, "Exit key released, shutting down"),
        }
    }
}
