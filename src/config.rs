//! Compile-time configuration
//!
//! The endpoint and hotkey are fixed constants; there is no config file
//! and no environment lookup. The struct exists so components take their
//! knobs from one place and tests can substitute a local server URL and
//! short timeouts.

use std::time::Duration;

use crate::hotkey::{HotkeyChord, Key};

/// Base URL of the local enhancement service
const BASE_URL: &str = "http://localhost:3001";

/// Upper bound on one enhancement exchange
const ENHANCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the startup liveness probe
const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on delivering the synthetic paste keystroke
const PASTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the enhancement service
    pub base_url: String,

    /// Timeout for the enhancement exchange
    pub enhance_timeout: Duration,

    /// Timeout for the startup liveness probe
    pub liveness_timeout: Duration,

    /// Timeout for the paste keystroke
    pub paste_timeout: Duration,

    /// Chord that triggers an activation
    pub chord: HotkeyChord,

    /// Key whose release stops the daemon
    pub exit_key: Key,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_owned(),
            enhance_timeout: ENHANCE_TIMEOUT,
            liveness_timeout: LIVENESS_TIMEOUT,
            paste_timeout: PASTE_TIMEOUT,
            chord: HotkeyChord::new([Key::Command, Key::Shift, Key::Char('v')]),
            exit_key: Key::Escape,
        }
    }
}
