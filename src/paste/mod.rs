//! Synthetic paste keystroke injection
//!
//! Sends the OS paste shortcut to the currently focused application:
//! Meta+V on macOS, Ctrl+V elsewhere. Failures here are never fatal to
//! an activation; the enhanced text is already on the clipboard.

use std::time::Duration;

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use thiserror::Error;

/// Paste injection failure modes
#[derive(Debug, Error)]
pub enum PasteError {
    /// The injection mechanism did not complete in time
    #[error("paste keystroke timed out")]
    Timeout,

    /// The underlying OS call returned non-success
    #[error("paste injection failed: {0}")]
    Injection(String),
}

/// Sends the paste shortcut to the currently focused application.
pub trait Paster: Send {
    fn send_paste(&self) -> Result<(), PasteError>;
}

/// Paster backed by enigo.
///
/// A new `Enigo` handle is created per call; the handle is not Send and
/// is cheap to construct.
#[derive(Debug, Clone, Default)]
pub struct EnigoPaster;

impl EnigoPaster {
    pub fn new() -> Self {
        Self
    }
}

impl Paster for EnigoPaster {
    fn send_paste(&self) -> Result<(), PasteError> {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| PasteError::Injection(e.to_string()))?;

        #[cfg(target_os = "macos")]
        let modifier = Key::Meta;
        #[cfg(not(target_os = "macos"))]
        let modifier = Key::Control;

        enigo
            .key(modifier, Direction::Press)
            .map_err(|e| PasteError::Injection(e.to_string()))?;
        enigo
            .key(Key::Unicode('v'), Direction::Click)
            .map_err(|e| PasteError::Injection(e.to_string()))?;
        enigo
            .key(modifier, Direction::Release)
            .map_err(|e| PasteError::Injection(e.to_string()))?;

        Ok(())
    }
}

/// Dispatch the paste keystroke with a bounded timeout.
///
/// The injection runs on the blocking pool; a timeout abandons the task
/// rather than cancelling the OS call.
pub async fn trigger_paste<P>(paster: P, limit: Duration) -> Result<(), PasteError>
where
    P: Paster + 'static,
{
    let handle = tokio::task::spawn_blocking(move || paster.send_paste());

    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(PasteError::Injection(join_err.to_string())),
        Err(_) => Err(PasteError::Timeout),
    }
}
