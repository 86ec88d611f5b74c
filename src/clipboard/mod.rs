//! Clipboard gateway
//!
//! Plain-text read/write over the OS clipboard, behind a trait so the
//! pipeline can be exercised against an in-memory stand-in.

use thiserror::Error;

/// Errors from the underlying OS clipboard
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Clipboard content after trimming
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardText {
    /// Non-empty trimmed text
    Content(String),
    /// Nothing usable on the clipboard
    Empty,
}

/// Plain-text clipboard access.
pub trait Clipboard {
    /// Raw clipboard text; an empty string when the clipboard holds none.
    fn read_text(&mut self) -> Result<String, ClipboardError>;

    /// Replace the clipboard content with `text`.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Read and trim. Whitespace-only content is reported as `Empty` so
    /// the pipeline can short-circuit without a network call.
    fn read(&mut self) -> Result<ClipboardText, ClipboardError> {
        let raw = self.read_text()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Ok(ClipboardText::Empty)
        } else {
            Ok(ClipboardText::Content(trimmed.to_owned()))
        }
    }
}

/// System clipboard backed by arboard.
///
/// A fresh handle is opened per call; the handle is cheap and not Send,
/// and holding one for the daemon's lifetime would pin the clipboard
/// connection to a single thread.
#[derive(Debug, Clone, Default)]
pub struct ArboardClipboard;

impl ArboardClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<arboard::Clipboard, ClipboardError> {
        arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

impl Clipboard for ArboardClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        match Self::open()?.get_text() {
            Ok(text) => Ok(text),
            // An empty clipboard is a sentinel, not a failure
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardError::Unavailable(e.to_string())),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        Self::open()?
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::{Clipboard, ClipboardError};

    /// In-memory clipboard stand-in; clones share the same slot so tests
    /// can inspect it after the controller takes ownership.
    #[derive(Debug, Clone, Default)]
    pub struct MemClipboard {
        slot: Arc<Mutex<String>>,
        unavailable: Arc<AtomicBool>,
    }

    impl MemClipboard {
        pub fn with_content(text: &str) -> Self {
            let clipboard = Self::default();
            *clipboard.slot.lock().unwrap() = text.to_owned();
            clipboard
        }

        pub fn content(&self) -> String {
            self.slot.lock().unwrap().clone()
        }

        pub fn make_unavailable(&self) {
            self.unavailable.store(true, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), ClipboardError> {
            if self.unavailable.load(Ordering::SeqCst) {
                Err(ClipboardError::Unavailable("simulated failure".into()))
            } else {
                Ok(())
            }
        }
    }

    impl Clipboard for MemClipboard {
        fn read_text(&mut self) -> Result<String, ClipboardError> {
            self.check()?;
            Ok(self.slot.lock().unwrap().clone())
        }

        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.check()?;
            *self.slot.lock().unwrap() = text.to_owned();
            Ok(())
        }
    }
}
