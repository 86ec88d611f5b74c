//! Session controller driving the enhance-and-paste pipeline
//!
//! Routes every key event through the chord detector and runs one full
//! activation (clipboard read, enhancement exchange, clipboard write,
//! paste keystroke) per chord trigger. Activations are strictly
//! sequential: events arriving during one queue in the channel and are
//! drained afterwards, so chord state stays accurate and no second
//! pipeline run can start concurrently.

use std::time::Instant;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::clipboard::{Clipboard, ClipboardError, ClipboardText};
use crate::config::Config;
use crate::enhance::{EnhanceClient, EnhanceError};
use crate::events::SessionEvent;
use crate::hotkey::{ChordDetector, ChordSignal, KeyEvent};
use crate::paste::{self, Paster};

/// States of one daemon session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Probing the enhancement service
    Starting,
    /// Waiting for the chord
    Listening,
    /// Running the clipboard read and enhancement exchange
    Enhancing,
    /// Writing the result back and delivering the paste keystroke
    Pasting,
    /// Exit key observed, no further events are processed
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Starting => write!(f, "Starting"),
            SessionState::Listening => write!(f, "Listening"),
            SessionState::Enhancing => write!(f, "Enhancing"),
            SessionState::Pasting => write!(f, "Pasting"),
            SessionState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Fatal startup failures
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("enhancement service is not reachable at {url}")]
    LivenessCheckFailed { url: String },
}

/// Errors that abort a single activation
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Enhance(#[from] EnhanceError),
}

/// The controller that owns the chord detector and runs activations
pub struct SessionController<C, P> {
    config: Config,
    detector: ChordDetector,
    clipboard: C,
    paster: P,
    client: EnhanceClient,
    state: SessionState,
    /// Channel for emitting session events
    event_tx: broadcast::Sender<SessionEvent>,
}

impl<C, P> SessionController<C, P>
where
    C: Clipboard,
    P: Paster + Clone + 'static,
{
    /// Create a new session controller
    pub fn new(
        config: Config,
        client: EnhanceClient,
        clipboard: C,
        paster: P,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        let detector = ChordDetector::new(config.chord.clone(), config.exit_key);
        Self {
            config,
            detector,
            clipboard,
            paster,
            client,
            state: SessionState::Starting,
            event_tx,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Startup liveness gate.
    ///
    /// The daemon refuses to enter the event loop when the enhancement
    /// service is unreachable; this is the only fatal failure after boot.
    pub async fn startup(&mut self) -> Result<(), StartupError> {
        if !self.client.check_liveness().await {
            return Err(StartupError::LivenessCheckFailed {
                url: self.config.base_url.clone(),
            });
        }

        self.transition(SessionState::Listening);
        Ok(())
    }

    /// Drain key events until the exit key is released or the channel
    /// closes.
    pub async fn run(&mut self, mut key_rx: mpsc::Receiver<KeyEvent>) {
        info!(chord = %self.config.chord, "session controller listening");

        while let Some(event) = key_rx.recv().await {
            match self.detector.observe(event) {
                Some(ChordSignal::Activated) => self.run_activation().await,
                Some(ChordSignal::ExitRequested) => {
                    self.emit(SessionEvent::ExitRequested);
                    break;
                }
                None => {}
            }
        }

        self.transition(SessionState::Stopped);
    }

    /// One full enhance-and-paste cycle.
    ///
    /// Every error is caught here and converted to a session event; no
    /// activation failure terminates the process.
    async fn run_activation(&mut self) {
        self.transition(SessionState::Enhancing);
        self.emit(SessionEvent::ActivationStarted);
        let started = Instant::now();

        match self.enhance_clipboard().await {
            Ok(Some(enhanced)) => {
                self.transition(SessionState::Pasting);
                self.finish_activation(enhanced, started).await;
            }
            Ok(None) => {
                self.emit(SessionEvent::ClipboardEmpty);
            }
            Err(err) => {
                warn!(%err, "activation aborted");
                self.emit(SessionEvent::ActivationFailed {
                    reason: err.to_string(),
                });
            }
        }

        self.transition(SessionState::Listening);
    }

    /// Read, trim, and enhance the clipboard text.
    ///
    /// `None` means the clipboard held nothing after trimming; the
    /// network is never touched in that case.
    async fn enhance_clipboard(&mut self) -> Result<Option<String>, ActivationError> {
        let text = match self.clipboard.read()? {
            ClipboardText::Content(text) => text,
            ClipboardText::Empty => return Ok(None),
        };

        info!(preview = %preview(&text), "enhancing clipboard text");
        let enhanced = self.client.enhance(&text).await?;
        Ok(Some(enhanced))
    }

    /// Write the enhanced text back and attempt the paste keystroke.
    ///
    /// Paste failures are reported but never abort: the text is already
    /// on the clipboard and can be pasted manually.
    async fn finish_activation(&mut self, enhanced: String, started: Instant) {
        if let Err(err) = self.clipboard.write_text(&enhanced) {
            warn!(%err, "failed to write enhanced text to clipboard");
            self.emit(SessionEvent::ActivationFailed {
                reason: err.to_string(),
            });
            return;
        }

        self.emit(SessionEvent::Enhanced {
            chars: enhanced.chars().count(),
            duration_ms: started.elapsed().as_millis() as u64,
        });

        match paste::trigger_paste(self.paster.clone(), self.config.paste_timeout).await {
            Ok(()) => self.emit(SessionEvent::Pasted),
            Err(err) => {
                warn!(%err, "paste injection failed");
                self.emit(SessionEvent::PasteFailed {
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Perform a state transition
    fn transition(&mut self, new_state: SessionState) {
        if new_state == self.state {
            return;
        }

        info!(from = %self.state, to = %new_state, "session transition");
        self.state = new_state;
    }

    /// Emit a session event
    fn emit(&self, event: SessionEvent) {
        debug!(?event, "session event");
        let _ = self.event_tx.send(event);
    }
}

/// Short, char-safe preview of the text for log lines
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 50;
    if text.chars().count() <= MAX_CHARS {
        text.to_owned()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}
