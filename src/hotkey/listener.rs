//! Global key event listener using macOS CGEventTap
//!
//! Monitors system-wide key press/release events and forwards them to
//! the session controller. Runs on a dedicated thread with its own
//! CFRunLoop. On other platforms `start()` reports the tap as
//! unsupported and the daemon keeps running without hotkey support.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

#[cfg(target_os = "macos")]
use std::thread;

#[cfg(target_os = "macos")]
use core_foundation::runloop::{kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop};
#[cfg(target_os = "macos")]
use core_graphics::event::{
    CGEvent, CGEventFlags, CGEventTap, CGEventTapLocation, CGEventTapOptions,
    CGEventTapPlacement, CGEventType, EventField,
};
#[cfg(target_os = "macos")]
use tracing::{error, info, warn};

use super::keys::{Key, KeyEvent};
#[cfg(target_os = "macos")]
use super::keys::ModifierState;

/// Errors that can occur in the key event listener
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("key event listener is already running")]
    AlreadyRunning,

    #[error("failed to create event tap - check Accessibility permissions")]
    EventTapCreation,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),

    #[error("global key event tap is not supported on this platform")]
    UnsupportedPlatform,
}

/// Global listener that forwards key press/release events
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub struct KeyEventListener {
    event_tx: mpsc::Sender<KeyEvent>,
    running: Arc<AtomicBool>,
}

impl KeyEventListener {
    /// Create a new key event listener
    pub fn new(event_tx: mpsc::Sender<KeyEvent>) -> Self {
        Self {
            event_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the listener
    ///
    /// Spawns a dedicated thread that runs a CFRunLoop to receive
    /// CGEventTap callbacks. The listener runs until `stop()` is called
    /// or the program exits.
    #[cfg(target_os = "macos")]
    pub fn start(&self) -> Result<(), HotkeyError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(HotkeyError::AlreadyRunning);
        }

        let event_tx = self.event_tx.clone();
        let running = Arc::clone(&self.running);

        thread::Builder::new()
            .name("hotkey-listener".to_string())
            .spawn(move || {
                info!("key event listener thread started");

                if let Err(e) = run_event_loop(event_tx, running.clone()) {
                    error!(?e, "key event listener error");
                }

                running.store(false, Ordering::SeqCst);
                info!("key event listener thread stopped");
            })
            .map_err(|e| HotkeyError::ThreadSpawn(e.to_string()))?;

        Ok(())
    }

    /// Start the listener (unsupported on this platform)
    #[cfg(not(target_os = "macos"))]
    pub fn start(&self) -> Result<(), HotkeyError> {
        Err(HotkeyError::UnsupportedPlatform)
    }

    /// Stop the listener
    ///
    /// The run loop polls this flag and exits within its next interval.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the listener is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Raw events crossing from the tap callback to the listener thread loop
#[cfg(target_os = "macos")]
enum RawKeyEvent {
    Down(i64),
    Up(i64),
    Flags(CGEventFlags),
}

/// Run the CFRunLoop with the event tap
#[cfg(target_os = "macos")]
fn run_event_loop(
    event_tx: mpsc::Sender<KeyEvent>,
    running: Arc<AtomicBool>,
) -> Result<(), HotkeyError> {
    // Modifiers arrive as flag transitions; diff against the last state
    // to synthesize per-key press/release events
    let mut last_modifiers = ModifierState::default();

    // Channel to move raw events out of the callback
    let (callback_tx, callback_rx) = std::sync::mpsc::channel::<RawKeyEvent>();

    // CGEventTap callback - must be fast and non-blocking
    let callback = move |_proxy: core_graphics::event::CGEventTapProxy,
                         event_type: CGEventType,
                         event: &CGEvent|
                         -> Option<CGEvent> {
        match event_type {
            CGEventType::KeyDown => {
                let code = event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE);
                let _ = callback_tx.send(RawKeyEvent::Down(code));
            }
            CGEventType::KeyUp => {
                let code = event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE);
                let _ = callback_tx.send(RawKeyEvent::Up(code));
            }
            CGEventType::FlagsChanged => {
                let _ = callback_tx.send(RawKeyEvent::Flags(event.get_flags()));
            }
            CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
                warn!("event tap disabled, will re-enable");
                // The tap will be re-enabled automatically
            }
            _ => {}
        }
        Some(event.clone())
    };

    // Create the event tap
    let tap = CGEventTap::new(
        CGEventTapLocation::Session,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::ListenOnly,
        vec![
            CGEventType::KeyDown,
            CGEventType::KeyUp,
            CGEventType::FlagsChanged,
        ],
        callback,
    )
    .map_err(|_| {
        error!("failed to create event tap - is Accessibility permission granted?");
        HotkeyError::EventTapCreation
    })?;

    // Enable the tap
    tap.enable();

    // Create a run loop source and add it to the current run loop
    let run_loop_source = tap
        .mach_port
        .create_runloop_source(0)
        .map_err(|_| HotkeyError::EventTapCreation)?;
    let run_loop = CFRunLoop::get_current();

    unsafe {
        run_loop.add_source(&run_loop_source, kCFRunLoopCommonModes);
    }

    info!("event tap created and enabled");

    // Process events in a loop
    while running.load(Ordering::SeqCst) {
        // Run the loop for a short interval, then check for new events
        unsafe {
            CFRunLoop::run_in_mode(
                kCFRunLoopDefaultMode,
                std::time::Duration::from_millis(100),
                true,
            );
        }

        // Translate and forward any events from the callback
        while let Ok(raw) = callback_rx.try_recv() {
            let events = match raw {
                RawKeyEvent::Down(code) => vec![KeyEvent::Pressed(keycode_to_key(code))],
                RawKeyEvent::Up(code) => vec![KeyEvent::Released(keycode_to_key(code))],
                RawKeyEvent::Flags(event_flags) => {
                    let modifiers = ModifierState::from_flags(event_flags);
                    let events = last_modifiers.diff(&modifiers);
                    last_modifiers = modifiers;
                    events
                }
            };

            for event in events {
                // blocking_send since we're not in an async context
                if event_tx.blocking_send(event).is_err() {
                    warn!("failed to send key event - channel closed?");
                    return Ok(());
                }
            }
        }
    }

    // Tap is cleaned up when it goes out of scope

    Ok(())
}

/// Translate an ANSI-layout keycode into a key identity.
///
/// Letter keys map to their unshifted character; modifiers never reach
/// this path (they arrive as flag transitions); anything else is tracked
/// by keycode identity only.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn keycode_to_key(code: i64) -> Key {
    match code {
        0 => Key::Char('a'),
        1 => Key::Char('s'),
        2 => Key::Char('d'),
        3 => Key::Char('f'),
        4 => Key::Char('h'),
        5 => Key::Char('g'),
        6 => Key::Char('z'),
        7 => Key::Char('x'),
        8 => Key::Char('c'),
        9 => Key::Char('v'),
        11 => Key::Char('b'),
        12 => Key::Char('q'),
        13 => Key::Char('w'),
        14 => Key::Char('e'),
        15 => Key::Char('r'),
        16 => Key::Char('y'),
        17 => Key::Char('t'),
        31 => Key::Char('o'),
        32 => Key::Char('u'),
        34 => Key::Char('i'),
        35 => Key::Char('p'),
        37 => Key::Char('l'),
        38 => Key::Char('j'),
        40 => Key::Char('k'),
        45 => Key::Char('n'),
        46 => Key::Char('m'),
        53 => Key::Escape,
        other => Key::Other(other as u16),
    }
}
