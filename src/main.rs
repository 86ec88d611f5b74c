//! prompt-enhancer-daemon: global-hotkey clipboard enhancement
//!
//! The daemon listens system-wide for Cmd+Shift+V, sends the current
//! clipboard text to a local enhancement service, writes the result back
//! to the clipboard, and pastes it into the foreground application.
//! Releasing ESC exits; SIGINT/SIGTERM also shut it down.
//!
//! Scope:
//! - Global key event tap via CGEventTap (Accessibility permission
//!   required)
//! - Chord detection over the pressed-key set
//! - One enhance-and-paste pipeline run per chord trigger, strictly
//!   sequential
//! - Startup liveness gate against the enhancement service

mod clipboard;
mod config;
mod enhance;
mod events;
mod hotkey;
mod lifecycle;
mod paste;
mod session;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::clipboard::ArboardClipboard;
use crate::config::Config;
use crate::enhance::EnhanceClient;
use crate::events::SessionEvent;
use crate::hotkey::KeyEventListener;
use crate::lifecycle::ShutdownSignal;
use crate::paste::EnigoPaster;
use crate::session::SessionController;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "prompt-enhancer-daemon starting"
    );

    let config = Config::default();
    print_banner(&config);

    let client = EnhanceClient::new(&config).context("failed to build http client")?;

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    // Create channels for inter-component communication
    // Key event listener -> session controller
    let (key_tx, key_rx) = mpsc::channel(64);
    // Session controller -> operator feedback
    let (event_tx, _event_rx) = broadcast::channel::<SessionEvent>(32);

    let mut controller = SessionController::new(
        config,
        client,
        ArboardClipboard::new(),
        EnigoPaster::new(),
        event_tx.clone(),
    );

    // A dead enhancement service is fatal at startup only; every later
    // failure is reported and the daemon keeps listening
    if let Err(err) = controller.startup().await {
        error!(%err, "startup aborted");
        return Err(err.into());
    }
    println!("Enhancement service is up. Listening for the hotkey...");

    // Start the key event listener (runs on a dedicated thread)
    let listener = KeyEventListener::new(key_tx);
    match listener.start() {
        Ok(()) => {
            info!("key event listener started");
        }
        Err(err) => {
            error!(?err, "failed to start key event listener");
            warn!("continuing without hotkey support - check Accessibility permissions");
        }
    }

    let mut feedback_rx = event_tx.subscribe();

    info!("daemon initialized, entering main loop");

    // Main event loop
    tokio::select! {
        // Run the session controller (processes key events)
        _ = controller.run(key_rx) => {
            info!("session controller exited");
        }

        // Render session events as operator-facing status lines
        _ = async {
            loop {
                match feedback_rx.recv().await {
                    Ok(event) => {
                        println!("{}", event);
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "session event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        } => {
            info!("session event handler exited");
        }

        // Wait for shutdown signal
        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    // Cleanup
    info!("shutting down...");

    listener.stop();

    info!("prompt-enhancer-daemon stopped");

    Ok(())
}

/// Startup banner describing the workflow
fn print_banner(config: &Config) {
    println!("prompt-enhancer-daemon");
    println!("Hotkey: {}", config.chord);
    println!("Copy text anywhere, press the hotkey, and the enhanced text");
    println!("is put back on the clipboard and pasted for you.");
    println!("Press {} to quit.", config.exit_key);
}
