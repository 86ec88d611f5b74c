//! Session control for the enhance-and-paste pipeline
//!
//! The controller moves through Starting, Listening, Enhancing, Pasting,
//! and Stopped; only the startup liveness gate is fatal.

mod controller;

pub use controller::{ActivationError, SessionController, SessionState, StartupError};
