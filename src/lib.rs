//! falar - console text-to-speech front-end
//!
//! Type text, pick one of the voices the local speech engine offers, and
//! have it spoken. The engine's voice list is mirrored into a selector
//! whenever the engine reports a change; speaking resolves the selected
//! option back to a voice and hands the request to the engine.

pub mod cli;
pub mod clipboard;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod platform;
pub mod speech;
pub mod state;
pub mod ui;
pub mod voices;

pub use error::{FalarError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "falar";
