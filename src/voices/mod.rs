//! Voice list synchronization
//!
//! Keeps the engine's voice list and the selector in step.

pub mod registry;
pub mod selector;

pub use registry::VoiceRegistry;
pub use selector::{OptionValue, Selector, VoiceOption};
