//! Speech engine boundary

pub mod backends;
pub mod engine;
pub mod signal;
pub mod voice;

pub use engine::{create_engine, EngineKind, SpeechEngine, VoicesChanged};
pub use signal::VoiceSignal;
pub use voice::{SpeakRequest, Voice, DEFAULT_MARKER};
