//! Speech engine abstraction
//!
//! The engine is the platform's text-to-speech capability. falar treats it
//! as opaque: it lists voices, accepts fire-and-forget speak requests, and
//! tells us when its voice list changed. Failures inside the engine are
//! passed back unchanged and never translated here.

use super::voice::{SpeakRequest, Voice};
use crate::platform::is_wsl;
use crate::{FalarError, Result};
use log::info;
use std::fmt;
use std::str::FromStr;

/// Callback invoked by an engine when its voice list changed
///
/// May be called from any thread, any number of times.
pub type VoicesChanged = Box<dyn Fn() + Send>;

/// Speech engine trait
///
/// All backends implement this. The application only ever holds one engine.
pub trait SpeechEngine: Send {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Query the engine's current voice list, in engine order
    fn voices(&mut self) -> Result<Vec<Voice>>;

    /// Submit a request for playback without waiting for it to finish
    fn speak(&mut self, request: &SpeakRequest) -> Result<()>;

    /// Set speech rate (0-100, where 50 is normal)
    fn set_rate(&mut self, rate: u8) -> Result<()>;

    /// Set speech volume (0-100)
    fn set_volume(&mut self, volume: u8) -> Result<()>;

    /// Register the voice-change callback
    ///
    /// Engines that cannot push notifications fire it once here, since
    /// their voice list is already available.
    fn subscribe(&mut self, on_change: VoicesChanged);

    /// Ask the engine to re-read its voices and notify the subscriber
    fn rescan(&mut self) -> Result<()>;
}

/// Which backend to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    /// Pick the best backend for this platform
    #[default]
    Auto,
    /// The `tts` crate (Speech Dispatcher, AVFoundation, WinRT...)
    Native,
    /// espeak-ng subprocesses
    Espeak,
    /// Windows SAPI through PowerShell (WSL)
    Sapi,
}

impl FromStr for EngineKind {
    type Err = FalarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(EngineKind::Auto),
            "native" | "tts" => Ok(EngineKind::Native),
            "espeak" | "espeak-ng" => Ok(EngineKind::Espeak),
            "sapi" | "windows" => Ok(EngineKind::Sapi),
            other => Err(FalarError::Config(format!(
                "Unknown speech backend '{}' (expected auto, native, espeak or sapi)",
                other
            ))),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineKind::Auto => "auto",
            EngineKind::Native => "native",
            EngineKind::Espeak => "espeak",
            EngineKind::Sapi => "sapi",
        };
        f.write_str(name)
    }
}

/// Create a speech engine
///
/// With `EngineKind::Auto` the environment decides:
///
/// **WSL:** espeak-ng over PulseAudio, then Windows SAPI, then native.
///
/// **Native Linux:** native (Speech Dispatcher), then espeak-ng.
///
/// **macOS and others:** native.
pub fn create_engine(kind: EngineKind) -> Result<Box<dyn SpeechEngine>> {
    use super::backends::espeak::EspeakEngine;
    use super::backends::native::NativeEngine;
    use super::backends::windows::SapiEngine;

    match kind {
        EngineKind::Native => return Ok(Box::new(NativeEngine::new()?)),
        EngineKind::Espeak => return Ok(Box::new(EspeakEngine::new()?)),
        EngineKind::Sapi => return Ok(Box::new(SapiEngine::new()?)),
        EngineKind::Auto => {}
    }

    let platform = std::env::consts::OS;

    if platform == "linux" && is_wsl() {
        info!("Detected WSL environment");

        info!("Trying espeak-ng backend...");
        match EspeakEngine::new() {
            Ok(engine) => {
                info!("✓ Successfully initialized espeak-ng backend");
                return Ok(Box::new(engine));
            }
            Err(e) => info!("✗ espeak-ng backend unavailable: {}", e),
        }

        info!("Trying Windows SAPI backend...");
        match SapiEngine::new() {
            Ok(engine) => {
                info!("✓ Successfully initialized Windows SAPI backend");
                return Ok(Box::new(engine));
            }
            Err(e) => info!("✗ Windows SAPI backend unavailable: {}", e),
        }

        info!("Trying native backend...");
        return match NativeEngine::new() {
            Ok(engine) => {
                info!("✓ Successfully initialized native backend");
                Ok(Box::new(engine))
            }
            Err(e) => Err(FalarError::Speech(format!(
                "No speech backend available on WSL. Tried:\n\
                 1. espeak-ng (install: sudo apt install espeak-ng)\n\
                 2. Windows SAPI (PowerShell not available)\n\
                 3. Speech Dispatcher (not configured)\n\
                 Error: {}",
                e
            ))),
        };
    }

    if platform == "linux" {
        info!("Detected native Linux environment");

        info!("Trying native backend (Speech Dispatcher)...");
        match NativeEngine::new() {
            Ok(engine) => {
                info!("✓ Successfully initialized native backend");
                return Ok(Box::new(engine));
            }
            Err(e) => {
                info!("✗ Speech Dispatcher unavailable: {}", e);
                info!("To install: sudo apt install speech-dispatcher");
            }
        }

        info!("Trying espeak-ng backend...");
        return match EspeakEngine::new() {
            Ok(engine) => {
                info!("✓ Successfully initialized espeak-ng backend");
                Ok(Box::new(engine))
            }
            Err(e) => Err(FalarError::Speech(format!(
                "No speech backend available on Linux. Tried:\n\
                 1. Speech Dispatcher (install: sudo apt install speech-dispatcher)\n\
                 2. espeak-ng (install: sudo apt install espeak-ng)\n\
                 Error: {}",
                e
            ))),
        };
    }

    info!("Creating native speech engine for platform: {}", platform);
    match NativeEngine::new() {
        Ok(engine) => {
            info!("✓ Successfully initialized native backend");
            Ok(Box::new(engine))
        }
        Err(e) => Err(FalarError::Speech(format!(
            "Failed to initialize speech backend for platform '{}': {}",
            platform, e
        ))),
    }
}
