//! Native Rust TTS backend using the tts crate
//!
//! This backend uses the `tts` crate which provides a unified interface to:
//! - Speech Dispatcher on Linux (via native bindings)
//! - AVFoundation on macOS/iOS (via native bindings)
//! - WinRT/SAPI on Windows
//!
//! The tts crate has no voice-change event, so the voice list is reported
//! once at subscribe time and again on every rescan.

use crate::speech::{SpeakRequest, SpeechEngine, Voice, VoicesChanged};
use crate::{FalarError, Result};
use log::{debug, error, warn};
use tts::Tts as TtsCrate;

/// Native TTS backend using the tts crate
pub struct NativeEngine {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    /// Voices from the last query, used to look requests up by id
    voices: Vec<tts::Voice>,

    /// Voice the engine was using at startup
    default_voice: Option<tts::Voice>,

    /// Id of the voice currently set on the engine
    current_id: Option<String>,

    /// Voice-change subscriber
    on_change: Option<VoicesChanged>,
}

impl NativeEngine {
    /// Create a new native TTS engine
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| FalarError::Speech(format!("Failed to initialize TTS: {}", e)))?;

        let default_voice = if tts.supported_features().voice {
            match tts.voice() {
                Ok(voice) => voice,
                Err(e) => {
                    warn!("Could not read the engine's current voice: {}", e);
                    None
                }
            }
        } else {
            warn!("Voice selection not supported on this platform");
            None
        };

        debug!(
            "Native TTS backend created, default voice: {:?}",
            default_voice.as_ref().map(|v| v.name())
        );

        Ok(Self {
            tts,
            voices: Vec::new(),
            current_id: default_voice.as_ref().map(|v| v.id()),
            default_voice,
            on_change: None,
        })
    }

    /// Convert falar rate (0-100) to the engine's native range
    ///
    /// 50 maps to the engine's normal rate; 0 and 100 to its extremes.
    fn convert_rate(rate: u8, min: f32, normal: f32, max: f32) -> f32 {
        let rate = rate.min(100) as f32;
        if rate <= 50.0 {
            min + (normal - min) * rate / 50.0
        } else {
            normal + (max - normal) * (rate - 50.0) / 50.0
        }
    }

    /// Convert falar volume (0-100) to the engine's native range
    fn convert_volume(volume: u8, min: f32, max: f32) -> f32 {
        min + (max - min) * volume.min(100) as f32 / 100.0
    }

    /// Re-read the engine's voices into the lookup cache
    fn load_voices(&mut self) -> Result<()> {
        if !self.tts.supported_features().voice {
            self.voices.clear();
            return Ok(());
        }

        self.voices = self
            .tts
            .voices()
            .map_err(|e| FalarError::Speech(format!("Failed to get voices: {}", e)))?;
        debug!("Engine reports {} voices", self.voices.len());
        Ok(())
    }

    /// Find a cached engine voice by id, re-reading the list once on a miss
    fn lookup(&mut self, id: &str) -> Result<Option<tts::Voice>> {
        if let Some(voice) = self.voices.iter().find(|v| v.id() == id) {
            return Ok(Some(voice.clone()));
        }
        self.load_voices()?;
        Ok(self.voices.iter().find(|v| v.id() == id).cloned())
    }

    /// Put the requested voice on the engine, or restore the default
    fn apply_voice(&mut self, requested: Option<&Voice>) -> Result<()> {
        let target = match requested {
            Some(voice) => match self.lookup(&voice.id)? {
                Some(found) => Some(found),
                None => {
                    // Left to the engine's default, like an unknown voice in a browser
                    warn!("Voice {} is no longer offered by the engine", voice.id);
                    self.default_voice.clone()
                }
            },
            None => self.default_voice.clone(),
        };

        let Some(target) = target else {
            return Ok(());
        };
        if self.current_id.as_deref() == Some(target.id().as_str()) {
            return Ok(());
        }

        debug!("Selecting voice: {}", target.name());
        self.tts
            .set_voice(&target)
            .map_err(|e| FalarError::Speech(format!("Failed to set voice: {}", e)))?;
        self.current_id = Some(target.id());
        Ok(())
    }

    fn notify(&self) {
        if let Some(on_change) = &self.on_change {
            on_change();
        }
    }
}

impl SpeechEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        self.load_voices()?;

        let default_id = self.default_voice.as_ref().map(|v| v.id());
        Ok(self
            .voices
            .iter()
            .map(|v| {
                let id = v.id();
                let is_default = default_id.as_deref() == Some(id.as_str());
                Voice::new(id, v.name(), v.language().to_string(), is_default)
            })
            .collect())
    }

    fn speak(&mut self, request: &SpeakRequest) -> Result<()> {
        if self.tts.supported_features().voice {
            self.apply_voice(request.voice.as_ref())?;
        }

        debug!("Speaking: {}", request.text);
        self.tts.speak(&request.text, false).map_err(|e| {
            error!("Failed to speak: {}", e);
            FalarError::Speech(format!("Speak failed: {}", e))
        })?;

        Ok(())
    }

    fn set_rate(&mut self, rate: u8) -> Result<()> {
        debug!("Setting rate to {}", rate);

        if !self.tts.supported_features().rate {
            warn!("Rate control not supported on this platform");
            return Ok(());
        }

        let converted = Self::convert_rate(
            rate,
            self.tts.min_rate(),
            self.tts.normal_rate(),
            self.tts.max_rate(),
        );
        self.tts
            .set_rate(converted)
            .map_err(|e| FalarError::Speech(format!("Failed to set rate: {}", e)))?;

        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        debug!("Setting volume to {}", volume);

        if !self.tts.supported_features().volume {
            warn!("Volume control not supported on this platform");
            return Ok(());
        }

        let converted =
            Self::convert_volume(volume, self.tts.min_volume(), self.tts.max_volume());
        self.tts
            .set_volume(converted)
            .map_err(|e| FalarError::Speech(format!("Failed to set volume: {}", e)))?;

        Ok(())
    }

    fn subscribe(&mut self, on_change: VoicesChanged) {
        self.on_change = Some(on_change);
        self.notify();
    }

    fn rescan(&mut self) -> Result<()> {
        debug!("Rescanning native voices");
        self.voices.clear();
        self.notify();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_engine() {
        // May fail without speech-dispatcher (Linux) or audio in CI
        match NativeEngine::new() {
            Ok(_) => println!("✓ Native TTS backend initialized successfully"),
            Err(e) => println!("⚠ TTS initialization failed (may be expected in CI): {}", e),
        }
    }

    #[test]
    fn test_rate_conversion() {
        assert_eq!(NativeEngine::convert_rate(0, 0.0, 1.0, 10.0), 0.0);
        assert_eq!(NativeEngine::convert_rate(50, 0.0, 1.0, 10.0), 1.0);
        assert_eq!(NativeEngine::convert_rate(100, 0.0, 1.0, 10.0), 10.0);
        assert_eq!(NativeEngine::convert_rate(25, 0.0, 1.0, 10.0), 0.5);
        // Out of range clamps to max
        assert_eq!(NativeEngine::convert_rate(200, 0.0, 1.0, 10.0), 10.0);
    }

    #[test]
    fn test_volume_conversion() {
        assert_eq!(NativeEngine::convert_volume(0, 0.0, 1.0), 0.0);
        assert_eq!(NativeEngine::convert_volume(50, 0.0, 1.0), 0.5);
        assert_eq!(NativeEngine::convert_volume(100, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_voices_have_ids() {
        if let Ok(mut engine) = NativeEngine::new() {
            if let Ok(voices) = engine.voices() {
                assert!(voices.iter().all(|v| !v.id.is_empty()));
                assert!(voices.iter().filter(|v| v.is_default).count() <= 1);
            }
        }
    }
}
