//! Voice registry
//!
//! Holds the snapshot of the engine's voices together with the selector
//! rendered from it. Both are only ever replaced in the same call, so
//! option *i* always describes snapshot index *i*.

use super::selector::{OptionValue, Selector, VoiceOption};
use crate::speech::{SpeechEngine, Voice};
use crate::Result;
use log::{debug, info, warn};

/// Snapshot of the engine's voices plus the selector showing them
#[derive(Debug, Default)]
pub struct VoiceRegistry {
    snapshot: Vec<Voice>,
    selector: Selector,

    /// Number of snapshots taken so far
    generation: u64,
}

impl VoiceRegistry {
    /// Empty registry, as at startup before any notification
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the snapshot and the selector from the engine
    ///
    /// Engine order is kept as-is. If the engine cannot list its voices,
    /// the previous snapshot and selector are left untouched.
    pub fn refresh(&mut self, engine: &mut dyn SpeechEngine) -> Result<()> {
        let voices = engine.voices()?;
        self.replace(voices);
        info!(
            "Voice list refreshed from {} backend: {} voices",
            engine.name(),
            self.snapshot.len()
        );
        Ok(())
    }

    /// Replace snapshot and selector together
    fn replace(&mut self, voices: Vec<Voice>) {
        let options = voices
            .iter()
            .enumerate()
            .map(|(i, voice)| VoiceOption::render(i, voice))
            .collect();

        self.snapshot = voices;
        self.selector.replace(options);
        self.generation += 1;
    }

    /// Voice for a selector value, checked against the current snapshot
    ///
    /// The position is tried first and only trusted when the id matches;
    /// otherwise the id is looked up anywhere in the snapshot. A value
    /// matching nothing resolves to no voice.
    pub fn resolve(&self, value: &OptionValue) -> Option<&Voice> {
        if let Some(voice) = self.snapshot.get(value.index) {
            if voice.id == value.id {
                return Some(voice);
            }
        }

        match self.snapshot.iter().find(|v| v.id == value.id) {
            Some(voice) => {
                debug!("Voice {} moved from position {}", value.id, value.index);
                Some(voice)
            }
            None => {
                warn!(
                    "Selected voice {} is not in the current snapshot; using engine default",
                    value.id
                );
                None
            }
        }
    }

    /// Voice behind the currently selected option
    pub fn selected_voice(&self) -> Option<&Voice> {
        self.selector.value().and_then(|value| self.resolve(value))
    }

    pub fn snapshot(&self) -> &[Voice] {
        &self.snapshot
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Mutable selector access for choosing an option
    pub fn selector_mut(&mut self) -> &mut Selector {
        &mut self.selector
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
