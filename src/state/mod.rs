//! Application state management
//!
//! `State` is the single process-wide instance created by `main`: the
//! configuration, the speech engine, the voice registry, and the text
//! field. It lives until the process exits.

pub mod config;

use crate::dispatch::{self, Outcome};
use crate::speech::{SpeechEngine, VoiceSignal};
use crate::ui::{render_options, Notifier};
use crate::voices::VoiceRegistry;
use crate::Result;
use config::Config;
use log::{info, warn};
use std::io::Write;

/// Main application state
pub struct State {
    /// Configuration loaded from ~/.falar.cfg
    pub config: Config,

    /// Snapshot of the engine's voices and the selector showing them
    pub registry: VoiceRegistry,

    /// Current contents of the text field
    pub text: String,

    /// Speech engine that receives requests
    engine: Box<dyn SpeechEngine>,

    /// Where user-visible notices go
    notifier: Box<dyn Notifier>,

    /// Raised by the engine when its voice list changes
    signal: VoiceSignal,

    /// Where listings go (stdout in the binary)
    out: Box<dyn Write>,
}

impl State {
    /// Create the application state and subscribe to voice changes
    ///
    /// Rate and volume from the config are applied to the engine first.
    /// The subscription is made exactly once, here.
    pub fn new(
        config: Config,
        mut engine: Box<dyn SpeechEngine>,
        notifier: Box<dyn Notifier>,
        signal: VoiceSignal,
        out: Box<dyn Write>,
    ) -> Result<Self> {
        info!("Initializing state with {} backend", engine.name());

        if let Some(rate) = config.rate() {
            engine.set_rate(rate)?;
            info!("Speech rate set to {}", rate);
        }
        if let Some(volume) = config.volume() {
            engine.set_volume(volume)?;
            info!("Speech volume set to {}", volume);
        }

        engine.subscribe(signal.callback());

        Ok(Self {
            config,
            registry: VoiceRegistry::new(),
            text: String::new(),
            engine,
            notifier,
            signal,
            out,
        })
    }

    /// Handle a pending voice-change notification, if any
    ///
    /// Returns true if a refresh was attempted.
    pub fn process_pending(&mut self) -> bool {
        if !self.signal.take() {
            return false;
        }

        if let Err(e) = self.refresh_voices() {
            // Snapshot and selector keep their previous contents
            warn!("Voice refresh failed: {}", e);
        }
        true
    }

    /// Rebuild the voice list from the engine
    ///
    /// Only the engine query can fail this; the list is replaced even if
    /// printing it afterwards does not work.
    pub fn refresh_voices(&mut self) -> Result<()> {
        self.registry.refresh(self.engine.as_mut())?;
        if self.config.list_on_refresh() {
            if let Err(e) = self.show_voices() {
                warn!("Failed to print voice list: {}", e);
            }
        }
        Ok(())
    }

    /// Ask the engine to rescan; the refresh follows its notification
    pub fn request_rescan(&mut self) -> Result<()> {
        self.engine.rescan()
    }

    /// Press the speak button
    pub fn speak(&mut self) -> Result<Outcome> {
        dispatch::speak(
            &self.text,
            &self.registry,
            self.engine.as_mut(),
            self.notifier.as_mut(),
        )
    }

    /// Replace the text field contents
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Choose a voice by its option position; false if out of range
    pub fn select_voice(&mut self, position: usize) -> bool {
        self.registry.selector_mut().select(position)
    }

    /// Go back to the engine's default voice
    pub fn clear_voice(&mut self) {
        self.registry.selector_mut().clear_selection();
    }

    /// Show a notice to the user
    pub fn notice(&mut self, message: &str) {
        self.notifier.notice(message);
    }

    /// Print the selector
    pub fn show_voices(&mut self) -> Result<()> {
        let listing = render_options(self.registry.selector());
        self.print(&listing)
    }

    /// Print a line to the output
    pub fn print(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    /// Name of the engine in use
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }
}
