//! Voice descriptors and speak requests
//!
//! A `Voice` is a read-only copy of what the speech engine reports.
//! The engine owns the real voice; we only keep enough to display it
//! and to ask for it back by id.

use serde::Serialize;

/// Suffix appended to the option label of the engine's default voice
pub const DEFAULT_MARKER: &str = " [Padrão]";

/// A named, language-tagged speech profile exposed by an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    /// Engine-specific stable identifier
    pub id: String,

    /// Human readable name (e.g. "Google português do Brasil")
    pub name: String,

    /// Language tag as reported by the engine (e.g. "pt-BR")
    pub lang: String,

    /// True if the engine uses this voice when none is requested
    pub is_default: bool,
}

impl Voice {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lang: impl Into<String>,
        is_default: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lang: lang.into(),
            is_default,
        }
    }

    /// Text shown for this voice in the selector
    ///
    /// `"{name} ({lang})"`, plus `" [Padrão]"` for the default voice.
    pub fn label(&self) -> String {
        let mut label = format!("{} ({})", self.name, self.lang);
        if self.is_default {
            label.push_str(DEFAULT_MARKER);
        }
        label
    }
}

/// Text plus optional voice, submitted once for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakRequest {
    /// Never empty; the dispatcher rejects empty text before building one
    pub text: String,

    /// None lets the engine fall back to its own default voice
    pub voice: Option<Voice>,
}

impl SpeakRequest {
    pub fn new(text: impl Into<String>, voice: Option<Voice>) -> Self {
        Self {
            text: text.into(),
            voice,
        }
    }
}
