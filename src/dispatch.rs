//! Speak dispatcher
//!
//! Turns a trigger into at most one speak request. Empty text is the only
//! thing checked here; anything the engine does with the request afterwards
//! is its own business.

use crate::speech::{SpeakRequest, SpeechEngine};
use crate::ui::Notifier;
use crate::voices::VoiceRegistry;
use crate::Result;
use log::debug;

/// Notice shown when speak is triggered with no text
pub const EMPTY_TEXT_NOTICE: &str = "Please enter text to speak";

/// What a trigger produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Empty text; nothing was sent
    Rejected,
    /// Request handed to the engine
    Dispatched(SpeakRequest),
}

/// Validate, resolve the selected voice, and submit
///
/// The text is used exactly as typed. The voice comes from the registry's
/// current selection, resolved against the snapshot held right now. Engine
/// errors are returned unchanged.
pub fn speak(
    text: &str,
    registry: &VoiceRegistry,
    engine: &mut dyn SpeechEngine,
    notifier: &mut dyn Notifier,
) -> Result<Outcome> {
    if text.is_empty() {
        debug!("Speak rejected: empty text");
        notifier.notice(EMPTY_TEXT_NOTICE);
        return Ok(Outcome::Rejected);
    }

    let request = SpeakRequest::new(text, registry.selected_voice().cloned());
    debug!(
        "Dispatching {} chars with voice {:?}",
        request.text.len(),
        request.voice.as_ref().map(|v| v.id.as_str())
    );
    engine.speak(&request)?;

    Ok(Outcome::Dispatched(request))
}
