//! Text rendering for the terminal front-end

use crate::speech::Voice;
use crate::voices::Selector;
use crate::Result;

/// Shown in place of the list when the engine reported no voices
pub const NO_VOICES: &str = "No voices available; the engine default voice will be used";

/// Command summary printed by `/help`
pub const HELP: &str = "\
Type text and press Enter to speak it.
  /voices          list voices
  /voice N         choose voice N
  /voice default   let the engine choose
  /text TEXT       set the text without speaking
  /speak           speak the current text
  /paste           set the text from the clipboard
  /refresh         ask the engine for its voices again
  /help            show this help
  /quit            exit
  //TEXT           speak text starting with '/'";

/// Render the selector, numbering options from 1 and marking the chosen one
pub fn render_options(selector: &Selector) -> String {
    if selector.is_empty() {
        return NO_VOICES.to_string();
    }

    let width = selector.len().to_string().len();
    let mut out = String::from("Voices:");
    for (i, option) in selector.options().iter().enumerate() {
        let marker = if selector.selected() == Some(i) { '*' } else { ' ' };
        out.push_str(&format!(
            "\n{} {:>width$}) {}",
            marker,
            i + 1,
            option.label,
            width = width
        ));
    }
    if selector.selected().is_none() {
        out.push_str("\n  (engine default voice)");
    }
    out
}

/// Render the snapshot as pretty JSON
pub fn render_json(voices: &[Voice]) -> Result<String> {
    Ok(serde_json::to_string_pretty(voices)?)
}
