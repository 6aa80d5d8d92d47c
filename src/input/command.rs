//! Command parsing for the line-oriented front-end
//!
//! Lines starting with '/' are commands; everything else is text to speak.

use crate::{FalarError, Result};

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the text field to this and speak it
    SayLine(String),
    /// Set the text field without speaking
    SetText(String),
    /// Speak the current text field
    Speak,
    /// List the voice options
    ListVoices,
    /// Choose option N (0-based; the user types it 1-based)
    SelectVoice(usize),
    /// Use the engine's default voice
    DefaultVoice,
    /// Set the text field from the clipboard
    Paste,
    /// Ask the engine for its voices again
    Refresh,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line (without its line terminator)
    pub fn parse(line: &str) -> Result<Self> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::SayLine(line.to_string()));
        };

        // "//text" speaks "/text"
        if rest.starts_with('/') {
            return Ok(Command::SayLine(rest.to_string()));
        }

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim_start()),
            None => (rest, ""),
        };

        match name {
            "speak" | "s" => Ok(Command::Speak),
            "text" | "t" => Ok(Command::SetText(arg.to_string())),
            "voices" | "list" | "l" => Ok(Command::ListVoices),
            "voice" | "v" => Self::parse_voice(arg.trim()),
            "paste" | "p" => Ok(Command::Paste),
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(FalarError::Usage(format!(
                "Unknown command '/{}' (try /help)",
                other
            ))),
        }
    }

    fn parse_voice(arg: &str) -> Result<Self> {
        match arg {
            "" => Err(FalarError::Usage(
                "Usage: /voice N or /voice default".to_string(),
            )),
            "default" | "none" => Ok(Command::DefaultVoice),
            n => {
                let number = n
                    .parse::<usize>()
                    .map_err(|_| FalarError::Usage(format!("Not a voice number: '{}'", n)))?;
                // Options are shown from 1; any spelling of 0 means the default
                Ok(match number.checked_sub(1) {
                    Some(position) => Command::SelectVoice(position),
                    None => Command::DefaultVoice,
                })
            }
        }
    }
}
