//! Command execution

use super::command::Command;
use crate::clipboard::get_from_clipboard;
use crate::state::State;
use crate::ui::HELP;
use crate::{FalarError, Result};
use log::{debug, error};

/// What the event loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    /// Keep reading input
    Continue,
    /// Leave the event loop
    Quit,
}

/// Parse and run one input line
///
/// Usage mistakes are shown as notices. Engine failures are logged and
/// the loop carries on; they never end the session.
pub fn handle_line(line: &str, state: &mut State) -> Result<HandlerAction> {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(FalarError::Usage(message)) => {
            state.notice(&message);
            return Ok(HandlerAction::Continue);
        }
        Err(e) => return Err(e),
    };

    match execute(command, state) {
        Ok(action) => Ok(action),
        Err(FalarError::Speech(e)) => {
            error!("Speech engine error: {}", e);
            Ok(HandlerAction::Continue)
        }
        Err(FalarError::Clipboard(e)) => {
            state.notice(&e);
            Ok(HandlerAction::Continue)
        }
        Err(e) => Err(e),
    }
}

/// Run a parsed command against the state
pub fn execute(command: Command, state: &mut State) -> Result<HandlerAction> {
    debug!("Executing {:?}", command);

    match command {
        Command::SayLine(text) => {
            state.set_text(text);
            state.speak()?;
        }
        Command::SetText(text) => state.set_text(text),
        Command::Speak => {
            state.speak()?;
        }
        Command::ListVoices => state.show_voices()?,
        Command::SelectVoice(position) => {
            if state.select_voice(position) {
                state.show_voices()?;
            } else {
                let count = state.registry.selector().len();
                state.notice(&format!(
                    "No voice {} (there are {} voices)",
                    position + 1,
                    count
                ));
            }
        }
        Command::DefaultVoice => {
            state.clear_voice();
            state.print("Using the engine default voice")?;
        }
        Command::Paste => {
            let text = get_from_clipboard()?;
            state.print(&format!("Text set from clipboard ({} chars)", text.chars().count()))?;
            state.set_text(text);
        }
        Command::Refresh => state.request_rescan()?,
        Command::Help => state.print(HELP)?,
        Command::Quit => return Ok(HandlerAction::Quit),
    }

    Ok(HandlerAction::Continue)
}
