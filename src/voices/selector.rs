//! Voice selector
//!
//! The list the user picks a voice from. Each option carries the snapshot
//! position it was rendered from together with the voice's id, so a
//! selection can always be checked against the snapshot it came from.

use crate::speech::Voice;
use log::debug;

/// Value carried by a selector option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    /// Position in the snapshot the option was rendered from
    pub index: usize,

    /// Engine id of the voice at that position
    pub id: String,
}

/// One rendered option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOption {
    pub value: OptionValue,
    pub label: String,
}

impl VoiceOption {
    /// Render the option for the voice at `index`
    pub fn render(index: usize, voice: &Voice) -> Self {
        Self {
            value: OptionValue {
                index,
                id: voice.id.clone(),
            },
            label: voice.label(),
        }
    }
}

/// Selector state: the options and which one is chosen
#[derive(Debug, Default)]
pub struct Selector {
    options: Vec<VoiceOption>,
    selected: Option<usize>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and repopulate the option list
    ///
    /// The selected voice stays selected if its id is still offered;
    /// otherwise the first option is selected, as a freshly filled
    /// `<select>` would do. No options means no selection.
    pub(crate) fn replace(&mut self, options: Vec<VoiceOption>) {
        let previous = self.value().map(|v| v.id.clone());

        self.options = options;
        self.selected = previous
            .and_then(|id| self.options.iter().position(|o| o.value.id == id))
            .or(if self.options.is_empty() { None } else { Some(0) });

        debug!(
            "Selector repopulated with {} options, selected {:?}",
            self.options.len(),
            self.selected
        );
    }

    /// Choose the option at `position`; false if out of range
    pub fn select(&mut self, position: usize) -> bool {
        if position < self.options.len() {
            self.selected = Some(position);
            true
        } else {
            false
        }
    }

    /// Choose no voice, leaving the engine on its default
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Value of the chosen option, if any
    pub fn value(&self) -> Option<&OptionValue> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|o| &o.value)
    }

    /// Position of the chosen option, if any
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn options(&self) -> &[VoiceOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
