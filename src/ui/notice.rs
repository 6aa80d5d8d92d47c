//! User-visible notices

use log::warn;
use std::io::{self, Write};

/// Something that can put a notice in front of the user
pub trait Notifier {
    fn notice(&mut self, message: &str);
}

/// Prints notices to the terminal, ringing the bell
///
/// Written to stderr so they stand apart from voice listings on stdout.
pub struct TerminalNotifier<W: Write> {
    out: W,
}

impl TerminalNotifier<io::Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Notifier for TerminalNotifier<W> {
    fn notice(&mut self, message: &str) {
        let result = writeln!(self.out, "\x07! {}", message).and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to show notice '{}': {}", message, e);
        }
    }
}
