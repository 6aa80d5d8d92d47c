//! Reading input from stdin
//!
//! With mio the fd is non-blocking and edge-triggered, so everything
//! available is read until the fd would block. With the select()
//! fallback the fd stays blocking and readiness is level-triggered, so
//! one read per wakeup is enough.

use super::handler::{handle_line, HandlerAction};
use super::line_buffer::LineBuffer;
use crate::state::State;
use crate::Result;
use log::debug;
use std::io::{self, Read};

/// Bytes read from stdin at a time
pub const READ_CHUNK: usize = 16 * 1024;

/// How much to read per readiness event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Keep reading until the reader reports `WouldBlock`
    UntilWouldBlock,
    /// A single read
    Once,
}

/// Where input stands after a readiness event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// Wait for the next event
    Drained,
    /// The session is over
    Quit,
}

/// Read what is available and run every complete line
///
/// End of input runs the unterminated tail, then quits. Voice refreshes
/// that arrived meanwhile are processed between lines, never inside one.
pub fn drain_input<R: Read>(
    reader: &mut R,
    lines: &mut LineBuffer,
    state: &mut State,
    mode: ReadMode,
) -> Result<ReadStatus> {
    let mut buf = [0u8; READ_CHUNK];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(ReadStatus::Drained),
            Err(e) => return Err(e.into()),
        };

        if n == 0 {
            debug!("stdin closed");
            if let Some(line) = lines.finish() {
                handle_line(&line, state)?;
            }
            state.process_pending();
            return Ok(ReadStatus::Quit);
        }

        for line in lines.push(&buf[..n]) {
            state.process_pending();
            if handle_line(&line, state)? == HandlerAction::Quit {
                return Ok(ReadStatus::Quit);
            }
        }

        if mode == ReadMode::Once {
            return Ok(ReadStatus::Drained);
        }
    }
}
