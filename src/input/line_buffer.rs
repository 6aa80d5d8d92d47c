//! Line assembly for raw stdin reads
//!
//! Reads from stdin arrive in arbitrary chunks. The buffer keeps the
//! partial tail and hands out complete lines.

use log::debug;

/// Accumulates bytes until a newline completes a line
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    /// Create a new empty line buffer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append a chunk, returning every line it completes
    ///
    /// Line terminators (`\n`, `\r\n`) are stripped. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }

        if !lines.is_empty() {
            debug!("LineBuffer: {} complete lines", lines.len());
        }
        lines
    }

    /// Take whatever is left as a final line (at end of input)
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    /// Check if no partial line is pending
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
