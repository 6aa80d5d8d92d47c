//! Input handling
//!
//! stdin is read in chunks, assembled into lines, parsed into commands,
//! and run against the application state.

pub mod command;
pub mod handler;
pub mod line_buffer;
pub mod reader;

pub use command::Command;
pub use handler::{execute, handle_line, HandlerAction};
pub use line_buffer::LineBuffer;
pub use reader::{drain_input, ReadMode, ReadStatus};
