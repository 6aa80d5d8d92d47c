//! Terminal output: notices and listings

pub mod notice;
pub mod render;

pub use notice::{Notifier, TerminalNotifier};
pub use render::{render_json, render_options, HELP};
