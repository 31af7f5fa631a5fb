//! Command interpreter and REPL for minish.
//!
//! A line goes through the tokenizer (trailing redirection, then quote-aware
//! word splitting), then through the `CommandRegistry`, which looks up the
//! built-in by name and runs it against a sink pair. The registry is closed:
//! the built-ins are fixed at construction and cannot be extended.

mod archive_commands;
mod commands;
mod file_commands;
mod interpreter;
mod repl;
mod session;
mod sink;
pub mod tokenizer;

#[cfg(test)]
mod test_utils;

/// Line, word and character totals computed by `wc`.
pub use file_commands::Counts;
/// A single built-in command.
pub use interpreter::Command;
/// The fixed table of built-ins, with dispatch and redirection.
pub use interpreter::CommandRegistry;
/// Everything a command may touch while it runs.
pub use interpreter::Environment;
/// Send panic reports to `log` instead of stderr.
pub use interpreter::log_panics;
/// Prompt/read/dispatch loop.
pub use repl::Repl;
/// Working directory and exit flag.
pub use session::Session;
/// Output streams handed to commands.
pub use sink::{Capture, SinkPair, Terminal};
pub use tokenizer::{CommandLine, Redirection, parse_line};
