//! Error types for minish.

use std::io;

/// Syntax errors reported by the line tokenizer.
///
/// The display strings are user-visible and printed verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Missing redirection file name.")]
    MissingTarget,

    #[error("Invalid command syntax.")]
    InvalidSyntax,

    #[error("Unmatched quotes in command.")]
    UnmatchedQuote,
}

/// Errors produced by minish.
#[derive(Debug, thiserror::Error)]
pub enum MinishError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid arguments (usage: {0})")]
    Usage(String),

    #[error("{0}")]
    Command(String),

    #[error("{0}")]
    Vfs(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MinishError>;
