//! Foundation types for minish.
//!
//! This crate holds the pieces shared by every other minish crate: the error
//! enum with its `Result` alias and the shell configuration.

pub mod config;
pub mod error;
