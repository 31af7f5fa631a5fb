//! Per-process shell state.

use std::path::PathBuf;

/// The only state that survives from one command to the next.
#[derive(Debug, Clone)]
pub struct Session {
    /// Logical working directory. Absolute; the process cwd is never changed.
    pub cwd: PathBuf,
    /// Where a bare `cd` goes.
    pub home: PathBuf,
    exit_requested: bool,
}

impl Session {
    pub fn new(cwd: PathBuf, home: PathBuf) -> Self {
        Self {
            cwd,
            home,
            exit_requested: false,
        }
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, input: &str) -> PathBuf {
        minish_vfs::path::resolve(&self.cwd, input)
    }

    /// Ask the REPL to stop after the current command.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
