//! Output sinks handed to commands.
//!
//! A command writes to `out()` and `err()` without knowing where the bytes go.
//! The interpreter decides per invocation: the [`Terminal`] pair for a plain
//! command, or a fresh [`Capture`] when the line carries a redirection.

use std::io::{self, Write};

/// The `(out, err)` pair of text streams a command writes to.
pub trait SinkPair {
    /// Standard output stream.
    fn out(&mut self) -> &mut dyn Write;

    /// Standard error stream.
    fn err(&mut self) -> &mut dyn Write;

    /// Flush both streams.
    fn flush(&mut self) -> io::Result<()> {
        self.out().flush()?;
        self.err().flush()
    }
}

/// The process-lifetime sink pair (normally stdout + stderr).
#[derive(Debug, Default)]
pub struct Terminal<O, E> {
    pub out: O,
    pub err: E,
}

impl<O: Write, E: Write> Terminal<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }
}

impl Terminal<io::Stdout, io::Stderr> {
    /// The host's standard output and standard error.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> SinkPair for Terminal<O, E> {
    fn out(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn err(&mut self) -> &mut dyn Write {
        &mut self.err
    }
}

/// In-memory sink pair backing both streams with one buffer.
///
/// Writes to either stream are merged in the order they happen.
#[derive(Debug, Default)]
pub struct Capture {
    buf: Vec<u8>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the capture, returning the merged bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl SinkPair for Capture {
    fn out(&mut self) -> &mut dyn Write {
        &mut self.buf
    }

    fn err(&mut self) -> &mut dyn Write {
        &mut self.buf
    }
}
