//! The read-eval-print loop.

use std::io::BufRead;

use minish_types::config::ShellConfig;
use minish_types::error::Result;
use minish_vfs::Vfs;

use crate::interpreter::{CommandRegistry, report};
use crate::session::Session;
use crate::sink::SinkPair;
use crate::tokenizer::parse_line;

/// An interactive shell: registry, session and filesystem bound together.
pub struct Repl<V: Vfs> {
    registry: CommandRegistry,
    session: Session,
    vfs: V,
    prompt_suffix: String,
    banner: String,
}

impl<V: Vfs> Repl<V> {
    pub fn new(session: Session, vfs: V, config: &ShellConfig) -> Self {
        Self {
            registry: CommandRegistry::new(),
            session,
            vfs,
            prompt_suffix: config.prompt_suffix.clone(),
            banner: config.banner.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The prompt shown before reading the next line.
    pub fn prompt(&self) -> String {
        format!("{}{}", self.session.cwd.display(), self.prompt_suffix)
    }

    /// Tokenize and run a single input line.
    pub fn run_line(&mut self, line: &str, terminal: &mut dyn SinkPair) {
        match parse_line(line) {
            Ok(Some(cl)) => self
                .registry
                .dispatch(&cl, &mut self.session, &self.vfs, terminal),
            Ok(None) => {},
            Err(e) => {
                log::debug!("Rejected line {line:?}: {e}");
                report(terminal, &e);
            },
        }
    }

    /// Prompt, read and run lines until `exit` or end of input.
    ///
    /// Only a failure to write the prompt or read input ends the loop with an
    /// error; command failures are reported and the loop continues.
    pub fn run<R: BufRead>(&mut self, mut input: R, terminal: &mut dyn SinkPair) -> Result<()> {
        log::info!("Shell started in {}", self.session.cwd.display());
        if !self.banner.is_empty() {
            writeln!(terminal.out(), "{}", self.banner)?;
        }

        let mut buf = Vec::new();
        loop {
            write!(terminal.out(), "{}", self.prompt())?;
            terminal.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                log::info!("End of input");
                break;
            }
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\n', '\r']);
            self.run_line(line, terminal);

            if self.session.exit_requested() {
                log::info!("Exit requested");
                break;
            }
        }
        terminal.flush()?;
        Ok(())
    }
}
