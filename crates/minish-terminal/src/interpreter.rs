//! Command trait, registry, and the dispatch/redirection harness.
//!
//! Commands never see redirection. They write to whatever sink pair the
//! registry hands them; when a line ends in `> file` or `>> file` that pair is
//! a fresh [`Capture`], flushed to the target once the command has finished.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use minish_types::error::{MinishError, Result};
use minish_vfs::Vfs;

use crate::session::Session;
use crate::sink::{Capture, SinkPair};
use crate::tokenizer::CommandLine;

/// Everything a command may touch during one invocation.
pub struct Environment<'a> {
    /// Working directory and exit flag.
    pub session: &'a mut Session,
    /// The filesystem.
    pub vfs: &'a dyn Vfs,
    /// The active output/error pair (terminal or capture).
    pub sinks: &'a mut dyn SinkPair,
}

/// A single built-in command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// Usage string (e.g. "ls \[path\]").
    fn usage(&self) -> &str;

    /// Run the command.
    ///
    /// An `Err` is rendered by the registry as `<name>: <error>` on the
    /// active error stream; the command itself need not print it.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()>;
}

/// The fixed table of built-in commands.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Registry holding every built-in command.
    pub fn new() -> Self {
        let mut reg = Self::empty();
        crate::commands::register_builtins(&mut reg);
        reg
    }

    pub(crate) fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Add a command. Replaces any existing command with the same name.
    pub(crate) fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Run one parsed command line.
    ///
    /// Never fails: every error ends up as a message on an error stream.
    /// Without a redirection the command writes straight to `terminal`. With
    /// one, it writes to a private capture whose bytes are then written to the
    /// target file; `terminal` is untouched until the capture is gone, and any
    /// failure to write the target is reported on `terminal`.
    pub fn dispatch(
        &self,
        line: &CommandLine,
        session: &mut Session,
        vfs: &dyn Vfs,
        terminal: &mut dyn SinkPair,
    ) {
        let Some(cmd) = self.commands.get(line.name.as_str()) else {
            log::debug!("Unknown command {:?}", line.name);
            report(terminal, &MinishError::UnknownCommand(line.name.clone()));
            return;
        };
        let args = line.arg_refs();
        log::debug!(
            "Dispatching {} ({} args, redirect: {:?})",
            line.name,
            args.len(),
            line.redirection
        );

        let Some(redir) = &line.redirection else {
            invoke(cmd.as_ref(), &args, session, vfs, terminal);
            return;
        };

        let mut capture = Capture::new();
        invoke(cmd.as_ref(), &args, session, vfs, &mut capture);
        let bytes = capture.into_bytes();

        let target = session.resolve(&redir.target);
        if let Err(e) = vfs.write(&target, &bytes, redir.mode) {
            log::warn!("Redirection to {} failed: {e}", target.display());
            report(terminal, &e);
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Route panic reports to the `log` facade instead of the process stderr.
///
/// Call once at startup. A panicking command then shows only the single
/// `<name>: internal error` line on the active error stream.
pub fn log_panics() {
    panic::set_hook(Box::new(|info| log::error!("{info}")));
}

/// Run a command against `sinks`, turning errors and panics into messages.
fn invoke(
    cmd: &dyn Command,
    args: &[&str],
    session: &mut Session,
    vfs: &dyn Vfs,
    sinks: &mut dyn SinkPair,
) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut env = Environment {
            session: &mut *session,
            vfs,
            sinks: &mut *sinks,
        };
        cmd.execute(args, &mut env)
    }));
    match outcome {
        Ok(Ok(())) => {},
        Ok(Err(e)) => report(sinks, &format_args!("{}: {e}", cmd.name())),
        Err(_) => {
            log::error!("Command {} panicked", cmd.name());
            report(sinks, &format_args!("{}: internal error", cmd.name()));
        },
    }
    if let Err(e) = sinks.flush() {
        log::warn!("Flushing output of {} failed: {e}", cmd.name());
    }
}

/// Write one error line. A failing error stream has nowhere left to report to.
pub(crate) fn report(sinks: &mut dyn SinkPair, msg: &dyn std::fmt::Display) {
    if let Err(e) = writeln!(sinks.err(), "{msg}") {
        log::warn!("Error stream unavailable ({e}); dropped: {msg}");
    }
}
