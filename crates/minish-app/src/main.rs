//! minish entry point.
//!
//! Reads commands from standard input, one per line, and runs them in a
//! logical working directory that starts at the process's own cwd. Set
//! `MINISH_CONFIG` to a TOML file to override the prompt, banner, log filter
//! or home directory; `RUST_LOG` takes precedence over the configured filter.

use std::io;

use anyhow::{Context, Result};

use minish_terminal::{Repl, Session, Terminal};
use minish_types::config::ShellConfig;
use minish_vfs::HostVfs;

fn main() -> Result<()> {
    let config = ShellConfig::from_env().context("loading configuration")?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();
    minish_terminal::log_panics();

    let cwd = std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .context("resolving the starting directory")?;
    let home = config.resolve_home(&cwd);
    log::info!("Starting minish in {} (home {})", cwd.display(), home.display());

    let mut repl = Repl::new(Session::new(cwd, home), HostVfs::new(), &config);
    let mut terminal = Terminal::stdio();
    repl.run(io::stdin().lock(), &mut terminal)?;

    log::info!("minish exiting");
    Ok(())
}
