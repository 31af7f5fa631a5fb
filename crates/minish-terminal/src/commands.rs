//! Navigation and directory built-ins: pwd, cd, ls, mkdir, rmdir, touch, rm, exit.

use minish_types::error::{MinishError, Result};
use minish_vfs::EntryKind;

use crate::interpreter::{Command, CommandRegistry, Environment};

/// Register every built-in command. The set is fixed.
pub(crate) fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(MkdirCmd));
    reg.register(Box::new(RmdirCmd));
    reg.register(Box::new(TouchCmd));
    reg.register(Box::new(RmCmd));
    reg.register(Box::new(ExitCmd));
    crate::file_commands::register_file_commands(reg);
    crate::archive_commands::register_archive_commands(reg);
}

fn usage(cmd: &dyn Command) -> MinishError {
    MinishError::Usage(cmd.usage().to_string())
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        if !args.is_empty() {
            return Err(usage(self));
        }
        writeln!(env.sinks.out(), "{}", env.session.cwd.display())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn usage(&self) -> &str {
        "cd [path | ..]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let (target, shown) = match args {
            [] => (env.session.home.clone(), "~"),
            [".."] => match env.session.cwd.parent() {
                Some(parent) => (parent.to_path_buf(), ".."),
                None => {
                    return Err(MinishError::Command(
                        "Already at root directory.".to_string(),
                    ));
                },
            },
            [path] => (env.session.resolve(path), *path),
            _ => return Err(usage(self)),
        };
        match env.vfs.stat(&target) {
            Ok(meta) if meta.kind == EntryKind::Directory => {},
            Ok(_) => {
                return Err(MinishError::Command(format!("Not a directory: {shown}")));
            },
            Err(_) => {
                return Err(MinishError::Command(format!("No such directory: {shown}")));
            },
        }
        let canonical = env.vfs.canonicalize(&target)?;
        log::info!("cd {} -> {}", env.session.cwd.display(), canonical.display());
        env.session.cwd = canonical;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn usage(&self) -> &str {
        "ls [path]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let path = match args {
            [] => env.session.cwd.clone(),
            [path] => env.session.resolve(path),
            _ => return Err(usage(self)),
        };
        let meta = env.vfs.stat(&path)?;
        let out = env.sinks.out();
        if meta.kind == EntryKind::File {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            writeln!(out, "{name}")?;
            return Ok(());
        }
        for entry in env.vfs.readdir(&path)? {
            writeln!(out, "{}", entry.name)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn usage(&self) -> &str {
        "mkdir <dir...>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        if args.is_empty() {
            return Err(usage(self));
        }
        for arg in args {
            let path = env.session.resolve(arg);
            if let Err(e) = env.vfs.mkdir(&path) {
                writeln!(env.sinks.err(), "{}: {e}", self.name())?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// rmdir
// ---------------------------------------------------------------------------

struct RmdirCmd;
impl Command for RmdirCmd {
    fn name(&self) -> &str {
        "rmdir"
    }
    fn usage(&self) -> &str {
        "rmdir <dir | *>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        match args {
            ["*"] => remove_empty_subdirs(env),
            [path] => {
                let target = env.session.resolve(path);
                let meta = env.vfs.stat(&target)?;
                if meta.kind != EntryKind::Directory {
                    return Err(MinishError::Command(format!(
                        "failed to remove '{path}': Not a directory"
                    )));
                }
                env.vfs.remove_dir(&target)
            },
            _ => Err(usage(self)),
        }
    }
}

fn remove_empty_subdirs(env: &mut Environment<'_>) -> Result<()> {
    let cwd = env.session.cwd.clone();
    let mut removed = 0usize;
    for entry in env.vfs.readdir(&cwd)? {
        if entry.kind != EntryKind::Directory {
            continue;
        }
        let dir = cwd.join(&entry.name);
        let is_empty = env.vfs.readdir(&dir).map(|c| c.is_empty()).unwrap_or(false);
        if !is_empty {
            continue;
        }
        match env.vfs.remove_dir(&dir) {
            Ok(()) => removed += 1,
            Err(e) => writeln!(env.sinks.err(), "rmdir: {e}")?,
        }
    }
    if removed == 0 {
        writeln!(env.sinks.out(), "No empty directories found.")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// touch
// ---------------------------------------------------------------------------

struct TouchCmd;
impl Command for TouchCmd {
    fn name(&self) -> &str {
        "touch"
    }
    fn usage(&self) -> &str {
        "touch <file>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let [path] = args else {
            return Err(usage(self));
        };
        env.vfs.touch(&env.session.resolve(path))
    }
}

// ---------------------------------------------------------------------------
// rm
// ---------------------------------------------------------------------------

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn usage(&self) -> &str {
        "rm <file>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let [path] = args else {
            return Err(usage(self));
        };
        env.vfs.remove_file(&env.session.resolve(path))
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        env.session.request_exit();
        writeln!(env.sinks.out(), "Exiting CLI...")?;
        Ok(())
    }
}
