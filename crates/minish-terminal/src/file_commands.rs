//! File content commands: cp (with -r), cat, wc.

use std::path::{Path, PathBuf};

use minish_types::error::{MinishError, Result};
use minish_vfs::EntryKind;

use crate::interpreter::{Command, CommandRegistry, Environment};

// ---------------------------------------------------------------------------
// cp
// ---------------------------------------------------------------------------

struct CpCmd;
impl Command for CpCmd {
    fn name(&self) -> &str {
        "cp"
    }
    fn usage(&self) -> &str {
        "cp [-r] <src> <dst>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let (recursive, rest) = match args {
            ["-r", rest @ ..] => (true, rest),
            _ => (false, args),
        };
        let [src, dst] = rest else {
            return Err(MinishError::Usage(self.usage().to_string()));
        };

        let src_path = env.session.resolve(src);
        let meta = env.vfs.stat(&src_path)?;
        if meta.kind == EntryKind::Directory && !recursive {
            return Err(MinishError::Command(format!(
                "-r not specified; omitting directory '{src}'"
            )));
        }

        let dst_path = placement(env, &src_path, env.session.resolve(dst))?;
        if meta.kind == EntryKind::Directory {
            env.vfs.copy_dir_all(&src_path, &dst_path)
        } else {
            if env.vfs.exists(&dst_path)
                && env.vfs.canonicalize(&dst_path)? == env.vfs.canonicalize(&src_path)?
            {
                return Err(MinishError::Command(format!(
                    "'{src}' and '{dst}' are the same file"
                )));
            }
            env.vfs.copy_file(&src_path, &dst_path).map(|_| ())
        }
    }
}

/// Copying onto an existing directory lands inside it under the source's name.
fn placement(env: &Environment<'_>, src: &Path, dst: PathBuf) -> Result<PathBuf> {
    let dst_is_dir = env
        .vfs
        .stat(&dst)
        .is_ok_and(|m| m.kind == EntryKind::Directory);
    if !dst_is_dir {
        return Ok(dst);
    }
    let canonical = env.vfs.canonicalize(src)?;
    match canonical.file_name() {
        Some(name) => Ok(dst.join(name)),
        None => Err(MinishError::Command(format!(
            "cannot copy '{}' into a directory",
            src.display()
        ))),
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn usage(&self) -> &str {
        "cat <file...>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        if args.is_empty() {
            return Err(MinishError::Usage(self.usage().to_string()));
        }
        for arg in args {
            let path = env.session.resolve(arg);
            match env.vfs.read(&path) {
                Ok(data) => {
                    let text = String::from_utf8_lossy(&data);
                    let out = env.sinks.out();
                    for line in text.lines() {
                        writeln!(out, "{line}")?;
                    }
                },
                Err(e) => writeln!(env.sinks.err(), "{}: {e}", self.name())?,
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// wc
// ---------------------------------------------------------------------------

/// Line, word, and character totals as `wc` reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub lines: usize,
    pub words: usize,
    /// Word characters plus one space between adjacent words on a line.
    /// Line terminators and extra whitespace are not counted.
    pub chars: usize,
}

impl Counts {
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        for line in text.lines() {
            counts.lines += 1;
            let mut words_here = 0usize;
            for word in line.split_whitespace() {
                words_here += 1;
                counts.chars += word.chars().count();
            }
            counts.words += words_here;
            counts.chars += words_here.saturating_sub(1);
        }
        counts
    }
}

struct WcCmd;
impl Command for WcCmd {
    fn name(&self) -> &str {
        "wc"
    }
    fn usage(&self) -> &str {
        "wc <file>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let [file] = args else {
            return Err(MinishError::Usage(self.usage().to_string()));
        };
        let data = env.vfs.read(&env.session.resolve(file))?;
        let Counts {
            lines,
            words,
            chars,
        } = Counts::of(&String::from_utf8_lossy(&data));
        writeln!(env.sinks.out(), "{lines} {words} {chars} {file}")?;
        Ok(())
    }
}

/// Register file content commands.
pub fn register_file_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(CpCmd));
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(WcCmd));
}
