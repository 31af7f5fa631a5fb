//! Shared fixture for command tests: a real registry over a temp directory.

use std::fs;
use std::path::{Path, PathBuf};

use minish_vfs::HostVfs;

use crate::interpreter::CommandRegistry;
use crate::session::Session;
use crate::sink::Terminal;
use crate::tokenizer::parse_line;

/// Output of one command line.
#[derive(Debug, Default)]
pub struct Output {
    pub out: String,
    pub err: String,
}

pub struct TestShell {
    pub reg: CommandRegistry,
    pub session: Session,
    pub vfs: HostVfs,
    dir: tempfile::TempDir,
}

impl TestShell {
    /// A shell whose cwd (and home) is a fresh, canonicalized temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let cwd = fs::canonicalize(dir.path()).unwrap();
        Self {
            reg: CommandRegistry::new(),
            session: Session::new(cwd.clone(), cwd),
            vfs: HostVfs::new(),
            dir,
        }
    }

    /// Canonical path of the temp directory the shell started in.
    pub fn root(&self) -> PathBuf {
        fs::canonicalize(self.dir.path()).unwrap()
    }

    /// Parse and dispatch one line, returning what reached the terminal.
    pub fn run(&mut self, line: &str) -> Output {
        let mut term = Terminal::new(Vec::new(), Vec::new());
        match parse_line(line) {
            Ok(Some(cl)) => self
                .reg
                .dispatch(&cl, &mut self.session, &self.vfs, &mut term),
            Ok(None) => {},
            Err(e) => panic!("parse error in test line {line:?}: {e}"),
        }
        Output {
            out: String::from_utf8(term.out).unwrap(),
            err: String::from_utf8(term.err).unwrap(),
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.path(rel)).unwrap();
    }
}

/// Sorted names directly inside `dir`.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
