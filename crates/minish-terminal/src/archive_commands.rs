//! Archive commands: zip and unzip.

use std::path::Path;

use minish_types::error::{MinishError, Result};
use minish_vfs::path::{is_within, normalize};
use minish_vfs::{ArchiveEntry, ArchiveSource, EntryKind, WriteMode};

use crate::interpreter::{Command, CommandRegistry, Environment};

// ---------------------------------------------------------------------------
// zip
// ---------------------------------------------------------------------------

struct ZipCmd;
impl Command for ZipCmd {
    fn name(&self) -> &str {
        "zip"
    }
    fn usage(&self) -> &str {
        "zip [-r] <archive> <file...>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let (recursive, rest) = match args {
            ["-r", rest @ ..] => (true, rest),
            _ => (false, args),
        };
        let [archive, inputs @ ..] = rest else {
            return Err(MinishError::Usage(self.usage().to_string()));
        };
        if inputs.is_empty() {
            return Err(MinishError::Usage(self.usage().to_string()));
        }

        let mut sources = Vec::with_capacity(inputs.len());
        for input in inputs {
            let path = env.vfs.canonicalize(&env.session.resolve(input))?;
            let Some(name) = path.file_name() else {
                return Err(MinishError::Command(format!(
                    "cannot store '{input}': no file name"
                )));
            };
            sources.push(ArchiveSource {
                name: name.to_string_lossy().into_owned(),
                path,
                recursive,
            });
        }

        let archive_path = env.session.resolve(archive);
        let stored = env.vfs.write_archive(&archive_path, &sources)?;
        let out = env.sinks.out();
        for name in &stored {
            writeln!(out, "  adding: {name}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// unzip
// ---------------------------------------------------------------------------

struct UnzipCmd;
impl Command for UnzipCmd {
    fn name(&self) -> &str {
        "unzip"
    }
    fn usage(&self) -> &str {
        "unzip <archive> [-d <dir>]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let mut archive = None;
        let mut dest = None;
        let mut iter = args.iter();
        while let Some(&arg) = iter.next() {
            match arg {
                "-d" if dest.is_none() => match iter.next() {
                    Some(&dir) => dest = Some(dir),
                    None => return Err(MinishError::Usage(self.usage().to_string())),
                },
                _ if archive.is_none() && arg != "-d" => archive = Some(arg),
                _ => return Err(MinishError::Usage(self.usage().to_string())),
            }
        }
        let Some(archive) = archive else {
            return Err(MinishError::Usage(self.usage().to_string()));
        };

        let entries = env.vfs.read_archive(&env.session.resolve(archive))?;
        let dest = match dest {
            Some(dir) => env.session.resolve(dir),
            None => env.session.cwd.clone(),
        };
        env.vfs.create_dir_all(&dest)?;
        let base = env.vfs.canonicalize(&dest)?;
        log::debug!("Extracting {} entries into {}", entries.len(), base.display());

        // Entries already written stay on disk if a later one is rejected.
        for entry in &entries {
            extract(env, &base, entry)?;
        }
        Ok(())
    }
}

fn escape_error(entry: &ArchiveEntry) -> MinishError {
    MinishError::Command(format!(
        "entry '{}' escapes the destination directory",
        entry.name
    ))
}

/// Whether the deepest existing part of `target` resolves under `base`.
///
/// Symlinks already present in the destination are followed, so a link that
/// leads outside is caught before anything is created through it.
fn resolves_inside(env: &Environment<'_>, base: &Path, target: &Path) -> Result<bool> {
    for ancestor in target.ancestors() {
        if env.vfs.exists(ancestor) {
            return Ok(env.vfs.canonicalize(ancestor)?.starts_with(base));
        }
    }
    Ok(false)
}

fn extract(env: &mut Environment<'_>, base: &Path, entry: &ArchiveEntry) -> Result<()> {
    let target = normalize(&base.join(&entry.name));
    if !is_within(&target, base) || !resolves_inside(env, base, &target)? {
        return Err(escape_error(entry));
    }
    match entry.kind {
        EntryKind::Directory => {
            env.vfs.create_dir_all(&target)?;
            writeln!(env.sinks.out(), "   creating: {}", entry.name)?;
        },
        EntryKind::File => {
            if target == base {
                return Err(escape_error(entry));
            }
            if let Some(parent) = target.parent() {
                env.vfs.create_dir_all(parent)?;
                if !env.vfs.canonicalize(parent)?.starts_with(base) {
                    return Err(escape_error(entry));
                }
            }
            env.vfs.write(&target, &entry.data, WriteMode::Truncate)?;
            writeln!(env.sinks.out(), "  inflating: {}", entry.name)?;
        },
    }
    Ok(())
}

/// Register archive commands.
pub fn register_archive_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(ZipCmd));
    reg.register(Box::new(UnzipCmd));
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use crate::test_utils::{TestShell, listing};

    /// Hand-build an archive whose entry names are not sanitized.
    fn raw_archive(path: &std::path::Path, entries: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn zip_then_unzip_elsewhere() {
        let mut sh = TestShell::new();
        sh.write("a.txt", "alpha\n");
        sh.write("b.txt", "beta\n");
        let o = sh.run("zip out.zip a.txt b.txt");
        assert_eq!(o.out, "  adding: a.txt\n  adding: b.txt\n");
        assert!(sh.path("out.zip").is_file());

        let o = sh.run("unzip out.zip -d extracted");
        assert!(o.err.is_empty(), "{}", o.err);
        assert_eq!(o.out, "  inflating: a.txt\n  inflating: b.txt\n");
        assert_eq!(sh.read("extracted/a.txt"), "alpha\n");
        assert_eq!(sh.read("extracted/b.txt"), "beta\n");
    }

    #[test]
    fn dest_flag_may_come_first() {
        let mut sh = TestShell::new();
        sh.write("a.txt", "x");
        sh.run("zip out.zip a.txt");
        sh.run("unzip -d there out.zip");
        assert_eq!(sh.read("there/a.txt"), "x");
    }

    #[test]
    fn unzip_defaults_to_cwd() {
        let mut sh = TestShell::new();
        sh.write("src/a.txt", "x");
        sh.run("cd src");
        sh.run("zip ../out.zip a.txt");
        sh.run("cd ..");
        sh.run("unzip out.zip");
        assert_eq!(sh.read("a.txt"), "x");
    }

    #[test]
    fn zip_recursive_directory() {
        let mut sh = TestShell::new();
        sh.write("docs/one.txt", "1");
        sh.write("docs/sub/two.txt", "2");
        let o = sh.run("zip -r docs.zip docs");
        assert_eq!(
            o.out,
            "  adding: docs/\n  adding: docs/one.txt\n  adding: docs/sub/\n  adding: docs/sub/two.txt\n"
        );
        let o = sh.run("unzip docs.zip -d copy");
        assert!(o.out.contains("   creating: docs/sub/"));
        assert_eq!(sh.read("copy/docs/sub/two.txt"), "2");
    }

    #[test]
    fn zip_without_r_stores_bare_directory() {
        let mut sh = TestShell::new();
        sh.write("docs/one.txt", "1");
        let o = sh.run("zip docs.zip docs");
        assert_eq!(o.out, "  adding: docs/\n");
    }

    #[test]
    fn zip_missing_input() {
        let mut sh = TestShell::new();
        let o = sh.run("zip out.zip ghost");
        assert!(o.err.starts_with("zip: cannot resolve"));
        assert!(!sh.path("out.zip").exists());
    }

    #[test]
    fn zip_arity() {
        let mut sh = TestShell::new();
        assert!(sh.run("zip").err.starts_with("zip: invalid arguments"));
        assert!(sh.run("zip out.zip").err.starts_with("zip: invalid arguments"));
        assert!(sh.run("zip -r out.zip").err.starts_with("zip: invalid arguments"));
    }

    #[test]
    fn unzip_arity() {
        let mut sh = TestShell::new();
        assert!(sh.run("unzip").err.starts_with("unzip: invalid arguments"));
        assert!(sh.run("unzip a.zip -d").err.starts_with("unzip: invalid arguments"));
        assert!(sh.run("unzip a.zip b.zip").err.starts_with("unzip: invalid arguments"));
        assert!(sh.run("unzip -d x -d y a.zip").err.starts_with("unzip: invalid arguments"));
    }

    #[test]
    fn unzip_rejects_parent_escape() {
        let mut sh = TestShell::new();
        sh.mkdir("dest");
        raw_archive(&sh.path("evil.zip"), &[("../evil.txt", b"pwned")]);
        let o = sh.run("unzip evil.zip -d dest");
        assert_eq!(
            o.err,
            "unzip: entry '../evil.txt' escapes the destination directory\n"
        );
        assert!(!sh.path("evil.txt").exists());
        assert!(listing(&sh.path("dest")).is_empty());
    }

    #[test]
    fn unzip_rejects_absolute_entry() {
        let mut sh = TestShell::new();
        let outside = sh.path("outside.txt");
        let name = outside.display().to_string();
        raw_archive(&sh.path("abs.zip"), &[(name.as_str(), b"x")]);
        let o = sh.run("unzip abs.zip -d dest");
        assert!(o.err.contains("escapes the destination directory"));
        assert!(!outside.exists());
    }

    #[test]
    fn unzip_keeps_entries_before_rejection() {
        let mut sh = TestShell::new();
        raw_archive(
            &sh.path("mixed.zip"),
            &[("ok.txt", b"fine"), ("sub/../../bad.txt", b"no")],
        );
        let o = sh.run("unzip mixed.zip -d dest");
        assert_eq!(o.out, "  inflating: ok.txt\n");
        assert!(o.err.contains("escapes"));
        assert_eq!(sh.read("dest/ok.txt"), "fine");
        assert!(!sh.path("bad.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn unzip_refuses_to_follow_symlink_out_of_dest() {
        let mut sh = TestShell::new();
        sh.mkdir("dest");
        sh.mkdir("outside");
        std::os::unix::fs::symlink(sh.path("outside"), sh.path("dest/link")).unwrap();
        raw_archive(
            &sh.path("sly.zip"),
            &[("link/escaped_dir/", b""), ("link/newdir/f.txt", b"x")],
        );
        let o = sh.run("unzip sly.zip -d dest");
        assert!(o.out.is_empty(), "{}", o.out);
        assert_eq!(
            o.err,
            "unzip: entry 'link/escaped_dir/' escapes the destination directory\n"
        );
        assert!(listing(&sh.path("outside")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unzip_refuses_nested_file_behind_symlink() {
        let mut sh = TestShell::new();
        sh.mkdir("dest");
        sh.mkdir("outside");
        std::os::unix::fs::symlink(sh.path("outside"), sh.path("dest/link")).unwrap();
        raw_archive(&sh.path("sly.zip"), &[("link/newdir/f.txt", b"x")]);
        let o = sh.run("unzip sly.zip -d dest");
        assert!(o.err.contains("escapes the destination directory"), "{}", o.err);
        assert!(listing(&sh.path("outside")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unzip_follows_symlink_that_stays_inside() {
        let mut sh = TestShell::new();
        sh.mkdir("dest/real");
        std::os::unix::fs::symlink(sh.path("dest/real"), sh.path("dest/alias")).unwrap();
        raw_archive(&sh.path("ok.zip"), &[("alias/sub/f.txt", b"kept")]);
        let o = sh.run("unzip ok.zip -d dest");
        assert!(o.err.is_empty(), "{}", o.err);
        assert_eq!(sh.read("dest/real/sub/f.txt"), "kept");
    }

    #[test]
    fn unzip_allows_inner_dotdot() {
        let mut sh = TestShell::new();
        raw_archive(&sh.path("inner.zip"), &[("a/../b.txt", b"ok")]);
        let o = sh.run("unzip inner.zip -d dest");
        assert!(o.err.is_empty(), "{}", o.err);
        assert_eq!(sh.read("dest/b.txt"), "ok");
    }

    #[test]
    fn unzip_garbage_archive() {
        let mut sh = TestShell::new();
        sh.write("junk.zip", "definitely not a zip");
        let o = sh.run("unzip junk.zip");
        assert!(o.err.starts_with("unzip: archive error"));
    }

    #[test]
    fn unzip_missing_archive() {
        let mut sh = TestShell::new();
        let o = sh.run("unzip none.zip");
        assert!(o.err.starts_with("unzip: cannot open"));
        assert!(o.err.contains("No such file or directory"));
    }
}
