//! [`Vfs`] implementation backed by the host filesystem.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use minish_types::error::{MinishError, Result};

use crate::archive::{self, ArchiveEntry, ArchiveSource};
use crate::{EntryKind, Vfs, VfsEntry, VfsMetadata, WriteMode};

/// The host filesystem. Stateless; every call goes straight to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostVfs;

impl HostVfs {
    pub fn new() -> Self {
        Self
    }
}

/// Short, shell-style description of an I/O error.
fn describe(err: &io::Error) -> String {
    match err.kind() {
        ErrorKind::NotFound => "No such file or directory".to_string(),
        ErrorKind::PermissionDenied => "Permission denied".to_string(),
        ErrorKind::AlreadyExists => "File exists".to_string(),
        ErrorKind::DirectoryNotEmpty => "Directory not empty".to_string(),
        ErrorKind::NotADirectory => "Not a directory".to_string(),
        ErrorKind::IsADirectory => "Is a directory".to_string(),
        _ => err.to_string(),
    }
}

/// Build a `MinishError::Vfs` of the form `<verb> '<path>': <reason>`.
pub(crate) fn fs_error(verb: &str, path: &Path, err: &io::Error) -> MinishError {
    MinishError::Vfs(format!("{verb} '{}': {}", path.display(), describe(err)))
}

fn kind_of(meta: &fs::Metadata) -> EntryKind {
    if meta.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

impl Vfs for HostVfs {
    fn readdir(&self, path: &Path) -> Result<Vec<VfsEntry>> {
        let iter = fs::read_dir(path).map_err(|e| fs_error("cannot access", path, &e))?;
        let mut entries = Vec::new();
        for entry in iter {
            let entry = entry.map_err(|e| fs_error("cannot read", path, &e))?;
            // Follow symlinks so a link to a directory lists as a directory.
            let kind = match fs::metadata(entry.path()) {
                Ok(meta) => kind_of(&meta),
                Err(_) => EntryKind::File,
            };
            entries.push(VfsEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> Result<VfsMetadata> {
        let meta = fs::metadata(path).map_err(|e| fs_error("cannot stat", path, &e))?;
        Ok(VfsMetadata {
            kind: kind_of(&meta),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        if path.is_dir() {
            return Err(MinishError::Vfs(format!(
                "cannot read '{}': Is a directory",
                path.display()
            )));
        }
        fs::read(path).map_err(|e| fs_error("cannot read", path, &e))
    }

    fn write(&self, path: &Path, data: &[u8], mode: WriteMode) -> Result<()> {
        let mut opts = OpenOptions::new();
        opts.create(true);
        match mode {
            WriteMode::Truncate => opts.write(true).truncate(true),
            WriteMode::Append => opts.append(true),
        };
        let mut file = opts
            .open(path)
            .map_err(|e| fs_error("cannot open", path, &e))?;
        file.write_all(data)
            .and_then(|()| file.flush())
            .map_err(|e| fs_error("cannot write", path, &e))
    }

    fn touch(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| fs_error("cannot touch", path, &e))?;
        file.set_modified(SystemTime::now())
            .map_err(|e| fs_error("cannot touch", path, &e))
    }

    fn mkdir(&self, path: &Path) -> Result<()> {
        fs::create_dir(path).map_err(|e| fs_error("cannot create directory", path, &e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| fs_error("cannot create directory", path, &e))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => Err(MinishError::Vfs(format!(
                "cannot remove '{}': Is a directory",
                path.display()
            ))),
            Ok(_) => fs::remove_file(path).map_err(|e| fs_error("cannot remove", path, &e)),
            Err(e) => Err(fs_error("cannot remove", path, &e)),
        }
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path).map_err(|e| fs_error("failed to remove", path, &e))
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64> {
        if src.is_dir() {
            return Err(MinishError::Vfs(format!(
                "cannot copy '{}': Is a directory",
                src.display()
            )));
        }
        fs::copy(src, dst).map_err(|e| {
            if src.exists() {
                fs_error("cannot create", dst, &e)
            } else {
                fs_error("cannot stat", src, &e)
            }
        })
    }

    fn copy_dir_all(&self, src: &Path, dst: &Path) -> Result<()> {
        let meta = self.stat(src)?;
        if meta.kind != EntryKind::Directory {
            return Err(MinishError::Vfs(format!(
                "cannot copy '{}': Not a directory",
                src.display()
            )));
        }
        let src_canon = self.canonicalize(src)?;
        let dst_parent = dst.parent().unwrap_or(dst);
        if let Ok(parent_canon) = fs::canonicalize(dst_parent) {
            let dst_canon = match dst.file_name() {
                Some(name) => parent_canon.join(name),
                None => parent_canon,
            };
            if dst_canon.starts_with(&src_canon) {
                return Err(MinishError::Vfs(format!(
                    "cannot copy a directory, '{}', into itself, '{}'",
                    src.display(),
                    dst.display()
                )));
            }
        }
        copy_tree(src, dst)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).map_err(|e| fs_error("cannot resolve", path, &e))
    }

    fn write_archive(&self, archive: &Path, sources: &[ArchiveSource]) -> Result<Vec<String>> {
        // Encode in memory first so a recursive walk never sees a half-written archive.
        let mut buf = Cursor::new(Vec::new());
        let stored = archive::write(&mut buf, sources)?;
        fs::write(archive, buf.into_inner()).map_err(|e| fs_error("cannot create", archive, &e))?;
        log::debug!("Wrote {} entries to {}", stored.len(), archive.display());
        Ok(stored)
    }

    fn read_archive(&self, archive: &Path) -> Result<Vec<ArchiveEntry>> {
        let file = File::open(archive).map_err(|e| fs_error("cannot open", archive, &e))?;
        archive::read(file)
    }
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    if !dst.is_dir() {
        fs::create_dir_all(dst).map_err(|e| fs_error("cannot create directory", dst, &e))?;
    }
    let iter = fs::read_dir(src).map_err(|e| fs_error("cannot access", src, &e))?;
    for entry in iter {
        let entry = entry.map_err(|e| fs_error("cannot read", src, &e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| fs_error("cannot create", &to, &e))?;
        }
    }
    log::debug!("Copied tree {} -> {}", src.display(), dst.display());
    Ok(())
}
