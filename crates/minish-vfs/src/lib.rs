//! Filesystem abstraction for minish.
//!
//! Built-in commands never touch `std::fs` directly; they go through the
//! [`Vfs`] trait so that error wording and path handling stay uniform. The
//! only implementation is [`HostVfs`], which maps every call onto the host
//! filesystem. All paths handed to a `Vfs` are absolute.

mod archive;
mod host;
pub mod path;

use std::path::{Path, PathBuf};

use minish_types::error::Result;

pub use archive::{ArchiveEntry, ArchiveSource};
pub use host::HostVfs;

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single entry returned by [`Vfs::readdir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsEntry {
    /// File name (last path component only).
    pub name: String,
    pub kind: EntryKind,
}

/// Metadata returned by [`Vfs::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfsMetadata {
    pub kind: EntryKind,
}

/// How [`Vfs::write`] treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the previous contents.
    Truncate,
    /// Add to the end of the previous contents.
    Append,
}

/// Filesystem operations used by the interpreter and its built-ins.
pub trait Vfs {
    /// List the direct children of a directory, sorted by name (byte order).
    fn readdir(&self, path: &Path) -> Result<Vec<VfsEntry>>;

    /// Query the kind and size of a path. Symlinks are followed.
    fn stat(&self, path: &Path) -> Result<VfsMetadata>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read an entire file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write `data` to a file, creating it when absent.
    fn write(&self, path: &Path, data: &[u8], mode: WriteMode) -> Result<()>;

    /// Create an empty file, or refresh the modification time of an existing one.
    fn touch(&self, path: &Path) -> Result<()>;

    /// Create a single directory. Fails if the parent is missing or the path exists.
    fn mkdir(&self, path: &Path) -> Result<()>;

    /// Create a directory and any missing parents. Existing directories are fine.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file (not a directory).
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> Result<()>;

    /// Copy one file, returning the number of bytes copied.
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64>;

    /// Copy a directory tree. `dst` is created if needed.
    fn copy_dir_all(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Resolve symlinks, `.` and `..` against the host filesystem.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Write a zip archive containing `sources`, replacing any existing file.
    fn write_archive(&self, archive: &Path, sources: &[ArchiveSource]) -> Result<Vec<String>>;

    /// Read every entry of a zip archive into memory, in archive order.
    fn read_archive(&self, archive: &Path) -> Result<Vec<ArchiveEntry>>;
}
