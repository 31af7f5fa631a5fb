//! Zip archive encoding and decoding.

use std::fs::{self, File};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use minish_types::error::{MinishError, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::EntryKind;
use crate::host::fs_error;

/// Something to store in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSource {
    /// Absolute host path of the file or directory.
    pub path: PathBuf,
    /// Entry name inside the archive (relative, `/`-separated).
    pub name: String,
    /// Walk directories instead of storing only the directory entry.
    pub recursive: bool,
}

/// One decoded archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name exactly as stored (untrusted; may contain `..`).
    pub name: String,
    pub kind: EntryKind,
    /// File contents; empty for directories.
    pub data: Vec<u8>,
}

/// Write `sources` into a new archive, returning the stored entry names in order.
pub(crate) fn write<W: Write + Seek>(sink: W, sources: &[ArchiveSource]) -> Result<Vec<String>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(sink);
    let mut stored = Vec::new();
    for source in sources {
        add_source(&mut zip, options, &source.path, &source.name, source.recursive, &mut stored)?;
    }
    zip.finish()?;
    Ok(stored)
}

fn add_source<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
    path: &Path,
    name: &str,
    recursive: bool,
    stored: &mut Vec<String>,
) -> Result<()> {
    let meta = fs::metadata(path).map_err(|e| fs_error("cannot stat", path, &e))?;
    if meta.is_dir() {
        let dir_name = format!("{}/", name.trim_end_matches('/'));
        zip.add_directory(dir_name.as_str(), options)?;
        stored.push(dir_name.clone());
        if recursive {
            let mut children: Vec<_> = fs::read_dir(path)
                .map_err(|e| fs_error("cannot access", path, &e))?
                .collect::<std::io::Result<_>>()
                .map_err(|e| fs_error("cannot read", path, &e))?;
            children.sort_by_key(|c| c.file_name());
            for child in children {
                let child_name = format!("{dir_name}{}", child.file_name().to_string_lossy());
                add_source(zip, options, &child.path(), &child_name, true, stored)?;
            }
        }
    } else {
        let mut file = File::open(path).map_err(|e| fs_error("cannot open", path, &e))?;
        zip.start_file(name, options)?;
        std::io::copy(&mut file, zip).map_err(|e| fs_error("cannot read", path, &e))?;
        stored.push(name.to_string());
    }
    Ok(())
}

/// Decode every entry of an archive.
pub(crate) fn read<R: Read + Seek>(source: R) -> Result<Vec<ArchiveEntry>> {
    let mut zip = ZipArchive::new(source)?;
    let mut entries = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut member = zip.by_index(i)?;
        let name = member.name().to_string();
        if member.is_dir() {
            entries.push(ArchiveEntry {
                name,
                kind: EntryKind::Directory,
                data: Vec::new(),
            });
            continue;
        }
        let mut data = Vec::new();
        member
            .read_to_end(&mut data)
            .map_err(|e| MinishError::Vfs(format!("cannot inflate '{name}': {e}")))?;
        entries.push(ArchiveEntry {
            name,
            kind: EntryKind::File,
            data,
        });
    }
    Ok(entries)
}
