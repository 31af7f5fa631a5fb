//! Lexical path helpers.
//!
//! These never touch the filesystem, so they work for paths that do not exist
//! yet (redirection targets, archive entries about to be extracted).

use std::path::{Component, Path, PathBuf};

/// Resolve `input` against `base`: absolute inputs are returned as-is,
/// relative ones are joined onto `base`. No normalization is applied.
pub fn resolve(base: &Path, input: &str) -> PathBuf {
    let candidate = Path::new(input);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

/// Remove `.` components and fold `..` into the preceding component.
///
/// `..` at the root stays at the root. A relative path that climbs above its
/// start keeps the leading `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {},
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Whether `path`, once normalized, is `base` or lies underneath it.
pub fn is_within(path: &Path, base: &Path) -> bool {
    normalize(path).starts_with(normalize(base))
}
