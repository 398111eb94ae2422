//! Target path derivation.
//!
//! Pure path algebra; nothing here touches the filesystem.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Drop the leading components `path` shares with `base`.
///
/// Matching stops at the first differing component or when either path
/// runs out. With no shared components the whole of `path` is returned.
pub fn strip_common_prefix(path: &Path, base: &Path) -> PathBuf {
    let mut remaining = path.components().peekable();
    let mut base_parts = base.components();

    while let (Some(part), Some(base_part)) = (remaining.peek().copied(), base_parts.next()) {
        if part != base_part {
            break;
        }
        remaining.next();
    }

    remaining.collect()
}

/// Where the artifact for `source` goes.
///
/// The source's file name, minus `source_ext`, plus `target_ext`, directly
/// under `target_dir`. Subdirectories below `source_dir` are not mirrored:
///
/// ```text
/// /proj/src/a/b.erl  (source_dir /proj/src, .erl → .beam, target_dir /proj/ebin)
///   ──► /proj/ebin/b.beam
/// ```
///
/// A file name that does not end in `source_ext` keeps its full name.
pub fn derive_target_path(
    source: &Path,
    source_dir: &Path,
    source_ext: &str,
    target_dir: &Path,
    target_ext: &str,
) -> PathBuf {
    let base = strip_common_prefix(source, source_dir);
    let Some(name) = base.file_name() else {
        return target_dir.to_path_buf();
    };

    let mut target_name = match name.to_str().and_then(|name| name.strip_suffix(source_ext)) {
        Some(stem) => OsString::from(stem),
        None => name.to_os_string(),
    };
    target_name.push(target_ext);
    target_dir.join(target_name)
}
