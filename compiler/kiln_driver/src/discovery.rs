//! Source file discovery.
//!
//! Finds files under a directory whose names match a pattern built from
//! a plain extension. Files whose names begin with `._` (filesystem
//! metadata files, e.g. macOS AppleDouble) are never returned.

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::JobError;

/// Pattern matching file names that end with `ext` and do not start with `._`.
pub fn source_pattern(ext: &str) -> Result<Regex, regex::Error> {
    // No lookahead in `regex`, so the allowed stems are spelled out. A bare
    // `.` stem, or none at all, only qualifies while the name still does
    // not begin with `._`.
    let mut stems = vec![r"[^.].*", r"\.[^_].*"];
    if !ext.starts_with('_') {
        stems.push(r"\.");
    }
    if !ext.starts_with("._") {
        stems.push("");
    }
    Regex::new(&format!("^(?:{}){}$", stems.join("|"), regex::escape(ext)))
}

/// Find files under `root` whose file names match `pattern`.
///
/// Entries are visited in file-name order within each directory. With
/// `recursive` off only the immediate children of `root` are considered.
/// A missing `root` yields no files.
pub fn find_sources(root: &Path, pattern: &Regex, recursive: bool) -> Result<Vec<PathBuf>, JobError> {
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "source directory does not exist");
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| JobError::Discovery {
            root: root.to_path_buf(),
            source,
        })?;

        if !entry.path().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
            continue;
        };
        if pattern.is_match(name) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}
