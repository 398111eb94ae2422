//! Ordered, duplicate-free list of files for one job.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

/// Files to process: the priority files first, in their given order, then
/// the remaining files in their given order with priority files removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSet {
    priority: Vec<PathBuf>,
    rest: Vec<PathBuf>,
}

impl FileSet {
    /// Build a set from `priority` and everything else found.
    ///
    /// Paths are compared exactly as given; no normalization happens here.
    pub fn new(priority: Vec<PathBuf>, found: Vec<PathBuf>) -> Self {
        let seen: FxHashSet<&Path> = priority.iter().map(PathBuf::as_path).collect();
        let rest = found
            .into_iter()
            .filter(|file| !seen.contains(file.as_path()))
            .collect();
        FileSet { priority, rest }
    }

    /// A set with no priority files.
    pub fn from_files(files: Vec<PathBuf>) -> Self {
        FileSet {
            priority: Vec::new(),
            rest: files,
        }
    }

    pub fn priority(&self) -> &[PathBuf] {
        &self.priority
    }

    pub fn rest(&self) -> &[PathBuf] {
        &self.rest
    }

    pub fn len(&self) -> usize {
        self.priority.len() + self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.rest.is_empty()
    }

    /// All files in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.priority
            .iter()
            .chain(self.rest.iter())
            .map(PathBuf::as_path)
    }

    pub fn into_ordered(self) -> Vec<PathBuf> {
        let mut ordered = self.priority;
        ordered.extend(self.rest);
        ordered
    }
}
