//! Modification-time staleness check.

use std::path::Path;
use std::time::SystemTime;

/// Last modification time of `path`, or `None` if it cannot be read.
pub fn last_modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Whether `source` must be (re)compiled into `target`.
///
/// With `check_last_mod` off this is always `true`. Otherwise compilation
/// is needed only when the target is strictly older than the source. A
/// missing file counts as older than any timestamp, so a missing target
/// forces a compile while a missing source never does.
pub fn should_compile(source: &Path, target: &Path, check_last_mod: bool) -> bool {
    if !check_last_mod {
        return true;
    }
    last_modified(target) < last_modified(source)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
