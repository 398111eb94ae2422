//! Rendering source paths in diagnostic lines.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use kiln_config::{keys, ConfigLookup, ConfigValue};

/// How a source path is printed in a diagnostic line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PathDisplayMode {
    /// Canonical path with symlinked ancestor directories resolved.
    Absolute,
    /// Canonical path, relative to the working directory.
    #[default]
    Relative,
    /// The path exactly as the build handed it over.
    Build,
}

impl PathDisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PathDisplayMode::Absolute => "absolute",
            PathDisplayMode::Relative => "relative",
            PathDisplayMode::Build => "build",
        }
    }

    /// Read `compiler_source_format` from `config`.
    ///
    /// An absent key yields the default. A present but unrecognized value is
    /// an error; callers report it and fall back to the default.
    pub fn from_config(config: &dyn ConfigLookup) -> Result<Self, InvalidDisplayMode> {
        match config.get(keys::COMPILER_SOURCE_FORMAT) {
            None => Ok(PathDisplayMode::default()),
            Some(ConfigValue::Str(value)) => value.parse(),
            Some(other) => Err(InvalidDisplayMode(other.to_string())),
        }
    }
}

impl fmt::Display for PathDisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathDisplayMode {
    type Err = InvalidDisplayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(PathDisplayMode::Absolute),
            "relative" => Ok(PathDisplayMode::Relative),
            "build" => Ok(PathDisplayMode::Build),
            other => Err(InvalidDisplayMode(other.to_string())),
        }
    }
}

/// An unrecognized `compiler_source_format` value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid compiler_source_format value {0}, expected one of absolute, relative, build")]
pub struct InvalidDisplayMode(pub String);

/// Render `path` for a diagnostic line.
///
/// `cwd` anchors relative input paths and is the base for
/// [`PathDisplayMode::Relative`].
pub fn format_display_path(path: &Path, mode: PathDisplayMode, cwd: &Path) -> PathBuf {
    match mode {
        PathDisplayMode::Build => path.to_path_buf(),
        PathDisplayMode::Absolute => resolve_dir_links(path, cwd),
        PathDisplayMode::Relative => {
            let absolute = resolve_dir_links(path, cwd);
            let base = std::fs::canonicalize(cwd).unwrap_or_else(|_| cwd.to_path_buf());
            relative_to(&absolute, &base)
        }
    }
}

/// Canonicalize the directory containing `path` and rejoin the file name.
///
/// The file name itself is kept verbatim even when it is a symlink. If the
/// directory cannot be resolved (it does not exist, say) the path is made
/// absolute against `cwd` without touching the filesystem.
fn resolve_dir_links(path: &Path, cwd: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    match (absolute.parent(), absolute.file_name()) {
        (Some(dir), Some(name)) => {
            if let Ok(dir) = std::fs::canonicalize(dir) {
                return dir.join(name);
            }
        }
        _ => {
            if let Ok(resolved) = std::fs::canonicalize(&absolute) {
                return resolved;
            }
        }
    }
    absolute
}

/// Express `path` relative to `base`.
///
/// Purely lexical: both paths should already be absolute and normalized.
/// Returns `.` when they are equal.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let shared = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..base_parts.len() {
        relative.push(Component::ParentDir);
    }
    for part in &path_parts[shared..] {
        relative.push(part);
    }

    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}
