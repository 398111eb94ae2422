//! `kiln.toml` project files.
//!
//! Top-level keys are compile options handed to the driver as a
//! [`MapConfig`]. The optional `[build]` table describes the directory
//! scan for the `kiln` binary.
//!
//! ```toml
//! warnings_as_errors = true
//! compiler_source_format = "relative"
//! include_dirs = ["include"]
//!
//! [build]
//! source_dir = "src"
//! source_ext = ".erl"
//! target_dir = "ebin"
//! target_ext = ".beam"
//! priority = ["src/parser.erl"]
//! command = ["erlc", "-o", "{out_dir}", "{src}"]
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{ConfigValue, MapConfig};

/// File name looked up in the working directory when no file is given.
pub const DEFAULT_FILE_NAME: &str = "kiln.toml";

/// Failure to load a project file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: unsupported {kind} value for `{key}`", path.display())]
    UnsupportedValue {
        path: PathBuf,
        key: String,
        kind: &'static str,
    },
}

/// The `[build]` table. Every field is optional so command-line flags can
/// fill in or override whatever the file leaves out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
    pub source_dir: Option<PathBuf>,
    pub source_ext: Option<String>,
    pub target_dir: Option<PathBuf>,
    pub target_ext: Option<String>,
    /// Files compiled before anything discovered under `source_dir`.
    pub priority: Vec<PathBuf>,
    pub recursive: Option<bool>,
    pub check_last_mod: Option<bool>,
    /// Compile command; `{src}`, `{out}` and `{out_dir}` are substituted per file.
    pub command: Vec<String>,
}

#[derive(Deserialize)]
struct RawProjectFile {
    #[serde(default)]
    build: BuildSection,
    #[serde(flatten)]
    options: toml::Table,
}

/// A loaded `kiln.toml`.
#[derive(Clone, Debug)]
pub struct ProjectFile {
    pub path: PathBuf,
    pub options: MapConfig,
    pub build: BuildSection,
}

impl ProjectFile {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Load `dir/kiln.toml` if it exists.
    pub fn find_in(dir: &Path) -> Result<Option<Self>, ConfigFileError> {
        let candidate = dir.join(DEFAULT_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parse `text`; `path` is only used for error messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigFileError> {
        let raw: RawProjectFile = toml::from_str(text).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut options = MapConfig::new();
        for (key, value) in raw.options {
            let value = convert_value(&value).map_err(|kind| ConfigFileError::UnsupportedValue {
                path: path.to_path_buf(),
                key: key.clone(),
                kind,
            })?;
            options.insert(key, value);
        }

        Ok(ProjectFile {
            path: path.to_path_buf(),
            options,
            build: raw.build,
        })
    }

    /// Directory the file lives in; relative paths in it are based here.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Resolve a path written in the file against [`base_dir`](Self::base_dir).
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir().join(path)
    }
}

/// Map a TOML value onto the closed [`ConfigValue`] set.
///
/// Returns the TOML type name of the first value that has no counterpart.
fn convert_value(value: &toml::Value) -> Result<ConfigValue, &'static str> {
    match value {
        toml::Value::Boolean(b) => Ok(ConfigValue::Bool(*b)),
        toml::Value::Integer(i) => Ok(ConfigValue::Int(*i)),
        toml::Value::String(s) => Ok(ConfigValue::Str(s.clone())),
        toml::Value::Array(items) => items
            .iter()
            .map(convert_value)
            .collect::<Result<Vec<_>, _>>()
            .map(ConfigValue::List),
        toml::Value::Float(_) => Err("float"),
        toml::Value::Datetime(_) => Err("datetime"),
        toml::Value::Table(_) => Err("table"),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
