//! Compile configuration for the kiln build driver.
//!
//! A job's configuration is an opaque, read-only key/value association.
//! Two representations are supported behind one lookup interface:
//!
//! ```text
//! AssocList  [Flag("warnings_as_errors"), Pair("compiler_source_format", "absolute")]
//! MapConfig  { "warnings_as_errors": true, "compiler_source_format": "absolute" }
//!      │
//!      ▼
//! &dyn ConfigLookup ──► get(key) / get_bool(key, default) / get_str(key)
//! ```
//!
//! Consumers never branch on the representation; they only see
//! `&dyn ConfigLookup`.

pub mod file;
mod lookup;
mod value;

pub use file::{BuildSection, ConfigFileError, ProjectFile};
pub use lookup::{AssocList, ConfigEntry, ConfigLookup, MapConfig};
pub use value::ConfigValue;

/// Well-known configuration keys read by the driver and formatter.
pub mod keys {
    /// Boolean. When set, warnings are rendered without the `Warning: ` prefix.
    pub const WARNINGS_AS_ERRORS: &str = "warnings_as_errors";

    /// String. One of `absolute`, `relative`, `build`.
    pub const COMPILER_SOURCE_FORMAT: &str = "compiler_source_format";
}
