//! Diagnostic formatting for the kiln build driver.
//!
//! A compile operation reports warnings and errors as structured
//! [`DiagnosticEntry`] values grouped by the source they belong to. This
//! crate turns them into one line of text per entry:
//!
//! ```text
//! src/a.erl:12:5: Warning: variable 'X' is unused
//! src/a.erl:30: function foo/1 undefined
//! src/a.erl: no module definition
//! ```
//!
//! The description text is never interpreted here. Each entry names the
//! module that produced it, and a [`FormatDescription`] lookup turns the
//! opaque payload into text.
//!
//! How the path is printed is controlled by [`PathDisplayMode`].

mod describe;
mod display;
mod entry;
mod format;

pub use describe::{DescriptionFormatter, FormatDescription, FormatterRegistry, TextFormatter};
pub use display::{format_display_path, relative_to, InvalidDisplayMode, PathDisplayMode};
pub use entry::{Description, DescriptionValue, DiagnosticEntry, DiagnosticGroup, Location, ModuleId};
pub use format::{
    build_failure_result, build_success_result, format_diagnostic_groups, DiagnosticFormatter,
    FormattedResult, LinePrefix,
};
