//! Incremental compile-job driver.
//!
//! Given source files, a caller-supplied per-file compile operation and a
//! configuration, the driver decides which files need compiling, invokes
//! the operation in a fixed order, reports diagnostics, and stops the job
//! at the first failure.
//!
//! # Architecture
//!
//! ```text
//! Driver::run_dir(priority, DirScan)
//!     │
//!     ▼
//! discovery::find_sources() ──► FileSet (priority ++ rest, no duplicates)
//!     │
//!     ▼  per file, strictly sequential
//! paths::derive_target_path() ──► staleness::should_compile()
//!     │                                   │
//!     ▼                                   ▼ (stale)
//! CompileOutcome::Skipped          compile(source, target, config)
//!                                         │
//!                                         ▼
//!                              CompileOutcome ──► Reporter
//!                                         │
//!                        Failure/Unrecognized ──► JobError::CompileFailed
//! ```
//!
//! The driver knows nothing about any source language. Diagnostics are
//! structured data from `kiln_diagnostic`; configuration is an opaque
//! lookup from `kiln_config`.

mod discovery;
mod driver;
mod error;
mod fileset;
mod outcome;
mod paths;
mod report;
mod staleness;

pub use discovery::{find_sources, source_pattern};
pub use driver::{DirScan, Driver, JobSummary};
pub use error::JobError;
pub use fileset::FileSet;
pub use outcome::{CompileOutcome, UnrecognizedOutcome};
pub use paths::{derive_target_path, strip_common_prefix};
pub use report::{BufferReporter, ReportEvent, Reporter, TracingReporter};
pub use staleness::{last_modified, should_compile};

pub use kiln_diagnostic::{format_display_path, PathDisplayMode};
