//! The `kiln` build tool.
//!
//! Compiles a directory of sources one file at a time by running an
//! external compiler, skipping files whose targets are up to date and
//! stopping at the first failure.
//!
//! ```text
//! kiln build --src src --ext .erl --out ebin --out-ext .beam -- erlc -o {out_dir} {src}
//!     │
//!     ▼
//! options::parse_build_args() + kiln.toml ──► BuildPlan
//!     │
//!     ▼
//! kiln_driver::Driver::run_dir() ──► ExternalCommand::compile() per stale file
//! ```

mod build;
mod external;
mod logging;
mod options;

pub use build::{build, load_project, BuildError};
pub use external::{ExternalCommand, OutputParser, ParsedOutput, EXTERNAL_MODULE};
pub use logging::{init_tracing, LOG_ENV};
pub use options::{parse_build_args, BuildArgs, BuildPlan, UsageError};
