//! Job reporting sinks.
//!
//! The driver never prints directly. Each job is handed a [`Reporter`]
//! that receives progress events and formatted diagnostic lines in order:
//! - [`TracingReporter`]: diagnostic lines to a writer, everything else to `tracing`
//! - [`BufferReporter`]: records events for inspection

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::CompileOutcome;

/// Receives everything a job reports, in order.
pub trait Reporter {
    /// `file` compiled (with or without warnings).
    fn compiled(&mut self, file: &Path);

    /// `file` was up to date.
    fn skipped(&mut self, file: &Path);

    /// Compiling the file failed; `shown` is its display path.
    fn failed(&mut self, shown: &Path);

    /// One formatted diagnostic line, newline included.
    fn diagnostic(&mut self, line: &str);

    /// The raw outcome behind a failure, for diagnosis.
    fn raw_outcome(&mut self, file: &Path, outcome: &CompileOutcome);

    /// A configuration value was invalid and has been replaced by its default.
    fn config_warning(&mut self, message: &str);
}

/// File name for progress messages, falling back to the whole path.
fn short_name(file: &Path) -> std::borrow::Cow<'_, str> {
    file.file_name()
        .map_or_else(|| file.to_string_lossy(), |name| name.to_string_lossy())
}

/// Writes diagnostic lines to `W` and logs the other events via `tracing`.
pub struct TracingReporter<W: Write> {
    writer: W,
}

impl TracingReporter<io::Stderr> {
    /// Diagnostic lines to stderr.
    pub fn stderr() -> Self {
        TracingReporter {
            writer: io::stderr(),
        }
    }
}

impl<W: Write> TracingReporter<W> {
    pub fn new(writer: W) -> Self {
        TracingReporter { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for TracingReporter<W> {
    fn compiled(&mut self, file: &Path) {
        tracing::debug!("compiled `{}`", short_name(file));
    }

    fn skipped(&mut self, file: &Path) {
        tracing::debug!("skipped `{}`", short_name(file));
    }

    fn failed(&mut self, shown: &Path) {
        tracing::error!("compiling `{}` failed", shown.display());
    }

    fn diagnostic(&mut self, line: &str) {
        let _ = self.writer.write_all(line.as_bytes());
        let _ = self.writer.flush();
    }

    fn raw_outcome(&mut self, file: &Path, outcome: &CompileOutcome) {
        tracing::debug!(file = %file.display(), "compile outcome: {outcome:?}");
    }

    fn config_warning(&mut self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// One recorded reporter event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportEvent {
    Compiled(PathBuf),
    Skipped(PathBuf),
    Failed(PathBuf),
    Diagnostic(String),
    /// `detail` is the outcome's `Debug` rendering.
    RawOutcome {
        file: PathBuf,
        detail: String,
    },
    ConfigWarning(String),
}

/// Records every event in order.
#[derive(Clone, Debug, Default)]
pub struct BufferReporter {
    events: Vec<ReportEvent>,
}

impl BufferReporter {
    pub fn new() -> Self {
        BufferReporter { events: Vec::new() }
    }

    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ReportEvent> {
        self.events
    }

    /// Only the diagnostic lines.
    pub fn diagnostics(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Diagnostic(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for BufferReporter {
    fn compiled(&mut self, file: &Path) {
        self.events.push(ReportEvent::Compiled(file.to_path_buf()));
    }

    fn skipped(&mut self, file: &Path) {
        self.events.push(ReportEvent::Skipped(file.to_path_buf()));
    }

    fn failed(&mut self, shown: &Path) {
        self.events.push(ReportEvent::Failed(shown.to_path_buf()));
    }

    fn diagnostic(&mut self, line: &str) {
        self.events.push(ReportEvent::Diagnostic(line.to_string()));
    }

    fn raw_outcome(&mut self, file: &Path, outcome: &CompileOutcome) {
        self.events.push(ReportEvent::RawOutcome {
            file: file.to_path_buf(),
            detail: format!("{outcome:?}"),
        });
    }

    fn config_warning(&mut self, message: &str) {
        self.events.push(ReportEvent::ConfigWarning(message.to_string()));
    }
}
