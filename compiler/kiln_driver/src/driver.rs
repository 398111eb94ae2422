//! The compile driver.
//!
//! Walks a [`FileSet`] strictly in order, hands each file to the compile
//! operation, reports what came back, and stops at the first failure.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use kiln_config::ConfigLookup;
use kiln_diagnostic::{
    build_failure_result, build_success_result, DiagnosticFormatter, FormatDescription,
    PathDisplayMode,
};

use crate::discovery::{find_sources, source_pattern};
use crate::paths::derive_target_path;
use crate::staleness::should_compile;
use crate::{CompileOutcome, FileSet, JobError, Reporter, UnrecognizedOutcome};

/// Counts for a job that ran to completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobSummary {
    /// Files compiled, with or without warnings.
    pub compiled: usize,
    pub skipped: usize,
    /// Files among `compiled` that produced warnings.
    pub warned: usize,
    pub duration: Duration,
}

impl JobSummary {
    pub fn total(&self) -> usize {
        self.compiled + self.skipped
    }

    /// One-line human summary, e.g. `3 compiled (1 with warnings), 2 up to date in 0.04s`.
    pub fn summary_line(&self) -> String {
        let warned = if self.warned > 0 {
            format!(" ({} with warnings)", self.warned)
        } else {
            String::new()
        };
        format!(
            "{} compiled{warned}, {} up to date in {:.2}s",
            self.compiled,
            self.skipped,
            self.duration.as_secs_f64()
        )
    }
}

/// A source/target directory pair to scan and build.
#[derive(Clone, Debug)]
pub struct DirScan {
    pub source_dir: PathBuf,
    pub source_ext: String,
    pub target_dir: PathBuf,
    pub target_ext: String,
    /// Descend into subdirectories of `source_dir`.
    pub recursive: bool,
    /// Skip files whose target is not older than the source.
    pub check_last_mod: bool,
}

impl DirScan {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        source_ext: impl Into<String>,
        target_dir: impl Into<PathBuf>,
        target_ext: impl Into<String>,
    ) -> Self {
        DirScan {
            source_dir: source_dir.into(),
            source_ext: source_ext.into(),
            target_dir: target_dir.into(),
            target_ext: target_ext.into(),
            recursive: true,
            check_last_mod: true,
        }
    }

    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    #[must_use]
    pub fn check_last_mod(mut self, check_last_mod: bool) -> Self {
        self.check_last_mod = check_last_mod;
        self
    }

    /// Where the artifact for `source` goes.
    pub fn target_for(&self, source: &Path) -> PathBuf {
        derive_target_path(
            source,
            &self.source_dir,
            &self.source_ext,
            &self.target_dir,
            &self.target_ext,
        )
    }
}

/// Runs compile jobs against one configuration and reporter.
///
/// The configuration is never mutated. Everything the job has to say goes
/// to the reporter; the returned error only signals that the job stopped.
pub struct Driver<'a> {
    config: &'a dyn ConfigLookup,
    formatters: &'a dyn FormatDescription,
    reporter: &'a mut dyn Reporter,
    cwd: Option<PathBuf>,
}

impl<'a> Driver<'a> {
    pub fn new(
        config: &'a dyn ConfigLookup,
        formatters: &'a dyn FormatDescription,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Driver {
            config,
            formatters,
            reporter,
            cwd: None,
        }
    }

    /// Use `cwd` for relative display paths instead of the process directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Compile every file in `files`, priority files first.
    ///
    /// `compile` is called once per file, in order, and never again after
    /// a `Failure` or `Unrecognized` outcome. A panic inside `compile` is
    /// treated as an unrecognized outcome.
    pub fn run<F>(&mut self, files: &FileSet, mut compile: F) -> Result<JobSummary, JobError>
    where
        F: FnMut(&Path, &dyn ConfigLookup) -> CompileOutcome,
    {
        let span = tracing::debug_span!("kiln_job", files = files.len());
        let _guard = span.enter();
        let started = Instant::now();

        let mode = self.display_mode();
        let cwd = self.working_dir();
        let formatter = DiagnosticFormatter::new(self.formatters, mode, &cwd);

        let mut summary = JobSummary::default();
        for file in files.iter() {
            let outcome = invoke(&mut compile, file, self.config);
            match &outcome {
                CompileOutcome::Success => {
                    summary.compiled += 1;
                    self.reporter.compiled(file);
                }
                CompileOutcome::SuccessWithWarnings(warnings) => {
                    let result = build_success_result(&formatter, file, warnings);
                    for line in result.lines() {
                        self.reporter.diagnostic(line);
                    }
                    summary.compiled += 1;
                    summary.warned += 1;
                    self.reporter.compiled(file);
                }
                CompileOutcome::Skipped => {
                    summary.skipped += 1;
                    self.reporter.skipped(file);
                }
                CompileOutcome::Failure { .. } | CompileOutcome::Unrecognized(_) => {
                    self.report_failure(&formatter, file, &outcome);
                    return Err(JobError::CompileFailed {
                        file: file.to_path_buf(),
                    });
                }
            }
        }

        summary.duration = started.elapsed();
        Ok(summary)
    }

    /// Scan `scan.source_dir` and compile what is stale, `priority` first.
    ///
    /// Priority files are compiled whether or not discovery finds them, and
    /// never twice. `compile` receives the source and its derived target.
    pub fn run_dir<F>(
        &mut self,
        priority: Vec<PathBuf>,
        scan: &DirScan,
        mut compile: F,
    ) -> Result<JobSummary, JobError>
    where
        F: FnMut(&Path, &Path, &dyn ConfigLookup) -> CompileOutcome,
    {
        let pattern = source_pattern(&scan.source_ext)?;
        let found = find_sources(&scan.source_dir, &pattern, scan.recursive)?;
        tracing::debug!(
            dir = %scan.source_dir.display(),
            found = found.len(),
            "discovered sources"
        );

        let files = FileSet::new(priority, found);
        self.run(&files, |source, config| {
            let target = scan.target_for(source);
            if should_compile(source, &target, scan.check_last_mod) {
                compile(source, &target, config)
            } else {
                CompileOutcome::Skipped
            }
        })
    }

    /// The job's display mode. An invalid setting is reported and replaced.
    fn display_mode(&mut self) -> PathDisplayMode {
        match PathDisplayMode::from_config(self.config) {
            Ok(mode) => mode,
            Err(err) => {
                let fallback = PathDisplayMode::default();
                self.reporter
                    .config_warning(&format!("{err}; using {fallback}"));
                fallback
            }
        }
    }

    fn working_dir(&self) -> PathBuf {
        if let Some(cwd) = &self.cwd {
            return cwd.clone();
        }
        std::env::current_dir().unwrap_or_else(|err| {
            tracing::warn!("cannot read the working directory: {err}");
            PathBuf::from(".")
        })
    }

    fn report_failure(
        &mut self,
        formatter: &DiagnosticFormatter<'_>,
        file: &Path,
        outcome: &CompileOutcome,
    ) {
        self.reporter.failed(&formatter.display_path(file));
        if let CompileOutcome::Failure { errors, warnings } = outcome {
            let result = build_failure_result(formatter, file, errors, warnings, self.config);
            for line in result.lines() {
                self.reporter.diagnostic(line);
            }
        }
        self.reporter.raw_outcome(file, outcome);
    }
}

fn invoke<F>(compile: &mut F, file: &Path, config: &dyn ConfigLookup) -> CompileOutcome
where
    F: FnMut(&Path, &dyn ConfigLookup) -> CompileOutcome,
{
    panic::catch_unwind(AssertUnwindSafe(|| compile(file, config))).unwrap_or_else(|payload| {
        CompileOutcome::Unrecognized(UnrecognizedOutcome::from_panic(&*payload))
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
