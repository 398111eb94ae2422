//! `kiln build`.

use std::path::Path;

use kiln_config::{ConfigFileError, ProjectFile};
use kiln_diagnostic::{FormatterRegistry, TextFormatter};
use kiln_driver::{Driver, JobError, JobSummary, TracingReporter};

use crate::external::{ExternalCommand, OutputParser, EXTERNAL_MODULE};
use crate::options::{BuildArgs, BuildPlan, UsageError};

/// Why `kiln build` did not finish.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Config(#[from] ConfigFileError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("invalid diagnostic pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Load the project file `args` point at, if any.
///
/// An explicit `--config` must exist; otherwise `kiln.toml` in the working
/// directory is used when present.
pub fn load_project(args: &BuildArgs) -> Result<Option<ProjectFile>, ConfigFileError> {
    match &args.config {
        Some(path) => ProjectFile::load(path).map(Some),
        None => ProjectFile::find_in(Path::new(".")),
    }
}

/// Run one build. Diagnostics go to stderr as they are produced.
pub fn build(args: &BuildArgs) -> Result<JobSummary, BuildError> {
    let project = load_project(args)?;
    if let Some(project) = &project {
        tracing::debug!(path = %project.path.display(), "loaded project file");
    }
    let plan = BuildPlan::resolve(args, project.as_ref())?;

    let external = ExternalCommand::new(&plan.program, plan.args.clone(), OutputParser::new()?);
    let formatters = FormatterRegistry::new().with(EXTERNAL_MODULE, TextFormatter);
    let mut reporter = TracingReporter::stderr();

    tracing::info!(
        src = %plan.scan.source_dir.display(),
        out = %plan.scan.target_dir.display(),
        program = external.program(),
        "building"
    );
    let summary = Driver::new(&plan.config, &formatters, &mut reporter).run_dir(
        plan.priority.clone(),
        &plan.scan,
        |source, target, config| external.compile(source, target, config),
    )?;
    Ok(summary)
}
