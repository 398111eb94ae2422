use std::path::PathBuf;

/// Why a job stopped.
///
/// `CompileFailed` is the generic job failure signal. It deliberately does
/// not carry diagnostics: they have already gone to the reporter.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("compiling {} failed", file.display())]
    CompileFailed { file: PathBuf },

    #[error("failed to scan {}: {source}", root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid source file pattern: {0}")]
    Pattern(#[from] regex::Error),
}
