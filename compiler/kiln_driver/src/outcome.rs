//! Result of compiling one source file.

use std::any::Any;
use std::fmt;

use kiln_diagnostic::DiagnosticGroup;

/// What the compile operation reported for one file.
#[derive(Debug)]
pub enum CompileOutcome {
    /// Compiled cleanly.
    Success,
    /// Compiled, with warnings to surface.
    SuccessWithWarnings(Vec<DiagnosticGroup>),
    /// Nothing to do; the target is up to date.
    Skipped,
    /// Compilation failed. Aborts the job.
    Failure {
        errors: Vec<DiagnosticGroup>,
        warnings: Vec<DiagnosticGroup>,
    },
    /// Anything else the operation produced, including a panic. Aborts the job.
    Unrecognized(UnrecognizedOutcome),
}

impl CompileOutcome {
    /// A failure with only errors.
    pub fn errors(errors: Vec<DiagnosticGroup>) -> Self {
        CompileOutcome::Failure {
            errors,
            warnings: Vec::new(),
        }
    }

    /// Whether this outcome lets the job continue.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CompileOutcome::Success
                | CompileOutcome::SuccessWithWarnings(_)
                | CompileOutcome::Skipped
        )
    }
}

/// Opaque payload of an outcome the driver cannot interpret.
///
/// It can't be formatted as diagnostic lines, but its `Debug` rendering is
/// logged when the job aborts.
pub struct UnrecognizedOutcome(Box<dyn fmt::Debug + Send + Sync>);

impl UnrecognizedOutcome {
    pub fn new<T: fmt::Debug + Send + Sync + 'static>(payload: T) -> Self {
        UnrecognizedOutcome(Box::new(payload))
    }

    /// Wrap the payload of a caught panic.
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::new(CompilePanicked { message })
    }
}

impl fmt::Debug for UnrecognizedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[derive(Debug)]
struct CompilePanicked {
    #[expect(dead_code, reason = "read through the Debug rendering")]
    message: String,
}
