//! One-line-per-diagnostic text formatting.

use std::path::{Path, PathBuf};

use kiln_config::{keys, ConfigLookup};

use crate::{
    format_display_path, DiagnosticEntry, DiagnosticGroup, FormatDescription, Location,
    PathDisplayMode,
};

/// Text placed in front of each description.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinePrefix {
    /// No prefix. Used for errors, and for warnings when they count as errors.
    Bare,
    /// `Warning: `
    Warning,
}

impl LinePrefix {
    /// Prefix for warning lines given the "warnings are errors" setting.
    pub fn for_warnings(warnings_as_errors: bool) -> Self {
        if warnings_as_errors {
            LinePrefix::Bare
        } else {
            LinePrefix::Warning
        }
    }

    /// [`LinePrefix::for_warnings`] with the setting read from `config`.
    pub fn for_warnings_in(config: &dyn ConfigLookup) -> Self {
        Self::for_warnings(config.get_bool(keys::WARNINGS_AS_ERRORS, false))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinePrefix::Bare => "",
            LinePrefix::Warning => "Warning: ",
        }
    }
}

/// Formats diagnostic groups for one job.
#[derive(Clone, Copy)]
pub struct DiagnosticFormatter<'a> {
    formatters: &'a dyn FormatDescription,
    mode: PathDisplayMode,
    cwd: &'a Path,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(formatters: &'a dyn FormatDescription, mode: PathDisplayMode, cwd: &'a Path) -> Self {
        DiagnosticFormatter {
            formatters,
            mode,
            cwd,
        }
    }

    pub fn mode(&self) -> PathDisplayMode {
        self.mode
    }

    /// Render `path` under this formatter's display mode.
    pub fn display_path(&self, path: &Path) -> PathBuf {
        format_display_path(path, self.mode, self.cwd)
    }

    /// Flatten `groups` into lines, in group order then entry order.
    ///
    /// Groups with an empty source are attributed to `main_source`.
    pub fn format_groups(
        &self,
        main_source: &Path,
        groups: &[DiagnosticGroup],
        prefix: LinePrefix,
    ) -> Vec<String> {
        let mut lines = Vec::with_capacity(groups.iter().map(DiagnosticGroup::len).sum());
        for group in groups {
            let source = if group.source.as_os_str().is_empty() {
                main_source
            } else {
                group.source.as_path()
            };
            let shown = self.display_path(source).display().to_string();
            for entry in &group.entries {
                lines.push(self.format_entry(&shown, entry, prefix));
            }
        }
        lines
    }

    /// Format a single entry; `shown` is the already rendered path.
    pub fn format_entry(&self, shown: &str, entry: &DiagnosticEntry, prefix: LinePrefix) -> String {
        let text = self
            .formatters
            .format_description(&entry.module, &entry.description);
        let prefix = prefix.as_str();
        match entry.location {
            Some(Location::LineCol(line, column)) => {
                format!("{shown}:{line}:{column}: {prefix}{text}\n")
            }
            Some(Location::Line(line)) => format!("{shown}:{line}: {prefix}{text}\n"),
            None => format!("{shown}: {prefix}{text}\n"),
        }
    }
}

/// Free-function form of [`DiagnosticFormatter::format_groups`].
pub fn format_diagnostic_groups(
    groups: &[DiagnosticGroup],
    mode: PathDisplayMode,
    cwd: &Path,
    prefix: LinePrefix,
    formatters: &dyn FormatDescription,
) -> Vec<String> {
    DiagnosticFormatter::new(formatters, mode, cwd).format_groups(Path::new(""), groups, prefix)
}

/// Pre-formatted result of compiling one source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormattedResult {
    Ok {
        warnings: Vec<String>,
    },
    Error {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

impl FormattedResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, FormattedResult::Ok { .. })
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            FormattedResult::Ok { warnings } | FormattedResult::Error { warnings, .. } => warnings,
        }
    }

    /// Every line in reporting order: errors, then warnings.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let errors: &[String] = match self {
            FormattedResult::Ok { .. } => &[],
            FormattedResult::Error { errors, .. } => errors,
        };
        errors.iter().chain(self.warnings()).map(String::as_str)
    }
}

/// Success carrying formatted warnings.
///
/// The compile succeeded, so warnings always keep their `Warning: ` prefix.
pub fn build_success_result(
    formatter: &DiagnosticFormatter<'_>,
    source: &Path,
    warnings: &[DiagnosticGroup],
) -> FormattedResult {
    FormattedResult::Ok {
        warnings: formatter.format_groups(source, warnings, LinePrefix::Warning),
    }
}

/// Failure carrying formatted errors and warnings.
///
/// Warnings drop their prefix when `warnings_as_errors` is set in `config`.
pub fn build_failure_result(
    formatter: &DiagnosticFormatter<'_>,
    source: &Path,
    errors: &[DiagnosticGroup],
    warnings: &[DiagnosticGroup],
    config: &dyn ConfigLookup,
) -> FormattedResult {
    FormattedResult::Error {
        errors: formatter.format_groups(source, errors, LinePrefix::Bare),
        warnings: formatter.format_groups(source, warnings, LinePrefix::for_warnings_in(config)),
    }
}
