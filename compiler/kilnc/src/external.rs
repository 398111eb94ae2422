//! Compiling a file by running an external command.
//!
//! The command's output is scanned for `file:line[:col]: message` lines.
//! Messages starting with `warning` are warnings, everything else is an
//! error. Unlocated output lines are attributed to the source file. After
//! a clean exit only warnings are diagnostics; other output is logged as is.

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Output};

use kiln_config::ConfigLookup;
use kiln_diagnostic::{Description, DiagnosticEntry, DiagnosticGroup};
use kiln_driver::{CompileOutcome, UnrecognizedOutcome};
use regex::Regex;

/// Module id for diagnostics read from external command output.
pub const EXTERNAL_MODULE: &str = "external";

/// An external compiler invocation template.
///
/// Arguments may contain `{src}`, `{out}` and `{out_dir}`. Without any
/// `{src}` placeholder the source path is appended as the last argument.
#[derive(Clone, Debug)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    parser: OutputParser,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, parser: OutputParser) -> Self {
        ExternalCommand {
            program: program.into(),
            args,
            parser,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for compiling `source` into `target`.
    pub fn args_for(&self, source: &Path, target: &Path) -> Vec<String> {
        let src = source.to_string_lossy();
        let out = target.to_string_lossy();
        let out_dir = target
            .parent()
            .map(Path::to_string_lossy)
            .unwrap_or_default();

        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace("{src}", &src)
                    .replace("{out_dir}", &out_dir)
                    .replace("{out}", &out)
            })
            .collect();
        if !self.args.iter().any(|arg| arg.contains("{src}")) {
            args.push(src.into_owned());
        }
        args
    }

    /// Run the command for one file and interpret the result.
    pub fn compile(&self, source: &Path, target: &Path, _config: &dyn ConfigLookup) -> CompileOutcome {
        if let Some(dir) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if let Err(error) = fs::create_dir_all(dir) {
                return CompileOutcome::Unrecognized(UnrecognizedOutcome::new(CommandFault::OutputDir {
                    dir: dir.display().to_string(),
                    error,
                }));
            }
        }

        let args = self.args_for(source, target);
        tracing::debug!(program = %self.program, ?args, "running compiler");
        match Command::new(&self.program).args(&args).output() {
            Ok(output) => self.interpret(&output),
            Err(error) => CompileOutcome::Unrecognized(UnrecognizedOutcome::new(CommandFault::Spawn {
                program: self.program.clone(),
                error,
            })),
        }
    }

    fn interpret(&self, output: &Output) -> CompileOutcome {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let mut parsed = self.parser.parse(&text);

        if output.status.success() {
            for line in &parsed.error_lines {
                tracing::info!(program = %self.program, "{line}");
            }
            if parsed.warnings.is_empty() {
                return CompileOutcome::Success;
            }
            return CompileOutcome::SuccessWithWarnings(parsed.warnings);
        }

        let Some(code) = output.status.code() else {
            return CompileOutcome::Unrecognized(UnrecognizedOutcome::new(CommandFault::Signalled {
                program: self.program.clone(),
                status: output.status,
            }));
        };
        if parsed.errors.is_empty() {
            let message = format!("{} exited with status {code}", self.program);
            parsed.push(None, false, message);
        }
        CompileOutcome::Failure {
            errors: parsed.errors,
            warnings: parsed.warnings,
        }
    }
}

/// Why an external command produced no usable result.
#[derive(Debug)]
#[expect(dead_code, reason = "read through the Debug rendering")]
enum CommandFault {
    Spawn { program: String, error: io::Error },
    OutputDir { dir: String, error: io::Error },
    Signalled { program: String, status: ExitStatus },
}

/// Diagnostics read from command output, grouped by file in order of appearance.
#[derive(Debug, Default)]
pub struct ParsedOutput {
    pub errors: Vec<DiagnosticGroup>,
    pub warnings: Vec<DiagnosticGroup>,
    /// Output lines behind `errors`, verbatim.
    pub error_lines: Vec<String>,
}

impl ParsedOutput {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Add one diagnostic. `None` means the source file being compiled.
    fn push(&mut self, located: Option<(&str, u32, Option<u32>)>, warning: bool, message: String) {
        let groups = if warning {
            &mut self.warnings
        } else {
            &mut self.errors
        };

        let mut entry = DiagnosticEntry::new(EXTERNAL_MODULE, Description::text(message));
        let file = match located {
            Some((file, line, Some(column))) => {
                entry = entry.at(line, column);
                file
            }
            Some((file, line, None)) => {
                entry = entry.at_line(line);
                file
            }
            None => "",
        };

        match groups.iter_mut().find(|group| group.source == Path::new(file)) {
            Some(group) => group.entries.push(entry),
            None => groups.push(DiagnosticGroup::new(file, vec![entry])),
        }
    }
}

/// Reads `file:line[:col]: message` diagnostics out of compiler output.
#[derive(Clone, Debug)]
pub struct OutputParser {
    location: Regex,
}

impl OutputParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(OutputParser {
            location: Regex::new(r"^([^:\s][^:]*):(\d+):(?:(\d+):)?\s*(.*)$")?,
        })
    }

    /// Split command output into located and unlocated diagnostics.
    pub fn parse(&self, text: &str) -> ParsedOutput {
        let mut parsed = ParsedOutput::default();
        for line in text.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }

            let located = self.location.captures(line).and_then(|caps| {
                let file = caps.get(1)?.as_str();
                let line_no = caps.get(2)?.as_str().parse::<u32>().ok()?;
                let column = caps.get(3).and_then(|c| c.as_str().parse::<u32>().ok());
                let message = caps.get(4).map_or("", |m| m.as_str());
                Some(((file, line_no, column), message))
            });

            let (location, message) = match located {
                Some((location, message)) => (Some(location), message),
                None => (None, line),
            };
            match strip_warning_tag(message) {
                Some(text) => parsed.push(location, true, text.to_string()),
                None => {
                    parsed.error_lines.push(line.to_string());
                    parsed.push(location, false, message.to_string());
                }
            }
        }
        parsed
    }
}

/// The message behind a leading `warning` tag, if it has one.
fn strip_warning_tag(message: &str) -> Option<&str> {
    let head = message.get(..7)?;
    if !head.eq_ignore_ascii_case("warning") {
        return None;
    }
    let tail = message.get(7..)?;
    if !(tail.is_empty() || tail.starts_with(':') || tail.starts_with(char::is_whitespace)) {
        return None;
    }
    let text = tail.trim_start_matches(':').trim_start();
    Some(if text.is_empty() { message } else { text })
}
