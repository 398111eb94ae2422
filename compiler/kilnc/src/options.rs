//! `kiln build` arguments and how they combine with `kiln.toml`.

use std::path::{Component, Path, PathBuf};
use std::slice;

use kiln_config::{keys, BuildSection, MapConfig, ProjectFile};
use kiln_driver::DirScan;

/// A malformed command line or an incomplete build description.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing value for '{0}'")]
    MissingValue(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("no {0} given; pass it on the command line or set it in kiln.toml")]
    MissingSetting(&'static str),
}

/// `kiln build` arguments exactly as given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each bool is an independent command line flag"
)]
pub struct BuildArgs {
    pub config: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub source_ext: Option<String>,
    pub target_dir: Option<PathBuf>,
    pub target_ext: Option<String>,
    /// Repeatable `--priority`.
    pub priority: Vec<PathBuf>,
    pub no_recursive: bool,
    /// Compile everything, ignoring modification times.
    pub force: bool,
    pub warnings_as_errors: bool,
    pub source_format: Option<String>,
    pub verbose: bool,
    /// Everything after `--`.
    pub command: Vec<String>,
}

/// Parse the arguments that follow `kiln build`.
///
/// Valued options accept both `--opt value` and `--opt=value`.
pub fn parse_build_args(args: &[String]) -> Result<BuildArgs, UsageError> {
    let mut parsed = BuildArgs::default();
    let mut rest = args.iter();

    while let Some(arg) = rest.next() {
        if arg == "--" {
            parsed.command = rest.cloned().collect();
            break;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (arg.as_str(), None),
        };

        match flag {
            "--config" => parsed.config = Some(take_value(flag, inline, &mut rest)?.into()),
            "--src" => parsed.source_dir = Some(take_value(flag, inline, &mut rest)?.into()),
            "--ext" => parsed.source_ext = Some(take_value(flag, inline, &mut rest)?),
            "--out" => parsed.target_dir = Some(take_value(flag, inline, &mut rest)?.into()),
            "--out-ext" => parsed.target_ext = Some(take_value(flag, inline, &mut rest)?),
            "--priority" => parsed
                .priority
                .push(take_value(flag, inline, &mut rest)?.into()),
            "--source-format" => {
                parsed.source_format = Some(take_value(flag, inline, &mut rest)?);
            }
            "--no-recursive" if inline.is_none() => parsed.no_recursive = true,
            "--force" if inline.is_none() => parsed.force = true,
            "--warnings-as-errors" if inline.is_none() => parsed.warnings_as_errors = true,
            "-v" | "--verbose" if inline.is_none() => parsed.verbose = true,
            _ if arg.starts_with('-') => return Err(UsageError::UnknownOption(arg.clone())),
            _ => return Err(UsageError::UnexpectedArgument(arg.clone())),
        }
    }

    Ok(parsed)
}

fn take_value(
    flag: &str,
    inline: Option<&str>,
    rest: &mut slice::Iter<'_, String>,
) -> Result<String, UsageError> {
    match inline {
        Some(value) => Ok(value.to_string()),
        None => rest
            .next()
            .cloned()
            .ok_or_else(|| UsageError::MissingValue(flag.to_string())),
    }
}

/// A fully resolved build: what to scan, in which order, with which
/// configuration and command.
#[derive(Clone, Debug)]
pub struct BuildPlan {
    pub scan: DirScan,
    pub priority: Vec<PathBuf>,
    pub config: MapConfig,
    /// Compile command, split into the program and its argument template.
    pub program: String,
    pub args: Vec<String>,
}

impl BuildPlan {
    /// Combine `args` with the project file, command line first.
    ///
    /// Paths from the project file are relative to its directory; paths
    /// from the command line are relative to the working directory. Every
    /// path loses its `.` components, so `./src/a.erl` and `src/a.erl`
    /// name the same priority file. The target directory defaults to the
    /// source directory.
    pub fn resolve(args: &BuildArgs, project: Option<&ProjectFile>) -> Result<Self, UsageError> {
        let section = project.map(|p| &p.build);

        let source_dir = args
            .source_dir
            .as_deref()
            .map(without_cur_dir)
            .or_else(|| project_path(project, |b| b.source_dir.as_ref()))
            .ok_or(UsageError::MissingSetting("source directory (--src)"))?;
        let source_ext = args
            .source_ext
            .clone()
            .or_else(|| section.and_then(|b| b.source_ext.clone()))
            .ok_or(UsageError::MissingSetting("source extension (--ext)"))?;
        let target_dir = args
            .target_dir
            .as_deref()
            .map(without_cur_dir)
            .or_else(|| project_path(project, |b| b.target_dir.as_ref()))
            .unwrap_or_else(|| source_dir.clone());
        let target_ext = args
            .target_ext
            .clone()
            .or_else(|| section.and_then(|b| b.target_ext.clone()))
            .ok_or(UsageError::MissingSetting("target extension (--out-ext)"))?;

        let recursive = !args.no_recursive && section.and_then(|b| b.recursive).unwrap_or(true);
        let check_last_mod =
            !args.force && section.and_then(|b| b.check_last_mod).unwrap_or(true);

        let mut priority: Vec<PathBuf> = match project {
            Some(p) => p
                .build
                .priority
                .iter()
                .map(|path| without_cur_dir(&p.resolve(path)))
                .collect(),
            None => Vec::new(),
        };
        priority.extend(args.priority.iter().map(PathBuf::as_path).map(without_cur_dir));

        let command = if args.command.is_empty() {
            section.map(|b| b.command.clone()).unwrap_or_default()
        } else {
            args.command.clone()
        };
        let Some((program, command_args)) = command.split_first() else {
            return Err(UsageError::MissingSetting("compile command (after --)"));
        };

        let mut config = project.map(|p| p.options.clone()).unwrap_or_default();
        if args.warnings_as_errors {
            config.insert(keys::WARNINGS_AS_ERRORS, true);
        }
        if let Some(format) = &args.source_format {
            config.insert(keys::COMPILER_SOURCE_FORMAT, format.as_str());
        }

        Ok(BuildPlan {
            scan: DirScan::new(source_dir, source_ext, target_dir, target_ext)
                .recursive(recursive)
                .check_last_mod(check_last_mod),
            priority,
            config,
            program: program.clone(),
            args: command_args.to_vec(),
        })
    }
}

/// A path from the project file's `[build]` table, resolved against the file.
fn project_path(
    project: Option<&ProjectFile>,
    pick: impl Fn(&BuildSection) -> Option<&PathBuf>,
) -> Option<PathBuf> {
    let project = project?;
    pick(&project.build).map(|path| without_cur_dir(&project.resolve(path)))
}

/// `path` without `.` components; `.` itself when nothing else is left.
fn without_cur_dir(path: &Path) -> PathBuf {
    let path: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path
    }
}
