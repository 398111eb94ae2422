use super::*;
use crate::{BufferReporter, ReportEvent};
use kiln_config::{keys, AssocList, MapConfig};
use kiln_diagnostic::{Description, DiagnosticEntry, DiagnosticGroup, TextFormatter};
use pretty_assertions::assert_eq;
use std::fs;

fn build_mode() -> MapConfig {
    MapConfig::new().with(keys::COMPILER_SOURCE_FORMAT, "build")
}

fn files(names: &[&str]) -> FileSet {
    FileSet::from_files(names.iter().map(PathBuf::from).collect())
}

fn entry(text: &str) -> DiagnosticEntry {
    DiagnosticEntry::new("test", Description::text(text))
}

/// Run `compile` over `set` and return the calls, the result and the events.
fn run_job<F>(
    config: &dyn ConfigLookup,
    set: &FileSet,
    mut compile: F,
) -> (Vec<PathBuf>, Result<JobSummary, JobError>, Vec<ReportEvent>)
where
    F: FnMut(&Path) -> CompileOutcome,
{
    let mut reporter = BufferReporter::new();
    let mut calls = Vec::new();
    let result = Driver::new(config, &TextFormatter, &mut reporter)
        .with_cwd("/work")
        .run(set, |file, _| {
            calls.push(file.to_path_buf());
            compile(file)
        });
    (calls, result, reporter.into_events())
}

#[test]
fn test_fail_fast_stops_at_first_failure() {
    let (calls, result, events) = run_job(&build_mode(), &files(&["f1", "f2", "f3"]), |file| {
        if file == Path::new("f2") {
            CompileOutcome::errors(vec![DiagnosticGroup::new("", vec![entry("bad").at_line(3)])])
        } else {
            CompileOutcome::Success
        }
    });

    assert_eq!(calls, vec![PathBuf::from("f1"), PathBuf::from("f2")]);
    assert!(matches!(result, Err(JobError::CompileFailed { file }) if file == Path::new("f2")));
    assert_eq!(events[0], ReportEvent::Compiled(PathBuf::from("f1")));
    assert_eq!(events[1], ReportEvent::Failed(PathBuf::from("f2")));
    assert_eq!(events[2], ReportEvent::Diagnostic("f2:3: bad\n".to_string()));
    assert!(matches!(&events[3], ReportEvent::RawOutcome { file, .. } if file == Path::new("f2")));
    assert_eq!(events.len(), 4);
}

#[test]
fn test_priority_files_run_first() {
    let set = FileSet::new(
        vec![PathBuf::from("a.x"), PathBuf::from("c.x")],
        vec![PathBuf::from("c.x"), PathBuf::from("a.x"), PathBuf::from("b.x")],
    );
    let (calls, result, _) = run_job(&build_mode(), &set, |_| CompileOutcome::Success);

    assert_eq!(
        calls,
        vec![PathBuf::from("a.x"), PathBuf::from("c.x"), PathBuf::from("b.x")]
    );
    assert_eq!(result.unwrap().compiled, 3);
}

#[test]
fn test_success_warnings_are_reported_with_prefix() {
    let config = AssocList::new()
        .pair(keys::COMPILER_SOURCE_FORMAT, "build")
        .flag(keys::WARNINGS_AS_ERRORS);
    let (_, result, events) = run_job(&config, &files(&["src/a.erl"]), |_| {
        CompileOutcome::SuccessWithWarnings(vec![DiagnosticGroup::new(
            "",
            vec![entry("unused").at(2, 7)],
        )])
    });

    assert_eq!(
        events,
        vec![
            ReportEvent::Diagnostic("src/a.erl:2:7: Warning: unused\n".to_string()),
            ReportEvent::Compiled(PathBuf::from("src/a.erl")),
        ]
    );
    let summary = result.unwrap();
    assert_eq!((summary.compiled, summary.warned), (1, 1));
}

#[test]
fn test_failure_warnings_follow_warnings_as_errors() {
    let failing = |_: &Path| CompileOutcome::Failure {
        errors: vec![DiagnosticGroup::new("", vec![entry("syntax error").at_line(1)])],
        warnings: vec![DiagnosticGroup::new("", vec![entry("unused").at_line(5)])],
    };

    let strict = build_mode().with(keys::WARNINGS_AS_ERRORS, true);
    let (_, _, events) = run_job(&strict, &files(&["a.erl"]), failing);
    let lines: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, ReportEvent::Diagnostic(_)))
        .cloned()
        .collect();
    assert_eq!(
        lines,
        vec![
            ReportEvent::Diagnostic("a.erl:1: syntax error\n".to_string()),
            ReportEvent::Diagnostic("a.erl:5: unused\n".to_string()),
        ]
    );

    let (_, _, events) = run_job(&build_mode(), &files(&["a.erl"]), failing);
    assert!(events.contains(&ReportEvent::Diagnostic("a.erl:5: Warning: unused\n".to_string())));
}

#[test]
fn test_invalid_display_mode_warns_and_uses_relative() {
    let dir = tempfile::tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    fs::create_dir(root.join("src")).unwrap();
    let source = root.join("src").join("a.erl");
    fs::write(&source, "").unwrap();

    let config = MapConfig::new().with(keys::COMPILER_SOURCE_FORMAT, "fancy");
    let mut reporter = BufferReporter::new();
    let result = Driver::new(&config, &TextFormatter, &mut reporter)
        .with_cwd(&root)
        .run(&FileSet::from_files(vec![source.clone()]), |_, _| {
            CompileOutcome::errors(vec![DiagnosticGroup::new("", vec![entry("oops")])])
        });

    assert!(result.is_err());
    let events = reporter.into_events();
    assert!(matches!(&events[0], ReportEvent::ConfigWarning(msg) if msg.contains("fancy")));
    assert_eq!(events[1], ReportEvent::Failed(PathBuf::from("src/a.erl")));
    assert_eq!(events[2], ReportEvent::Diagnostic("src/a.erl: oops\n".to_string()));
}

#[test]
fn test_unrecognized_outcome_is_logged_and_aborts() {
    let (calls, result, events) = run_job(&build_mode(), &files(&["a.erl", "b.erl"]), |_| {
        CompileOutcome::Unrecognized(UnrecognizedOutcome::new(("weird", 42)))
    });

    assert_eq!(calls.len(), 1);
    assert!(result.is_err());
    assert_eq!(
        events,
        vec![
            ReportEvent::Failed(PathBuf::from("a.erl")),
            ReportEvent::RawOutcome {
                file: PathBuf::from("a.erl"),
                detail: r#"Unrecognized(("weird", 42))"#.to_string(),
            },
        ]
    );
}

#[test]
fn test_panic_in_compile_is_unrecognized() {
    let (calls, result, events) = run_job(&build_mode(), &files(&["a.erl", "b.erl"]), |_| {
        panic!("compiler exploded")
    });

    assert_eq!(calls.len(), 1);
    assert!(matches!(result, Err(JobError::CompileFailed { .. })));
    let Some(ReportEvent::RawOutcome { detail, .. }) = events.last() else {
        panic!("expected a raw outcome, got {events:?}");
    };
    assert!(detail.contains("compiler exploded"), "{detail}");
}

#[test]
fn test_summary_counts() {
    let mut outcomes = vec![
        CompileOutcome::Success,
        CompileOutcome::Skipped,
        CompileOutcome::SuccessWithWarnings(vec![DiagnosticGroup::new("", vec![entry("w")])]),
    ]
    .into_iter();
    let (_, result, _) = run_job(&build_mode(), &files(&["a", "b", "c"]), |_| {
        outcomes.next().unwrap()
    });

    let summary = result.unwrap();
    assert_eq!((summary.compiled, summary.skipped, summary.warned), (2, 1, 1));
    assert_eq!(summary.total(), 3);
}

#[test]
fn test_summary_line() {
    let summary = JobSummary {
        compiled: 3,
        skipped: 2,
        warned: 1,
        duration: Duration::from_millis(40),
    };
    assert_eq!(summary.summary_line(), "3 compiled (1 with warnings), 2 up to date in 0.04s");

    let quiet = JobSummary {
        compiled: 0,
        skipped: 4,
        ..JobSummary::default()
    };
    assert_eq!(quiet.summary_line(), "0 compiled, 4 up to date in 0.00s");
}

#[test]
fn test_empty_job_succeeds() {
    let (calls, result, events) = run_job(&build_mode(), &FileSet::default(), |_| {
        CompileOutcome::Success
    });
    assert!(calls.is_empty());
    assert!(events.is_empty());
    assert_eq!(result.unwrap().total(), 0);
}

#[test]
fn test_dir_scan_defaults() {
    let scan = DirScan::new("src", ".erl", "ebin", ".beam");
    assert!(scan.recursive);
    assert!(scan.check_last_mod);

    let scan = scan.recursive(false).check_last_mod(false);
    assert!(!scan.recursive);
    assert!(!scan.check_last_mod);
    assert_eq!(scan.target_for(Path::new("src/a/b.erl")), PathBuf::from("ebin/b.beam"));
}

#[test]
fn test_run_dir_orders_priority_and_skips_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("sub")).unwrap();
    for name in ["a.erl", "b.erl", "._b.erl", "notes.txt", "sub/c.erl"] {
        fs::write(src.join(name), "").unwrap();
    }
    let scan = DirScan::new(&src, ".erl", dir.path().join("ebin"), ".beam");

    let config = build_mode();
    let mut reporter = BufferReporter::new();
    let mut calls = Vec::new();
    let summary = Driver::new(&config, &TextFormatter, &mut reporter)
        .run_dir(vec![src.join("b.erl")], &scan, |source, target, _| {
            calls.push((source.to_path_buf(), target.to_path_buf()));
            CompileOutcome::Success
        })
        .unwrap();

    let ebin = dir.path().join("ebin");
    assert_eq!(
        calls,
        vec![
            (src.join("b.erl"), ebin.join("b.beam")),
            (src.join("a.erl"), ebin.join("a.beam")),
            (src.join("sub/c.erl"), ebin.join("c.beam")),
        ]
    );
    assert_eq!(summary.compiled, 3);
}

#[test]
fn test_run_dir_skips_up_to_date_targets() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let ebin = dir.path().join("ebin");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&ebin).unwrap();
    fs::write(src.join("a.erl"), "").unwrap();
    fs::write(ebin.join("a.beam"), "").unwrap();
    let past = std::time::SystemTime::now() - Duration::from_secs(3600);
    fs::File::options()
        .write(true)
        .open(src.join("a.erl"))
        .unwrap()
        .set_modified(past)
        .unwrap();

    let config = build_mode();
    let scan = DirScan::new(&src, ".erl", &ebin, ".beam");

    let mut reporter = BufferReporter::new();
    let mut invoked = 0;
    let summary = Driver::new(&config, &TextFormatter, &mut reporter)
        .run_dir(Vec::new(), &scan, |_, _, _| {
            invoked += 1;
            CompileOutcome::Success
        })
        .unwrap();
    assert_eq!(invoked, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(reporter.events(), &[ReportEvent::Skipped(src.join("a.erl"))]);

    let forced = scan.check_last_mod(false);
    let summary = Driver::new(&config, &TextFormatter, &mut reporter)
        .run_dir(Vec::new(), &forced, |_, _, _| {
            invoked += 1;
            CompileOutcome::Success
        })
        .unwrap();
    assert_eq!(invoked, 1);
    assert_eq!(summary.compiled, 1);
}

#[test]
fn test_run_dir_missing_source_dir_is_empty_job() {
    let dir = tempfile::tempdir().unwrap();
    let scan = DirScan::new(dir.path().join("nope"), ".erl", dir.path().join("ebin"), ".beam");

    let config = build_mode();
    let mut reporter = BufferReporter::new();
    let summary = Driver::new(&config, &TextFormatter, &mut reporter)
        .run_dir(Vec::new(), &scan, |_, _, _| CompileOutcome::Success)
        .unwrap();
    assert_eq!(summary.total(), 0);
}
