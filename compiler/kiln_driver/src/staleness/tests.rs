use super::*;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

fn touch(path: &Path, at: SystemTime) {
    fs::write(path, "").unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(at)
        .unwrap();
}

fn pair(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("a.erl"), dir.join("a.beam"))
}

#[test]
fn test_equal_mtimes_do_not_compile() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = pair(dir.path());
    let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    touch(&source, t);
    touch(&target, t);

    assert!(!should_compile(&source, &target, true));
}

#[test]
fn test_older_target_compiles() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = pair(dir.path());
    let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    touch(&target, t);
    touch(&source, t + Duration::from_secs(1));

    assert!(should_compile(&source, &target, true));
}

#[test]
fn test_newer_target_skips() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = pair(dir.path());
    let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    touch(&source, t);
    touch(&target, t + Duration::from_secs(60));

    assert!(!should_compile(&source, &target, true));
}

#[test]
fn test_missing_target_compiles() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = pair(dir.path());
    touch(&source, SystemTime::now());

    assert!(should_compile(&source, &target, true));
}

#[test]
fn test_missing_source_does_not_compile() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = pair(dir.path());
    touch(&target, SystemTime::now());

    assert!(!should_compile(&source, &target, true));
    assert!(!should_compile(&source, &dir.path().join("gone.beam"), true));
}

#[test]
fn test_disabled_check_always_compiles() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = pair(dir.path());
    let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    touch(&source, t);
    touch(&target, t + Duration::from_secs(60));

    assert!(should_compile(&source, &target, false));
}

#[test]
fn test_repeated_checks_agree() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target) = pair(dir.path());
    let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    touch(&source, t + Duration::from_secs(5));
    touch(&target, t);

    let first = should_compile(&source, &target, true);
    let second = should_compile(&source, &target, true);
    assert_eq!(first, second);
    assert!(first);
}
