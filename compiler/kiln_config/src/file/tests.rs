use super::*;
use crate::{keys, ConfigLookup};
use pretty_assertions::assert_eq;

#[test]
fn test_parse_options_and_build_table() {
    let text = r#"
warnings_as_errors = true
compiler_source_format = "absolute"
include_dirs = ["include", "deps"]

[build]
source_dir = "src"
source_ext = ".erl"
target_dir = "ebin"
target_ext = ".beam"
priority = ["src/a.erl"]
command = ["erlc", "{src}"]
"#;
    let file = ProjectFile::parse(Path::new("kiln.toml"), text).unwrap();

    assert!(file.options.get_bool(keys::WARNINGS_AS_ERRORS, false));
    assert_eq!(
        file.options.get_str(keys::COMPILER_SOURCE_FORMAT),
        Some("absolute")
    );
    assert_eq!(
        file.options.get("include_dirs"),
        Some(&ConfigValue::from(vec!["include", "deps"]))
    );

    assert_eq!(
        file.build,
        BuildSection {
            source_dir: Some(PathBuf::from("src")),
            source_ext: Some(".erl".to_string()),
            target_dir: Some(PathBuf::from("ebin")),
            target_ext: Some(".beam".to_string()),
            priority: vec![PathBuf::from("src/a.erl")],
            recursive: None,
            check_last_mod: None,
            command: vec!["erlc".to_string(), "{src}".to_string()],
        }
    );
}

#[test]
fn test_empty_file_has_defaults() {
    let file = ProjectFile::parse(Path::new("kiln.toml"), "").unwrap();
    assert!(file.options.is_empty());
    assert_eq!(file.build, BuildSection::default());
}

#[test]
fn test_unsupported_value_names_key() {
    let err = ProjectFile::parse(Path::new("kiln.toml"), "ratio = 0.5\n").unwrap_err();
    match err {
        ConfigFileError::UnsupportedValue { key, kind, .. } => {
            assert_eq!(key, "ratio");
            assert_eq!(kind, "float");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_nested_table_rejected() {
    let err = ProjectFile::parse(Path::new("kiln.toml"), "[deps]\nfoo = 1\n").unwrap_err();
    assert!(matches!(
        err,
        ConfigFileError::UnsupportedValue { kind: "table", .. }
    ));
}

#[test]
fn test_unknown_build_key_is_parse_error() {
    let err =
        ProjectFile::parse(Path::new("kiln.toml"), "[build]\nsrc = \"x\"\n").unwrap_err();
    assert!(matches!(err, ConfigFileError::Parse { .. }));
    assert!(err.to_string().starts_with("failed to parse kiln.toml"));
}

#[test]
fn test_find_in_missing_and_present() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ProjectFile::find_in(dir.path()).unwrap().is_none());

    std::fs::write(dir.path().join(DEFAULT_FILE_NAME), "warnings_as_errors = false\n").unwrap();
    let file = ProjectFile::find_in(dir.path()).unwrap().unwrap();
    assert!(!file.options.get_bool(keys::WARNINGS_AS_ERRORS, true));
    assert_eq!(file.path, dir.path().join(DEFAULT_FILE_NAME));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ProjectFile::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigFileError::Io { .. }));
}

#[test]
fn test_resolve_against_file_directory() {
    let file = ProjectFile::parse(Path::new("/proj/kiln.toml"), "").unwrap();
    assert_eq!(file.base_dir(), Path::new("/proj"));
    assert_eq!(file.resolve(Path::new("src")), PathBuf::from("/proj/src"));
    assert_eq!(file.resolve(Path::new("/abs/src")), PathBuf::from("/abs/src"));

    let local = ProjectFile::parse(Path::new("kiln.toml"), "").unwrap();
    assert_eq!(local.resolve(Path::new("src")), PathBuf::from("src"));
}
