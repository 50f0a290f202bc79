use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use md_toc_config::{Config, ConfigError, ConfigSourceKind, LoadOptions, TocConfig};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.toc, TocConfig::default());
    assert_eq!(config.toc.title, "Table of content");
    assert_eq!(config.toc.placeholder, "[TOC]");
    assert_eq!(config.toc.begin_marker, "$%TOC_BEGIN$");
    assert_eq!(config.toc.end_marker, "$%TOC_END$");
    assert_eq!(config.toc.min_level, 2);
    assert_eq!(config.sources.working_directory, working_dir);
    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn applies_precedence_and_merges_fields() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".md-toc.toml"),
        r#"
        [toc]
        title = "Contents"
        min_level = 3
        "#,
    );

    let nested = git_root.join("docs");
    fs::create_dir(&nested).expect("create docs");
    write_file(
        nested.join(".md-toc.toml"),
        r#"
        [toc]
        min_level = 1
        placeholder = "<!-- toc -->"
        "#,
    );

    let config = Config::load(LoadOptions::default().with_working_dir(&nested))
        .expect("load layered config");

    assert_eq!(config.toc.title, "Contents");
    assert_eq!(config.toc.min_level, 1);
    assert_eq!(config.toc.placeholder, "<!-- toc -->");
    assert_eq!(config.toc.begin_marker, "$%TOC_BEGIN$");

    let kinds: Vec<_> = config.sources.layers.iter().map(|layer| layer.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local
        ]
    );
}

#[test]
fn override_path_wins_over_local_file() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    write_file(
        working_dir.join(".md-toc.toml"),
        "[toc]\ntitle = \"Local\"\n",
    );
    write_file(
        working_dir.join("custom.toml"),
        "[toc]\ntitle = \"Override\"\n",
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_override_path("custom.toml"),
    )
    .expect("load override");

    assert_eq!(config.toc.title, "Override");
    assert_eq!(
        config.sources.layers.last().map(|layer| layer.kind),
        Some(ConfigSourceKind::Override)
    );
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(temp.path())
            .with_override_path("missing.toml"),
    )
    .expect_err("override should be required");

    assert!(matches!(err, ConfigError::OverrideNotFound { .. }));
}

#[test]
fn parse_errors_name_the_file() {
    let temp = TempDir::new().expect("tempdir");
    write_file(temp.path().join(".md-toc.toml"), "[toc\ntitle = 1\n");

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path()))
        .expect_err("invalid toml");

    match err {
        ConfigError::Parse { path, .. } => assert!(path.ends_with(".md-toc.toml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_toc_keys_are_rejected() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".md-toc.toml"),
        "[toc]\nmax_level = 4\n",
    );

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path()))
        .expect_err("unknown key");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn validation_errors_carry_their_source() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".md-toc.toml"),
        r#"
        [toc]
        end_marker = "$%TOC_BEGIN$"
        min_level = 9
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path()))
        .expect_err("invalid values");

    let ConfigError::Validation(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.iter().count(), 2);
    assert!(errors.iter().all(|error| error
        .source
        .as_ref()
        .is_some_and(|source| source.kind == ConfigSourceKind::Local)));
    let rendered = errors.to_string();
    assert!(rendered.contains("must differ"));
    assert!(rendered.contains("toc.min_level must be between 1 and 6 (received 9)"));
    assert!(rendered.contains("local config at"));
}
