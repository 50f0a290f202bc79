//! Configuration primitives and loader for md-toc.
//!
//! Settings resolve through a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Every layer is optional except the defaults, and the merged result is
//! validated once into a typed [`TocConfig`].

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".md-toc.toml";

pub const DEFAULT_TITLE: &str = "Table of content";
pub const DEFAULT_PLACEHOLDER: &str = "[TOC]";
pub const DEFAULT_BEGIN_MARKER: &str = "$%TOC_BEGIN$";
pub const DEFAULT_END_MARKER: &str = "$%TOC_END$";
pub const DEFAULT_MIN_LEVEL: usize = 2;

const MAX_LEVEL: usize = 6;

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub toc: TocConfig,
    pub sources: ConfigSources,
}

/// Everything the numbering pass and the TOC renderer need to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocConfig {
    /// Heading text of the generated TOC section.
    pub title: String,
    /// Token replaced by the generated TOC block.
    pub placeholder: String,
    pub begin_marker: String,
    pub end_marker: String,
    /// Shallowest header level that is numbered and listed.
    pub min_level: usize,
}

impl Default for TocConfig {
    fn default() -> Self {
        TocConfig {
            title: DEFAULT_TITLE.to_owned(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            begin_marker: DEFAULT_BEGIN_MARKER.to_owned(),
            end_marker: DEFAULT_END_MARKER.to_owned(),
            min_level: DEFAULT_MIN_LEVEL,
        }
    }
}

impl TocConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_min_level(mut self, min_level: usize) -> Self {
        self.min_level = min_level;
        self
    }

    /// Check the invariants the renderer relies on.
    pub fn validate(&self) -> Result<(), ConfigValidationErrors> {
        let mut errors = Vec::new();
        check_toc(
            &TocFields {
                title: &self.title,
                placeholder: &self.placeholder,
                begin_marker: &self.begin_marker,
                end_marker: &self.end_marker,
                min_level: self.min_level,
            },
            None,
            &mut errors,
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigValidationErrors(errors))
        }
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn default() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        ConfigSource {
            kind,
            path: Some(path),
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default();
        let mut merged = TocPartial::defaults(default_source.clone());
        let mut source_layers = vec![default_source];

        let git_config_path = find_git_root(&working_dir).map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let toc = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            toc,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<TocPartial, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.toc.map(|toc| toc.into_partial(source)).unwrap_or_default())
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

#[derive(Clone, Debug, Default)]
struct TocPartial {
    title: Option<Located<String>>,
    placeholder: Option<Located<String>>,
    begin_marker: Option<Located<String>>,
    end_marker: Option<Located<String>>,
    min_level: Option<Located<usize>>,
}

impl TocPartial {
    fn defaults(source: ConfigSource) -> Self {
        TocPartial {
            title: Some(Located::new(DEFAULT_TITLE.into(), source.clone())),
            placeholder: Some(Located::new(DEFAULT_PLACEHOLDER.into(), source.clone())),
            begin_marker: Some(Located::new(DEFAULT_BEGIN_MARKER.into(), source.clone())),
            end_marker: Some(Located::new(DEFAULT_END_MARKER.into(), source.clone())),
            min_level: Some(Located::new(DEFAULT_MIN_LEVEL, source)),
        }
    }

    fn merge(&mut self, other: TocPartial) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.placeholder.is_some() {
            self.placeholder = other.placeholder;
        }
        if other.begin_marker.is_some() {
            self.begin_marker = other.begin_marker;
        }
        if other.end_marker.is_some() {
            self.end_marker = other.end_marker;
        }
        if other.min_level.is_some() {
            self.min_level = other.min_level;
        }
    }

    fn finalize(self) -> Result<TocConfig, ConfigValidationErrors> {
        let fallback = ConfigSource::default();
        let title = self
            .title
            .unwrap_or_else(|| Located::new(DEFAULT_TITLE.into(), fallback.clone()));
        let placeholder = self
            .placeholder
            .unwrap_or_else(|| Located::new(DEFAULT_PLACEHOLDER.into(), fallback.clone()));
        let begin_marker = self
            .begin_marker
            .unwrap_or_else(|| Located::new(DEFAULT_BEGIN_MARKER.into(), fallback.clone()));
        let end_marker = self
            .end_marker
            .unwrap_or_else(|| Located::new(DEFAULT_END_MARKER.into(), fallback.clone()));
        let min_level = self
            .min_level
            .unwrap_or_else(|| Located::new(DEFAULT_MIN_LEVEL, fallback));

        let mut errors = Vec::new();
        let fields = TocFields {
            title: &title.value,
            placeholder: &placeholder.value,
            begin_marker: &begin_marker.value,
            end_marker: &end_marker.value,
            min_level: min_level.value,
        };
        check_toc(
            &fields,
            Some(&FieldSources {
                title: &title.source,
                placeholder: &placeholder.source,
                begin_marker: &begin_marker.source,
                end_marker: &end_marker.source,
                min_level: &min_level.source,
            }),
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(TocConfig {
            title: title.value,
            placeholder: placeholder.value,
            begin_marker: begin_marker.value,
            end_marker: end_marker.value,
            min_level: min_level.value,
        })
    }
}

struct TocFields<'a> {
    title: &'a str,
    placeholder: &'a str,
    begin_marker: &'a str,
    end_marker: &'a str,
    min_level: usize,
}

struct FieldSources<'a> {
    title: &'a ConfigSource,
    placeholder: &'a ConfigSource,
    begin_marker: &'a ConfigSource,
    end_marker: &'a ConfigSource,
    min_level: &'a ConfigSource,
}

fn check_toc(
    fields: &TocFields<'_>,
    sources: Option<&FieldSources<'_>>,
    errors: &mut Vec<ConfigValidationError>,
) {
    let mut push = |source: Option<&ConfigSource>, message: String| {
        errors.push(ConfigValidationError::new(source.cloned(), message));
    };

    for (key, value, source) in [
        ("toc.title", fields.title, sources.map(|s| s.title)),
        (
            "toc.placeholder",
            fields.placeholder,
            sources.map(|s| s.placeholder),
        ),
        (
            "toc.begin_marker",
            fields.begin_marker,
            sources.map(|s| s.begin_marker),
        ),
        (
            "toc.end_marker",
            fields.end_marker,
            sources.map(|s| s.end_marker),
        ),
    ] {
        if value.trim().is_empty() {
            push(source, format!("{key} cannot be empty"));
        }
    }

    if !fields.begin_marker.is_empty() && fields.begin_marker == fields.end_marker {
        push(
            sources.map(|s| s.end_marker),
            "toc.begin_marker and toc.end_marker must differ".into(),
        );
    }

    let placeholder = fields.placeholder;
    if !placeholder.is_empty()
        && ((!fields.begin_marker.is_empty() && placeholder.contains(fields.begin_marker))
            || (!fields.end_marker.is_empty() && placeholder.contains(fields.end_marker)))
    {
        push(
            sources.map(|s| s.placeholder),
            "toc.placeholder cannot contain the begin or end marker".into(),
        );
    }

    if fields.min_level == 0 || fields.min_level > MAX_LEVEL {
        push(
            sources.map(|s| s.min_level),
            format!(
                "toc.min_level must be between 1 and {MAX_LEVEL} (received {})",
                fields.min_level
            ),
        );
    }
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationErrors {}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError { source, message }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    toc: Option<RawToc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawToc {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    begin_marker: Option<String>,
    #[serde(default)]
    end_marker: Option<String>,
    #[serde(default)]
    min_level: Option<usize>,
}

impl RawToc {
    fn into_partial(self, source: ConfigSource) -> TocPartial {
        TocPartial {
            title: self.title.map(|value| Located::new(value, source.clone())),
            placeholder: self
                .placeholder
                .map(|value| Located::new(value, source.clone())),
            begin_marker: self
                .begin_marker
                .map(|value| Located::new(value, source.clone())),
            end_marker: self
                .end_marker
                .map(|value| Located::new(value, source.clone())),
            min_level: self.min_level.map(|value| Located::new(value, source)),
        }
    }
}
