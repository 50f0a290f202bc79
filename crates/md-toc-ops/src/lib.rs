//! Chapter numbering and TOC generation for a single markdown file.

mod anchors;
mod diff;
mod engine;
mod error;
mod fs;
mod toc;

use std::path::PathBuf;

use log::{info, warn};
use md_toc_config::TocConfig;
use md_toc_outline::{Chapter, LevelSkip};

pub use anchors::anchor_slug;
pub use diff::build_unified_diff;
pub use engine::{generate_toc, Generated};
pub use error::{OperationError, OperationResult};
pub use fs::atomic_write;
pub use toc::{
    collapse_block, generate_items, render_block, render_items_with_separator,
    substitute_placeholder, TocItem,
};

/// How `toc` treats a document that would change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TocMode {
    /// Rewrite the file in place.
    #[default]
    Update,
    /// Leave the file alone; report drift through the exit code.
    Check,
    /// Leave the file alone; report drift as a unified diff.
    Diff,
}

#[derive(Clone, Debug)]
pub struct TocOptions {
    pub path: PathBuf,
    pub mode: TocMode,
}

#[derive(Debug)]
pub struct TocOutcome {
    pub path: PathBuf,
    pub mode: TocMode,
    pub changed: bool,
    pub diff: Option<String>,
    pub chapters: Vec<Chapter>,
    pub warnings: Vec<LevelSkip>,
    pub exit_code: i32,
}

/// Operation layer bound to one resolved configuration.
pub struct Operations {
    config: TocConfig,
}

impl Operations {
    pub fn new(config: TocConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TocConfig {
        &self.config
    }

    /// Transform document text without touching the filesystem.
    pub fn generate(&self, contents: &str) -> Generated {
        generate_toc(contents, &self.config)
    }

    /// Renumber the chapters of one file and regenerate its TOC.
    ///
    /// The whole file is read before anything is written; nothing is written
    /// unless the mode is [`TocMode::Update`] and the content changed.
    pub fn toc(&self, options: TocOptions) -> OperationResult<TocOutcome> {
        let TocOptions { path, mode } = options;

        if !path.is_file() {
            return Err(OperationError::InvalidInput(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let original = std::fs::read_to_string(&path).map_err(OperationError::io(&path))?;
        let generated = self.generate(&original);
        let changed = generated.content != original;

        if generated.placeholders == 0 {
            info!(
                "{}: no {} placeholder found; only headers were renumbered",
                path.display(),
                self.config.placeholder
            );
        }

        let mut diff = None;
        let exit_code = match mode {
            TocMode::Update => {
                if changed {
                    atomic_write(&path, &generated.content).map_err(OperationError::io(&path))?;
                    info!("updated {}", path.display());
                }
                0
            }
            TocMode::Check => {
                if changed {
                    warn!("{} is out of date", path.display());
                }
                i32::from(changed)
            }
            TocMode::Diff => {
                diff = build_unified_diff(
                    &original,
                    &generated.content,
                    &path.display().to_string(),
                );
                i32::from(changed)
            }
        };

        Ok(TocOutcome {
            path,
            mode,
            changed,
            diff,
            chapters: generated.chapters,
            warnings: generated.warnings,
            exit_code,
        })
    }
}
