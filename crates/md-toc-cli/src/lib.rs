use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::warn;
use md_toc_config::{Config, LoadOptions};
use md_toc_ops::{OperationError, Operations, TocMode, TocOptions, TocOutcome};

pub const EXIT_OK: i32 = 0;
pub const EXIT_DRIFT: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_CONFIG: i32 = 3;
pub const EXIT_IO: i32 = 4;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let config = match Config::load(LoadOptions {
        override_path: cli.config.clone(),
        working_dir: None,
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return Ok(EXIT_CONFIG);
        }
    };

    let mut toc = config.toc;
    if let Some(title) = cli.title.clone() {
        toc = toc.with_title(title);
    }
    if let Some(level) = cli.min_level {
        toc = toc.with_min_level(usize::from(level));
    }
    if let Err(errors) = toc.validate() {
        eprintln!("invalid settings:\n{errors}");
        return Ok(EXIT_USAGE);
    }

    let mode = if cli.check {
        TocMode::Check
    } else if cli.diff {
        TocMode::Diff
    } else {
        TocMode::Update
    };

    let ops = Operations::new(toc);
    let options = TocOptions {
        path: cli.file.clone(),
        mode,
    };

    match ops.toc(options) {
        Ok(outcome) => Ok(report(&outcome)),
        Err(OperationError::InvalidInput(message)) => {
            eprintln!("{message}");
            eprintln!("{}", Cli::command().render_usage());
            Ok(EXIT_USAGE)
        }
        Err(err @ OperationError::Io { .. }) => {
            eprintln!("{err}");
            Ok(EXIT_IO)
        }
    }
}

fn report(outcome: &TocOutcome) -> i32 {
    match outcome.mode {
        TocMode::Update => {}
        TocMode::Check => {
            if outcome.changed {
                println!("{}: chapters or TOC out of date", outcome.path.display());
            }
        }
        TocMode::Diff => {
            if let Some(diff) = &outcome.diff {
                emit(diff);
            }
        }
    }

    if !outcome.warnings.is_empty() {
        warn!(
            "{}: {} irregular heading level(s) numbered with synthesized zeros",
            outcome.path.display(),
            outcome.warnings.len()
        );
    }

    if outcome.exit_code == 0 {
        EXIT_OK
    } else {
        EXIT_DRIFT
    }
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

fn emit(content: &str) {
    print!("{content}");
    if !content.ends_with('\n') {
        println!();
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Number markdown chapters and generate a linked table of contents",
    long_about = None
)]
struct Cli {
    /// Markdown file to rewrite in place
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Heading of the generated TOC section
    #[arg(value_name = "TITLE")]
    title: Option<String>,

    /// Config file to use instead of discovered `.md-toc.toml` layers
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Shallowest header level that gets numbered
    #[arg(long = "min-level", value_name = "N", value_parser = clap::value_parser!(u8).range(1..=6))]
    min_level: Option<u8>,

    /// Exit non-zero when the file would change, without writing it
    #[arg(long, conflicts_with = "diff")]
    check: bool,

    /// Print a unified diff of the pending changes, without writing
    #[arg(long, conflicts_with = "check")]
    diff: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}
