//! Shared test harness utilities for md-toc crates.

use std::fs;
use std::path::{Path, PathBuf};

use md_toc_config::TocConfig;

/// A document exercising nesting, a skipped level, a sub-threshold title,
/// stale numbering, and the TOC placeholder.
pub const SAMPLE_DOCUMENT: &str = "\
# Handbook

[TOC]

## Overview
Intro text.

### Goals

### 7.3 Non-Goals

## Getting Started & Setup

#### Prerequisites

## Usage
";

/// Returns a baseline configuration for tests.
pub fn test_config() -> TocConfig {
    TocConfig::default()
}

/// Write `contents` to `dir/relative`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(&path, contents).expect("write file");
    path
}
