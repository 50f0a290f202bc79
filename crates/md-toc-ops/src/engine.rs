use std::borrow::Cow;

use log::debug;
use md_toc_config::TocConfig;
use md_toc_outline::{Chapter, LevelSkip, OutlineBuilder};

use crate::toc::{collapse_block, render_block, substitute_placeholder};

/// Result of numbering a document and regenerating its TOC.
#[derive(Debug, Clone)]
pub struct Generated {
    pub content: String,
    pub chapters: Vec<Chapter>,
    pub warnings: Vec<LevelSkip>,
    /// Whether a previously generated block was collapsed first.
    pub replaced_block: bool,
    pub placeholders: usize,
}

impl Generated {
    pub fn chapter_names(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Number every chapter in `contents` and splice a fresh TOC over the placeholder.
///
/// Line endings are normalised to `\n` before anything else happens.
pub fn generate_toc(contents: &str, config: &TocConfig) -> Generated {
    let contents = normalize_newlines(contents);

    let (contents, replaced_block) = match collapse_block(&contents, config) {
        Some(collapsed) => (Cow::Owned(collapsed), true),
        None => (contents, false),
    };

    let lines: Vec<&str> = contents.split('\n').collect();
    let outline = OutlineBuilder::new(config.min_level).build(&lines);
    debug!(
        "numbered {} chapter(s) across {} line(s)",
        outline.chapters.len(),
        lines.len()
    );

    let block = render_block(&outline.chapter_names(), config);
    let rewritten = outline.lines.join("\n");
    let (content, placeholders) = substitute_placeholder(&rewritten, &config.placeholder, &block);

    Generated {
        content,
        chapters: outline.chapters,
        warnings: outline.warnings,
        replaced_block,
        placeholders,
    }
}

fn normalize_newlines(contents: &str) -> Cow<'_, str> {
    if contents.contains('\r') {
        Cow::Owned(contents.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_headers_and_inserts_block() {
        let input = "# Guide\n[TOC]\n## Intro\n### Setup\n## Usage\n";
        let generated = generate_toc(input, &TocConfig::default());

        assert_eq!(
            generated.content,
            "# Guide\n$%TOC_BEGIN$\n## Table of content\n- [1 Intro](#1-intro)\n  - [1.1 Setup](#11-setup)\n- [2 Usage](#2-usage)\n$%TOC_END$\n## 1 Intro\n### 1.1 Setup\n## 2 Usage\n"
        );
        assert_eq!(generated.placeholders, 1);
        assert!(!generated.replaced_block);
    }

    #[test]
    fn second_run_is_identical() {
        let config = TocConfig::default();
        let first = generate_toc("[TOC]\n## A\n#### B\n## C", &config);
        let second = generate_toc(&first.content, &config);

        assert_eq!(first.content, second.content);
        assert!(second.replaced_block);
        assert_eq!(second.chapter_names(), vec!["1 A", "1.0.1 B", "2 C"]);
    }

    #[test]
    fn crlf_input_is_normalised() {
        let generated = generate_toc("## A\r\ntext\r\n", &TocConfig::default());
        assert_eq!(generated.content, "## 1 A\ntext\n");
    }

    #[test]
    fn document_without_placeholder_is_only_renumbered() {
        let generated = generate_toc("## A\n## B", &TocConfig::default());
        assert_eq!(generated.content, "## 1 A\n## 2 B");
        assert_eq!(generated.placeholders, 0);
    }
}
