use log::debug;
use md_toc_config::TocConfig;
use md_toc_outline::split_number_prefix;

use crate::anchors::anchor_slug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocItem {
    pub depth: usize,
    pub text: String,
    pub anchor: String,
}

impl TocItem {
    /// Build the list item for a numbered chapter name such as `"2.1 Setup"`.
    ///
    /// The depth is the number of dots in the leading chapter number.
    pub fn from_chapter_name(name: &str) -> Self {
        let depth = split_number_prefix(name)
            .map(|(number, _)| number.matches('.').count())
            .unwrap_or(0);

        TocItem {
            depth,
            text: name.to_string(),
            anchor: anchor_slug(name),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}- [{}](#{})",
            "  ".repeat(self.depth),
            self.text,
            self.anchor
        )
    }
}

pub fn generate_items<S: AsRef<str>>(chapter_names: &[S]) -> Vec<TocItem> {
    chapter_names
        .iter()
        .map(|name| TocItem::from_chapter_name(name.as_ref()))
        .collect()
}

pub fn render_items_with_separator(items: &[TocItem], line_sep: &str) -> String {
    items
        .iter()
        .map(TocItem::render)
        .collect::<Vec<_>>()
        .join(line_sep)
}

/// Render the complete marker-delimited TOC block for the given chapters.
///
/// The block always carries the title heading; with no chapters the item
/// section is an empty line.
pub fn render_block<S: AsRef<str>>(chapter_names: &[S], config: &TocConfig) -> String {
    let items = generate_items(chapter_names);
    format!(
        "{}\n## {}\n{}\n{}",
        config.begin_marker,
        config.title,
        render_items_with_separator(&items, "\n"),
        config.end_marker
    )
}

/// Collapse a previously generated block back into the placeholder.
///
/// The region runs from the first begin marker to the last end marker after
/// it. Returns `None` when no complete block exists.
pub fn collapse_block(contents: &str, config: &TocConfig) -> Option<String> {
    let start = contents.find(&config.begin_marker)?;
    let body_start = start + config.begin_marker.len();
    let end = body_start + contents[body_start..].rfind(&config.end_marker)?;
    let stop = end + config.end_marker.len();

    debug!(
        "collapsing generated TOC spanning bytes {start}..{stop} into {}",
        config.placeholder
    );

    let mut collapsed =
        String::with_capacity(contents.len() - (stop - start) + config.placeholder.len());
    collapsed.push_str(&contents[..start]);
    collapsed.push_str(&config.placeholder);
    collapsed.push_str(&contents[stop..]);
    Some(collapsed)
}

/// Replace every placeholder occurrence with `block`, returning the new text
/// and the number of substitutions made.
pub fn substitute_placeholder(contents: &str, placeholder: &str, block: &str) -> (String, usize) {
    let count = contents.matches(placeholder).count();
    if count == 0 {
        return (contents.to_string(), 0);
    }
    debug!("substituting {count} TOC placeholder(s)");
    (contents.replace(placeholder, block), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn item_indent_follows_number_depth() {
        let item = TocItem::from_chapter_name("1.0.1 Deep");
        assert_eq!(item.depth, 2);
        assert_eq!(item.render(), "    - [1.0.1 Deep](#101-deep)");
    }

    #[test]
    fn unnumbered_name_renders_flush_left() {
        let item = TocItem::from_chapter_name("Loose");
        assert_eq!(item.render(), "- [Loose](#loose)");
    }

    #[test]
    fn block_layout() {
        let names = ["1 Intro", "1.1 Setup", "2 Usage"];
        let block = render_block(&names, &TocConfig::default().with_title("Contents"));
        assert_eq!(
            block,
            "$%TOC_BEGIN$\n## Contents\n- [1 Intro](#1-intro)\n  - [1.1 Setup](#11-setup)\n- [2 Usage](#2-usage)\n$%TOC_END$"
        );
    }

    #[test]
    fn block_without_chapters_keeps_title_only() {
        let names: [&str; 0] = [];
        let block = render_block(&names, &TocConfig::default());
        assert_eq!(block, "$%TOC_BEGIN$\n## Table of content\n\n$%TOC_END$");
    }

    #[test]
    fn collapse_spans_first_begin_to_last_end() {
        let config = TocConfig::default();
        let text = "a\n$%TOC_BEGIN$\nx\n$%TOC_END$\nb\n$%TOC_END$\nc";
        assert_eq!(collapse_block(text, &config).unwrap(), "a\n[TOC]\nc");
    }

    #[test]
    fn collapse_requires_both_markers() {
        let config = TocConfig::default();
        assert!(collapse_block("$%TOC_BEGIN$ only", &config).is_none());
        assert!(collapse_block("$%TOC_END$ then $%TOC_BEGIN$", &config).is_none());
        assert!(collapse_block("nothing here", &config).is_none());
    }

    #[test]
    fn substitutes_every_placeholder() {
        let (text, count) = substitute_placeholder("[TOC]\nbody\n[TOC]", "[TOC]", "X");
        assert_eq!(text, "X\nbody\nX");
        assert_eq!(count, 2);

        let (text, count) = substitute_placeholder("body", "[TOC]", "X");
        assert_eq!(text, "body");
        assert_eq!(count, 0);
    }
}
