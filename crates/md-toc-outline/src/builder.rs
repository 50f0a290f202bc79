use std::fmt;

use log::{info, warn};

use crate::header::detect_header;
use crate::index::ChapterIndex;

/// A numbered header at or below the configured minimum level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Zero-based line index within the scanned document.
    pub line: usize,
    pub level: usize,
    /// Counters from the minimum level down to this chapter.
    pub number: Vec<usize>,
    /// Header text with any previous numbering removed.
    pub title: String,
    /// `number` joined with `.`, a space, then `title`.
    pub name: String,
}

impl Chapter {
    /// Nesting depth below the minimum level; `0` for top-level chapters.
    pub fn depth(&self) -> usize {
        self.number.len().saturating_sub(1)
    }

    pub fn heading_line(&self) -> String {
        format!("{} {}", "#".repeat(self.level), self.name)
    }
}

/// A header that descends more than one level below its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSkip {
    pub line: usize,
    pub level: usize,
    pub expected: usize,
    pub raw_name: String,
}

impl fmt::Display for LevelSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level ({}) of chapter \"{}\" is larger than expected ({})",
            self.level, self.raw_name, self.expected
        )
    }
}

/// Chapters and warnings collected by a single scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    pub chapters: Vec<Chapter>,
    pub warnings: Vec<LevelSkip>,
}

/// Result of numbering a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub chapters: Vec<Chapter>,
    pub warnings: Vec<LevelSkip>,
    /// Document lines with chapter headers replaced by their numbered form.
    pub lines: Vec<String>,
}

impl Outline {
    pub fn chapter_names(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OutlineBuilder {
    min_level: usize,
    start_line: usize,
}

impl OutlineBuilder {
    pub fn new(min_level: usize) -> Self {
        Self {
            min_level,
            start_line: 0,
        }
    }

    /// Skip the first `line` lines. Skipped lines are neither numbered nor emitted.
    pub fn starting_at(mut self, line: usize) -> Self {
        self.start_line = line;
        self
    }

    /// Number every chapter and rewrite the header lines in one pass.
    pub fn build<S: AsRef<str>>(&self, lines: &[S]) -> Outline {
        let mut index = ChapterIndex::new(self.min_level);
        let mut rewritten = Vec::with_capacity(lines.len().saturating_sub(self.start_line));
        let Scan { chapters, warnings } = self.scan(lines, &mut index, Some(&mut rewritten));

        Outline {
            chapters,
            warnings,
            lines: rewritten,
        }
    }

    /// Number every chapter without producing rewritten lines.
    pub fn chapters<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Chapter> {
        let mut index = ChapterIndex::new(self.min_level);
        self.scan(lines, &mut index, None).chapters
    }

    /// Scan from the start line, advancing `index` for each chapter.
    ///
    /// When `output` is given, every scanned line is appended to it in order:
    /// chapter headers in numbered form, everything else unchanged.
    pub fn scan<S: AsRef<str>>(
        &self,
        lines: &[S],
        index: &mut ChapterIndex,
        mut output: Option<&mut Vec<String>>,
    ) -> Scan {
        let mut scan = Scan::default();

        for (line_idx, line) in lines.iter().enumerate().skip(self.start_line) {
            let line = line.as_ref();
            let header = detect_header(line).filter(|header| header.level >= self.min_level);

            let Some(header) = header else {
                if let Some(out) = output.as_deref_mut() {
                    out.push(line.to_string());
                }
                continue;
            };

            if let Some(expected) = index.enter(header.level) {
                let skip = LevelSkip {
                    line: line_idx,
                    level: header.level,
                    expected,
                    raw_name: header.raw_name.to_string(),
                };
                warn!("line {}: {skip}", line_idx + 1);
                scan.warnings.push(skip);
            }

            let title = header.title();
            let number = index.path().to_vec();
            let name = format!("{} {title}", index.dotted());
            info!("{name}");

            let chapter = Chapter {
                line: line_idx,
                level: header.level,
                number,
                title: title.to_string(),
                name,
            };

            if let Some(out) = output.as_deref_mut() {
                out.push(chapter.heading_line());
            }
            scan.chapters.push(chapter);
        }

        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    #[test]
    fn rewrites_headers_and_keeps_other_lines() {
        let lines = doc("# Title\n\n## Intro\ntext\n### Details\n## Usage");
        let outline = OutlineBuilder::new(2).build(&lines);

        assert_eq!(
            outline.lines,
            vec![
                "# Title",
                "",
                "## 1 Intro",
                "text",
                "### 1.1 Details",
                "## 2 Usage"
            ]
        );
        assert_eq!(outline.chapter_names(), vec!["1 Intro", "1.1 Details", "2 Usage"]);
        assert!(outline.warnings.is_empty());
    }

    #[test]
    fn chapter_records_position_and_number() {
        let lines = doc("## A\n\n### B");
        let chapters = OutlineBuilder::new(2).chapters(&lines);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].line, 2);
        assert_eq!(chapters[1].level, 3);
        assert_eq!(chapters[1].number, vec![1, 1]);
        assert_eq!(chapters[1].title, "B");
        assert_eq!(chapters[1].depth(), 1);
    }

    #[test]
    fn level_skip_is_reported_not_fatal() {
        let lines = doc("## Top\n#### Deep");
        let outline = OutlineBuilder::new(2).build(&lines);

        assert_eq!(outline.chapter_names(), vec!["1 Top", "1.0.1 Deep"]);
        assert_eq!(outline.warnings.len(), 1);
        assert_eq!(
            outline.warnings[0].to_string(),
            "level (4) of chapter \"Deep\" is larger than expected (3)"
        );
    }

    #[test]
    fn warning_quotes_the_unstripped_name() {
        let lines = doc("## 1 Top\n#### 1.0.1 Deep");
        let outline = OutlineBuilder::new(2).build(&lines);
        assert_eq!(outline.warnings[0].raw_name, "1.0.1 Deep");
    }

    #[test]
    fn numbering_is_stable_on_numbered_input() {
        let lines = doc("## Intro\n### Setup\n## Usage");
        let first = OutlineBuilder::new(2).build(&lines);
        let second = OutlineBuilder::new(2).build(&first.lines);
        assert_eq!(first.lines, second.lines);
    }

    #[test]
    fn min_level_one_numbers_top_headers() {
        let lines = doc("# A\n## B\n# C");
        let outline = OutlineBuilder::new(1).build(&lines);
        assert_eq!(outline.chapter_names(), vec!["1 A", "1.1 B", "2 C"]);
    }

    #[test]
    fn shared_index_continues_across_scans() {
        let lines = doc("## A\n## B");
        let builder = OutlineBuilder::new(2);
        let mut index = ChapterIndex::new(2);

        builder.scan(&lines, &mut index, None);
        let again = builder.scan(&lines, &mut index, None);

        let names: Vec<_> = again.chapters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["3 A", "4 B"]);
    }

    #[test]
    fn start_offset_skips_leading_lines() {
        let lines = doc("## Ignored\nbody\n## Counted");
        let outline = OutlineBuilder::new(2).starting_at(1).build(&lines);

        assert_eq!(outline.lines, vec!["body", "## 1 Counted"]);
        assert_eq!(outline.chapters[0].line, 2);
    }

    #[test]
    fn empty_document_has_no_chapters() {
        let outline = OutlineBuilder::new(2).build(&doc(""));
        assert!(outline.chapters.is_empty());
        assert_eq!(outline.lines, vec![""]);
    }
}
