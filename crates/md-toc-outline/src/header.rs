use std::sync::OnceLock;

use regex::Regex;

/// An ATX header line: a run of `#`, whitespace, then the header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLine<'a> {
    pub level: usize,
    /// Text after the marker, trailing whitespace included.
    pub raw_name: &'a str,
}

impl<'a> HeaderLine<'a> {
    /// Header text without a previously assigned chapter number.
    pub fn title(&self) -> &'a str {
        strip_number_prefix(self.raw_name)
    }
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(#+)\s+(.*)\s*$").expect("header pattern compiles"))
}

fn numbered_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([.\d]+)\s+(.*)$").expect("number pattern compiles"))
}

/// Recognise a header line. Setext underlines and indented markers are not headers here.
pub fn detect_header(line: &str) -> Option<HeaderLine<'_>> {
    let captures = header_pattern().captures(line)?;
    let hashes = captures.get(1)?;
    let raw_name = captures.get(2).map_or("", |m| m.as_str());

    Some(HeaderLine {
        level: hashes.as_str().len(),
        raw_name,
    })
}

/// Split `"2.3 Name"` into `("2.3", "Name")`. Names without a numeric prefix yield `None`.
pub fn split_number_prefix(name: &str) -> Option<(&str, &str)> {
    let captures = numbered_pattern().captures(name)?;
    let number = captures.get(1)?.as_str();
    let rest = captures.get(2).map_or("", |m| m.as_str());
    Some((number, rest))
}

pub fn strip_number_prefix(name: &str) -> &str {
    split_number_prefix(name).map_or(name, |(_, rest)| rest)
}
