/// Characters dropped from a chapter name before it becomes an anchor.
const STRIPPED: [char; 5] = ['.', '/', '#', '-', '&'];

/// Derive the heading anchor GitHub assigns to a numbered chapter name.
///
/// Hyphens already present in the title are dropped along with the
/// numbering dots, so `Well-Known` becomes `wellknown`.
pub fn anchor_slug(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|ch| !STRIPPED.contains(ch))
        .map(|ch| if ch == ' ' { '-' } else { ch })
        .collect();
    kept.to_lowercase()
}
