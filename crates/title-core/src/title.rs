/// Split raw multi-line input into titles: one per line, trimmed, empties
/// dropped. Order and duplicates are preserved.
pub fn parse_titles(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
