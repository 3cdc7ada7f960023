//! Filename and keyword normalization.

use std::sync::OnceLock;

use regex::Regex;

fn separator_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_.]+").expect("valid separator pattern"))
}

/// Normalizes a filename for matching and display: strips the extension and
/// collapses `-`, `_`, and `.` runs into single spaces.
///
/// `"cat_meme.mp4"` becomes `"cat meme"`.
pub fn clean_filename(name: &str) -> String {
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    let spaced = separator_runs().replace_all(stem, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a keyword as entered by an admin: trimmed and lower-cased.
pub fn normalize_keyword(text: &str) -> String {
    text.trim().to_lowercase()
}
