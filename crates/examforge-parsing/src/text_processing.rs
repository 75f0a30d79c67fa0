use once_cell::sync::Lazy;
use regex::Regex;

pub use examforge_core::text_utils::expand_ligatures;

/// Normalise raw source text before segmentation.
///
/// - `\r\n` and lone `\r` become `\n`
/// - form feeds (pdftotext page breaks) become `\n`
/// - ligatures are expanded
pub fn normalize_source_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace(['\r', '\u{000C}'], "\n");
    expand_ligatures(&text)
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    RE.replace_all(text, " ").trim().to_string()
}
