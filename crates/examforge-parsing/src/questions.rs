use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use examforge_core::{OPTION_COUNT, OPTION_LABELS, RawQuestionBlock};

use crate::config::ParsingConfig;
use crate::text_processing::{collapse_whitespace, normalize_source_text};

/// Counts of what the question parser saw and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionParseStats {
    /// Segments started by a question marker.
    pub segments: usize,
    /// Segments without the sub-label line before the body.
    pub missing_sub_label: usize,
    /// Segments where the question text or one of the four options was not found.
    pub missing_options: usize,
}

/// Result of parsing a question-source document.
#[derive(Debug, Clone, Default)]
pub struct QuestionParse {
    pub blocks: BTreeMap<u32, RawQuestionBlock>,
    pub stats: QuestionParseStats,
}

/// Parse question-source text into ordinal-keyed blocks.
pub fn parse_question_source(text: &str) -> QuestionParse {
    parse_question_source_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`parse_question_source`].
pub(crate) fn parse_question_source_with_config(
    text: &str,
    config: &ParsingConfig,
) -> QuestionParse {
    static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Question\s+#(\d+)").unwrap());

    let marker_re = config.question_marker_re.as_ref().unwrap_or(&MARKER_RE);

    let text = normalize_source_text(text);
    let mut parse = QuestionParse::default();
    for (ordinal, segment) in split_segments(&text, marker_re) {
        parse.stats.segments += 1;

        let Some(body) = segment_body(segment, config) else {
            parse.stats.missing_sub_label += 1;
            tracing::debug!(ordinal, "dropping question segment: no sub-label line");
            continue;
        };

        match parse_question_body(body) {
            Some((question, options)) => {
                if parse.blocks.contains_key(&ordinal) {
                    tracing::debug!(ordinal, "duplicate question ordinal, keeping the later one");
                }
                parse.blocks.insert(
                    ordinal,
                    RawQuestionBlock {
                        ordinal,
                        question,
                        options,
                    },
                );
            }
            None => {
                parse.stats.missing_options += 1;
                tracing::debug!(ordinal, "dropping question segment: incomplete options");
            }
        }
    }

    tracing::info!(
        segments = parse.stats.segments,
        blocks = parse.blocks.len(),
        "parsed question source"
    );
    parse
}

/// Split text at each marker. A segment runs from the end of one marker to
/// the start of the next, or to the end of the text.
///
/// Markers whose ordinal does not fit a `u32` are skipped together with
/// their segment.
fn split_segments<'a>(text: &'a str, marker_re: &Regex) -> Vec<(u32, &'a str)> {
    let caps: Vec<_> = marker_re.captures_iter(text).collect();

    let mut segments = Vec::new();
    for (i, cap) in caps.iter().enumerate() {
        let Some(whole) = cap.get(0) else { continue };
        let end = caps
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        let Some(ordinal) = cap.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
            continue;
        };
        segments.push((ordinal, &text[whole.end()..end]));
    }
    segments
}

/// Body of a segment: everything after the sub-label line, trimmed.
fn segment_body<'a>(segment: &'a str, config: &ParsingConfig) -> Option<&'a str> {
    static TOPIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Topic\s+\d+\s*\n").unwrap());

    let topic_re = config.topic_label_re.as_ref().unwrap_or(&TOPIC_RE);
    topic_re.find(segment).map(|m| segment[m.end()..].trim())
}

/// Option label at the start of a line: `A.` or `A)`.
static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*([A-D])[.)]").unwrap());

/// Position of the first `label` line at or after `from`, as (start, end).
fn find_label(body: &str, from: usize, label: char) -> Option<(usize, usize)> {
    LABEL_RE
        .captures_iter(&body[from..])
        .find(|caps| caps[1].starts_with(label))
        .and_then(|caps| caps.get(0))
        .map(|m| (from + m.start(), from + m.end()))
}

/// Split a question body into its question text and four options.
///
/// Labels are searched in order A, B, C, D, each after the previous one, so a
/// stray `C.` before `B.` does not count. Returns `None` unless all four
/// are found.
pub(crate) fn parse_question_body(body: &str) -> Option<(String, [String; OPTION_COUNT])> {
    let mut spans: Vec<(usize, usize)> = Vec::with_capacity(OPTION_COUNT);
    let mut cursor = 0;
    for label in OPTION_LABELS {
        let span = find_label(body, cursor, label)?;
        cursor = span.1;
        spans.push(span);
    }

    let question = collapse_whitespace(&body[..spans[0].0]);

    let options: [String; OPTION_COUNT] = std::array::from_fn(|i| {
        let start = spans[i].1;
        let end = spans.get(i + 1).map(|s| s.0).unwrap_or(body.len());
        collapse_whitespace(&body[start..end])
    });

    Some((question, options))
}
