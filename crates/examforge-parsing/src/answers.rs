use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use examforge_core::RawAnswerBlock;
use examforge_core::text_utils::{correct_phrase_letter, leading_option_letter};

use crate::config::ParsingConfig;
use crate::text_processing::{collapse_whitespace, normalize_source_text};

/// Counts of what the answer parser saw and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerParseStats {
    /// Non-empty blocks between separators.
    pub raw_blocks: usize,
    /// Blocks that do not start with `N]`.
    pub no_ordinal: usize,
    /// Kept blocks with no answer statement (token missing or nothing after it).
    pub no_answer_statement: usize,
}

/// Result of parsing an answer-source document.
#[derive(Debug, Clone, Default)]
pub struct AnswerParse {
    pub blocks: BTreeMap<u32, RawAnswerBlock>,
    pub stats: AnswerParseStats,
}

/// Parse answer-source text into ordinal-keyed blocks.
pub fn parse_answer_source(text: &str) -> AnswerParse {
    parse_answer_source_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`parse_answer_source`].
pub(crate) fn parse_answer_source_with_config(text: &str, config: &ParsingConfig) -> AnswerParse {
    static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{20,}").unwrap());
    static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ans-").unwrap());

    let separator_re = config.separator_re.as_ref().unwrap_or(&SEPARATOR_RE);
    let token_re = config.answer_token_re.as_ref().unwrap_or(&TOKEN_RE);

    let text = normalize_source_text(text);
    let mut parse = AnswerParse::default();
    for raw in separator_re.split(&text) {
        let block = raw.trim();
        if block.is_empty() {
            continue;
        }
        parse.stats.raw_blocks += 1;

        let Some((ordinal, rest)) = split_ordinal(block) else {
            parse.stats.no_ordinal += 1;
            continue;
        };

        let parsed = parse_answer_block(ordinal, block, rest, token_re);
        if parsed.answer.is_empty() && parsed.explanation.is_empty() {
            parse.stats.no_answer_statement += 1;
            tracing::debug!(ordinal, "answer block has no answer statement");
        }
        parse.blocks.insert(ordinal, parsed);
    }

    tracing::info!(
        raw_blocks = parse.stats.raw_blocks,
        blocks = parse.blocks.len(),
        "parsed answer source"
    );
    parse
}

/// Split `N] rest` into the ordinal and the remainder.
fn split_ordinal(block: &str) -> Option<(u32, &str)> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\]").unwrap());

    let caps = RE.captures(block)?;
    let ordinal = caps[1].parse().ok()?;
    let end = caps.get(0)?.end();
    Some((ordinal, &block[end..]))
}

/// End of the answer statement within `body`: the first blank line, or the
/// first line break followed by a capitalised word, or the end of `body`.
///
/// The statement always keeps at least its first character.
fn statement_end(body: &str) -> usize {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n|\n[A-Z][a-z]").unwrap());

    let Some(first) = body.chars().next() else {
        return 0;
    };
    let skip = first.len_utf8();
    RE.find(&body[skip..])
        .map(|m| skip + m.start())
        .unwrap_or(body.len())
}

fn parse_answer_block(ordinal: u32, block: &str, rest: &str, token_re: &Regex) -> RawAnswerBlock {
    let Some(token) = token_re.find(rest) else {
        return RawAnswerBlock {
            ordinal,
            question: collapse_whitespace(rest),
            detected_letter: correct_phrase_letter(block),
            ..Default::default()
        };
    };

    let question = collapse_whitespace(&rest[..token.start()]);
    let body = rest[token.end()..].trim_start();
    let end = statement_end(body);
    let answer = collapse_whitespace(&body[..end]);
    let explanation = collapse_whitespace(&body[end..]);

    let detected_letter =
        leading_option_letter(&answer).or_else(|| correct_phrase_letter(block));

    let explanation = if explanation.is_empty() {
        answer.clone()
    } else {
        explanation
    };

    RawAnswerBlock {
        ordinal,
        question,
        answer,
        detected_letter,
        explanation,
    }
}
