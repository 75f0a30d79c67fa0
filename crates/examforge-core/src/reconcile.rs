//! Joins parsed question and answer blocks on their ordinal and decides which
//! option is correct for each question.
//!
//! Resolution is an ordered chain of resolvers, each returning an optional raw
//! option offset. The first resolver that answers wins. After the chain, the
//! explanation override runs as a separate post-check: a `correct answer X`
//! phrase in the explanation replaces whatever the chain decided. When the
//! two disagree the record keeps the override and is flagged for review.

use std::collections::BTreeMap;

use crate::text_utils::{
    char_prefix, clamp_index, correct_answer_letter, leading_option_letter, letter_offset,
    word_set,
};
use crate::topic::{Topic, classify_topic};
use crate::{OPTION_COUNT, RawAnswerBlock, RawQuestionBlock, Record};

/// Tunables for answer resolution.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Number of leading characters compared in the fuzzy containment test.
    pub fuzzy_prefix_chars: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            fuzzy_prefix_chars: 50,
        }
    }
}

/// Which heuristic produced a record's correct-option index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    ExplanationOverride,
    StatementLetter,
    BlockPhrase,
    FuzzyMatch,
    Default,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExplanationOverride => "explanation override",
            Self::StatementLetter => "statement letter",
            Self::BlockPhrase => "answer block phrase",
            Self::FuzzyMatch => "fuzzy match",
            Self::Default => "default",
        }
    }
}

/// Outcome of resolving one question's correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Final index, always in `0..OPTION_COUNT`.
    pub index: usize,
    pub source: ResolutionSource,
    /// Index the resolver chain produced before the explanation override
    /// replaced it with a different one.
    pub overridden: Option<usize>,
}

/// Why a record needs a human to look at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewKind {
    /// The explanation override contradicted the resolver chain.
    OverrideDisagreement {
        chain_index: usize,
        override_index: usize,
    },
    /// The answer source has no block for this ordinal.
    MissingAnswer,
    /// An answer block exists but no heuristic resolved an option.
    DefaultedIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFlag {
    pub ordinal: u32,
    pub kind: ReviewKind,
}

/// Per-source resolution counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub explanation_override: usize,
    pub statement_letter: usize,
    pub block_phrase: usize,
    pub fuzzy_match: usize,
    /// Answer block present but nothing resolved; one per `DefaultedIndex` flag.
    pub defaulted: usize,
    /// No answer block for the ordinal. Not counted under any source.
    pub missing_answer: usize,
}

impl ReconcileStats {
    fn record(&mut self, source: ResolutionSource) {
        match source {
            ResolutionSource::ExplanationOverride => self.explanation_override += 1,
            ResolutionSource::StatementLetter => self.statement_letter += 1,
            ResolutionSource::BlockPhrase => self.block_phrase += 1,
            ResolutionSource::FuzzyMatch => self.fuzzy_match += 1,
            ResolutionSource::Default => self.defaulted += 1,
        }
    }
}

/// Everything one reconciliation run produces.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// Records in ascending ordinal order.
    pub records: Vec<Record>,
    /// How each record's correct option was decided, keyed by ordinal and in
    /// the same order as `records`.
    pub resolutions: Vec<(u32, Resolution)>,
    pub topic_counts: BTreeMap<Topic, usize>,
    pub review_flags: Vec<ReviewFlag>,
    pub stats: ReconcileStats,
}

/// Inputs visible to every resolver.
struct ResolverInput<'a> {
    statement: &'a str,
    detected_letter: Option<char>,
    options: &'a [String; OPTION_COUNT],
    fuzzy_prefix_chars: usize,
}

type Resolver = fn(&ResolverInput<'_>) -> Option<i64>;

/// Resolver chain in precedence order. The explanation override is not part
/// of the chain; see [`resolve_correct_index`].
const RESOLVER_CHAIN: &[(ResolutionSource, Resolver)] = &[
    (ResolutionSource::StatementLetter, statement_letter),
    (ResolutionSource::BlockPhrase, block_phrase),
    (ResolutionSource::FuzzyMatch, fuzzy_match),
];

fn statement_letter(input: &ResolverInput<'_>) -> Option<i64> {
    leading_option_letter(input.statement).map(letter_offset)
}

fn block_phrase(input: &ResolverInput<'_>) -> Option<i64> {
    input.detected_letter.map(letter_offset)
}

/// Containment test on the leading characters, then shared-word scoring.
///
/// Only a strictly higher score replaces the current best, so ties keep the
/// lowest index and a zero score never selects anything.
fn fuzzy_match(input: &ResolverInput<'_>) -> Option<i64> {
    let answer = input.statement.trim().to_lowercase();
    let answer_prefix = char_prefix(&answer, input.fuzzy_prefix_chars);
    let answer_words = word_set(&answer);

    let mut best: Option<usize> = None;
    let mut best_score = 0;

    for (i, option) in input.options.iter().enumerate() {
        let option = option.trim().to_lowercase();
        let option_prefix = char_prefix(&option, input.fuzzy_prefix_chars);
        if !option.contains(answer_prefix) && !answer.contains(option_prefix) {
            continue;
        }

        let score = word_set(&option).intersection(&answer_words).count();
        if score > best_score {
            best_score = score;
            best = Some(i);
        }
    }

    best.map(|i| i as i64)
}

/// Resolve the correct option for one question.
///
/// `answer` is `None` when the answer source has no block for the ordinal;
/// the index then defaults to 0.
pub fn resolve_correct_index(
    options: &[String; OPTION_COUNT],
    answer: Option<&RawAnswerBlock>,
    config: &ReconcileConfig,
) -> Resolution {
    let Some(answer) = answer else {
        return Resolution {
            index: 0,
            source: ResolutionSource::Default,
            overridden: None,
        };
    };

    let input = ResolverInput {
        statement: &answer.answer,
        detected_letter: answer.detected_letter,
        options,
        fuzzy_prefix_chars: config.fuzzy_prefix_chars,
    };

    let chain = RESOLVER_CHAIN
        .iter()
        .find_map(|(source, resolver)| resolver(&input).map(|raw| (*source, clamp_index(raw))));

    match (correct_answer_letter(&answer.explanation), chain) {
        (Some(letter), chain) => {
            let index = clamp_index(letter_offset(letter));
            let overridden = chain
                .map(|(_, chain_index)| chain_index)
                .filter(|&chain_index| chain_index != index);
            Resolution {
                index,
                source: ResolutionSource::ExplanationOverride,
                overridden,
            }
        }
        (None, Some((source, index))) => Resolution {
            index,
            source,
            overridden: None,
        },
        (None, None) => Resolution {
            index: 0,
            source: ResolutionSource::Default,
            overridden: None,
        },
    }
}

/// Build the final record list from both parsed sources.
///
/// Every ordinal of `questions` yields exactly one record; ordinals that only
/// appear in `answers` are ignored because only the question source carries
/// options.
pub fn reconcile(
    questions: &BTreeMap<u32, RawQuestionBlock>,
    answers: &BTreeMap<u32, RawAnswerBlock>,
    config: &ReconcileConfig,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for (&ordinal, block) in questions {
        let answer = answers.get(&ordinal);
        let resolution = resolve_correct_index(&block.options, answer, config);

        match answer {
            None => {
                outcome.stats.missing_answer += 1;
                outcome.review_flags.push(ReviewFlag {
                    ordinal,
                    kind: ReviewKind::MissingAnswer,
                });
            }
            Some(_) if resolution.source == ResolutionSource::Default => {
                outcome.review_flags.push(ReviewFlag {
                    ordinal,
                    kind: ReviewKind::DefaultedIndex,
                });
            }
            Some(_) => {}
        }

        if let Some(chain_index) = resolution.overridden {
            tracing::warn!(
                ordinal,
                chain_index,
                override_index = resolution.index,
                "explanation override disagrees with resolved answer"
            );
            outcome.review_flags.push(ReviewFlag {
                ordinal,
                kind: ReviewKind::OverrideDisagreement {
                    chain_index,
                    override_index: resolution.index,
                },
            });
        }

        if answer.is_some() {
            outcome.stats.record(resolution.source);
        }
        tracing::debug!(
            ordinal,
            index = resolution.index,
            source = resolution.source.as_str(),
            "resolved correct option"
        );

        let (statement, explanation) = answer
            .map(|a| (a.answer.as_str(), a.explanation.as_str()))
            .unwrap_or(("", ""));
        let explanation = if explanation.is_empty() {
            statement.to_string()
        } else {
            explanation.to_string()
        };

        let topic = classify_topic(&block.question, &explanation);
        *outcome.topic_counts.entry(topic).or_insert(0) += 1;

        outcome.records.push(Record {
            id: ordinal,
            topic,
            question: block.question.clone(),
            options: block.options.clone(),
            correct_answer: resolution.index,
            explanation,
        });
        outcome.resolutions.push((ordinal, resolution));
    }

    tracing::info!(
        records = outcome.records.len(),
        flagged = outcome.review_flags.len(),
        "reconciliation complete"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(a: &str, b: &str, c: &str, d: &str) -> [String; OPTION_COUNT] {
        [a.to_string(), b.to_string(), c.to_string(), d.to_string()]
    }

    fn answer(statement: &str, explanation: &str, letter: Option<char>) -> RawAnswerBlock {
        RawAnswerBlock {
            ordinal: 1,
            question: String::new(),
            answer: statement.to_string(),
            detected_letter: letter,
            explanation: explanation.to_string(),
        }
    }

    fn generic_options() -> [String; OPTION_COUNT] {
        options("Option one", "Option two", "Option three", "Option four")
    }

    #[test]
    fn test_explanation_override_beats_statement_letter() {
        let a = answer("A. Use a bucket policy", "Correct answer C: use an SCP.", Some('A'));
        let r = resolve_correct_index(&generic_options(), Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 2);
        assert_eq!(r.source, ResolutionSource::ExplanationOverride);
        assert_eq!(r.overridden, Some(0));
    }

    #[test]
    fn test_override_agreeing_is_not_flagged() {
        let a = answer("C. Use an SCP", "Correct answer C", Some('C'));
        let r = resolve_correct_index(&generic_options(), Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 2);
        assert_eq!(r.overridden, None);
    }

    #[test]
    fn test_statement_letter() {
        let a = answer("B) Enable versioning", "Versioning keeps old objects.", Some('B'));
        let r = resolve_correct_index(&generic_options(), Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 1);
        assert_eq!(r.source, ResolutionSource::StatementLetter);
    }

    #[test]
    fn test_block_phrase_when_statement_has_no_letter() {
        let a = answer(
            "Enable versioning on the bucket",
            "The correct is D because versioning...",
            Some('D'),
        );
        let r = resolve_correct_index(&generic_options(), Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 3);
        assert_eq!(r.source, ResolutionSource::BlockPhrase);
    }

    #[test]
    fn test_fuzzy_match_picks_most_shared_words() {
        let opts = options(
            "Use Amazon S3 Glacier",
            "Use Amazon S3 Glacier Deep Archive with lifecycle rules",
            "Use Amazon EBS snapshots",
            "Use Amazon EFS",
        );
        let a = answer("use amazon s3 glacier deep archive", "", None);
        let r = resolve_correct_index(&opts, Some(&a), &ReconcileConfig::default());
        // A and B both pass containment; B shares more words.
        assert_eq!(r.index, 1);
        assert_eq!(r.source, ResolutionSource::FuzzyMatch);
    }

    #[test]
    fn test_fuzzy_match_tie_keeps_lowest_index() {
        let opts = options(
            "Replicate with DMS",
            "Migrate with DMS tasks",
            "Migrate with DMS tasks",
            "Something else",
        );
        let a = answer("migrate with dms", "", None);
        let r = resolve_correct_index(&opts, Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 1);
    }

    #[test]
    fn test_fuzzy_match_option_prefix_in_answer() {
        let opts = options("Use KMS", "Use CloudHSM", "Use ACM", "Use IAM");
        let a = answer(
            "Use CloudHSM because the keys must stay in dedicated hardware",
            "",
            None,
        );
        let r = resolve_correct_index(&opts, Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 1);
        assert_eq!(r.source, ResolutionSource::FuzzyMatch);
    }

    #[test]
    fn test_default_when_nothing_resolves() {
        let a = answer("Something unrelated entirely", "", None);
        let r = resolve_correct_index(&generic_options(), Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 0);
        assert_eq!(r.source, ResolutionSource::Default);
    }

    #[test]
    fn test_missing_answer_defaults_to_zero() {
        let r = resolve_correct_index(&generic_options(), None, &ReconcileConfig::default());
        assert_eq!(r.index, 0);
        assert_eq!(r.source, ResolutionSource::Default);
    }

    #[test]
    fn test_corrupted_letter_is_clamped() {
        let a = answer("Plain statement", "", Some('Z'));
        let r = resolve_correct_index(&generic_options(), Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 3);

        let a = answer("Plain statement", "", Some('@'));
        let r = resolve_correct_index(&generic_options(), Some(&a), &ReconcileConfig::default());
        assert_eq!(r.index, 0);
    }

    #[test]
    fn test_reconcile_joins_on_ordinal() {
        let mut questions = BTreeMap::new();
        questions.insert(
            2,
            RawQuestionBlock {
                ordinal: 2,
                question: "Which service stores objects?".to_string(),
                options: options("S3", "EC2", "RDS", "VPC"),
            },
        );
        questions.insert(
            1,
            RawQuestionBlock {
                ordinal: 1,
                question: "Which service runs containers?".to_string(),
                options: options("EBS", "ECS", "IAM", "SQS"),
            },
        );

        let mut answers = BTreeMap::new();
        answers.insert(1, answer("B. ECS", "ECS runs containers.", Some('B')));
        answers.insert(9, answer("A. Orphan", "No question for this.", Some('A')));

        let outcome = reconcile(&questions, &answers, &ReconcileConfig::default());
        let ids: Vec<u32> = outcome.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(outcome.records[0].correct_answer, 1);
        assert_eq!(outcome.records[0].explanation, "ECS runs containers.");
        assert_eq!(outcome.records[0].topic, Topic::Compute);

        // No answer block: index 0, empty explanation, flagged.
        assert_eq!(outcome.records[1].correct_answer, 0);
        assert_eq!(outcome.records[1].explanation, "");
        assert_eq!(
            outcome.review_flags,
            vec![ReviewFlag {
                ordinal: 2,
                kind: ReviewKind::MissingAnswer
            }]
        );
        assert_eq!(outcome.stats.missing_answer, 1);
        assert_eq!(outcome.stats.statement_letter, 1);
        assert_eq!(outcome.stats.defaulted, 0);
        assert_eq!(outcome.topic_counts.values().sum::<usize>(), 2);

        let sources: Vec<(u32, ResolutionSource)> = outcome
            .resolutions
            .iter()
            .map(|(ordinal, r)| (*ordinal, r.source))
            .collect();
        assert_eq!(
            sources,
            vec![
                (1, ResolutionSource::StatementLetter),
                (2, ResolutionSource::Default)
            ]
        );
    }

    #[test]
    fn test_defaulted_count_matches_flags() {
        let mut questions = BTreeMap::new();
        for ordinal in [1, 2] {
            questions.insert(
                ordinal,
                RawQuestionBlock {
                    ordinal,
                    question: "Pick one".to_string(),
                    options: generic_options(),
                },
            );
        }
        let mut answers = BTreeMap::new();
        answers.insert(1, answer("Nothing that matches", "", None));

        let outcome = reconcile(&questions, &answers, &ReconcileConfig::default());
        let defaulted_flags = outcome
            .review_flags
            .iter()
            .filter(|f| f.kind == ReviewKind::DefaultedIndex)
            .count();
        assert_eq!(defaulted_flags, 1);
        assert_eq!(outcome.stats.defaulted, 1);
        assert_eq!(outcome.stats.missing_answer, 1);
        assert_eq!(outcome.resolutions.len(), outcome.records.len());
    }

    #[test]
    fn test_explanation_falls_back_to_statement() {
        let mut questions = BTreeMap::new();
        questions.insert(
            1,
            RawQuestionBlock {
                ordinal: 1,
                question: "Pick one".to_string(),
                options: generic_options(),
            },
        );
        let mut answers = BTreeMap::new();
        answers.insert(1, answer("D. Option four", "", Some('D')));

        let outcome = reconcile(&questions, &answers, &ReconcileConfig::default());
        assert_eq!(outcome.records[0].explanation, "D. Option four");
        assert_eq!(outcome.records[0].correct_answer, 3);
    }

    #[test]
    fn test_disagreement_is_flagged() {
        let mut questions = BTreeMap::new();
        questions.insert(
            4,
            RawQuestionBlock {
                ordinal: 4,
                question: "Pick one".to_string(),
                options: generic_options(),
            },
        );
        let mut answers = BTreeMap::new();
        answers.insert(4, answer("A. Option one", "Correct answer C", Some('A')));

        let outcome = reconcile(&questions, &answers, &ReconcileConfig::default());
        assert_eq!(outcome.records[0].correct_answer, 2);
        assert_eq!(
            outcome.review_flags,
            vec![ReviewFlag {
                ordinal: 4,
                kind: ReviewKind::OverrideDisagreement {
                    chain_index: 0,
                    override_index: 2
                }
            }]
        );
        assert_eq!(outcome.stats.explanation_override, 1);
    }
}
