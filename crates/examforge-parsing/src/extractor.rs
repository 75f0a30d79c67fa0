use std::path::Path;

use examforge_core::{BackendError, ReconcileOutcome, TextExtractor, reconcile};

use crate::ParsingError;
use crate::answers::{AnswerParse, parse_answer_source_with_config};
use crate::config::ParsingConfig;
use crate::questions::{QuestionParse, parse_question_source_with_config};

/// Both parsed sources together with the reconciled records.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    pub questions: QuestionParse,
    pub answers: AnswerParse,
    pub outcome: ReconcileOutcome,
}

/// Question-source text as returned by a [`TextExtractor`].
///
/// When the extraction tool is missing or fails, `text` is empty and
/// `degraded` carries the backend error so the caller can report it.
#[derive(Debug)]
pub struct ExtractedText {
    pub text: String,
    pub degraded: Option<BackendError>,
}

/// A configurable question-bank pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each stage as a method. The default
/// constructor uses built-in defaults; use [`QuestionBankExtractor::with_config`]
/// to supply custom markers and thresholds.
pub struct QuestionBankExtractor {
    config: ParsingConfig,
}

impl Default for QuestionBankExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionBankExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Parse the question-source text (stage 1).
    pub fn parse_questions(&self, text: &str) -> QuestionParse {
        parse_question_source_with_config(text, &self.config)
    }

    /// Parse the answer-source text (stage 2).
    pub fn parse_answers(&self, text: &str) -> AnswerParse {
        parse_answer_source_with_config(text, &self.config)
    }

    /// Run both parsers and reconcile their output.
    pub fn build(&self, question_text: &str, answer_text: &str) -> QuestionBank {
        let questions = self.parse_questions(question_text);
        let answers = self.parse_answers(answer_text);
        let outcome = reconcile(&questions.blocks, &answers.blocks, &self.config.reconcile);
        QuestionBank {
            questions,
            answers,
            outcome,
        }
    }

    /// Read the answer document from disk and build the bank.
    ///
    /// `question_text` is usually the output of [`extract_question_text`].
    pub fn build_from_answer_file(
        &self,
        question_text: &str,
        answer_path: &Path,
    ) -> Result<QuestionBank, ParsingError> {
        let answer_text = std::fs::read_to_string(answer_path)?;
        Ok(self.build(question_text, &answer_text))
    }
}

/// Extract the question-source text through `backend`.
///
/// A missing or failing extraction tool is not fatal: the text is empty and
/// the error is returned in [`ExtractedText::degraded`]. I/O errors are
/// propagated.
pub fn extract_question_text(
    path: &Path,
    backend: &dyn TextExtractor,
) -> Result<ExtractedText, ParsingError> {
    match backend.extract_text(path) {
        Ok(text) => Ok(ExtractedText {
            text,
            degraded: None,
        }),
        Err(err @ (BackendError::ToolMissing(_) | BackendError::ToolFailed { .. })) => {
            tracing::warn!(path = %path.display(), error = %err, "continuing without question text");
            Ok(ExtractedText {
                text: String::new(),
                degraded: Some(err),
            })
        }
        Err(err) => Err(err.into()),
    }
}
