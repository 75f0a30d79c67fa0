use thiserror::Error;

pub mod answers;
pub mod config;
pub mod extractor;
pub mod questions;
pub mod text_processing;

pub use answers::{AnswerParse, AnswerParseStats, parse_answer_source};
pub use config::{ConfigError, ParsingConfig, ParsingConfigBuilder};
pub use extractor::{ExtractedText, QuestionBank, QuestionBankExtractor, extract_question_text};
pub use questions::{QuestionParse, QuestionParseStats, parse_question_source};
// Re-export domain types from core (canonical definitions live there)
pub use examforge_core::{
    BackendError, RawAnswerBlock, RawQuestionBlock, ReconcileOutcome, Record, TextExtractor,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build a question bank from already-extracted text with default settings.
///
/// Pipeline:
/// 1. Split the question source on `Question #N` markers and recover four options
/// 2. Split the answer source on dash rules and read each `N]` block
/// 3. Join on ordinal, resolve the correct option, classify the topic
pub fn build_question_bank(question_text: &str, answer_text: &str) -> QuestionBank {
    QuestionBankExtractor::new().build(question_text, answer_text)
}
