use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;
pub mod reconcile;
pub mod text_utils;
pub mod topic;

// Re-export for convenience
pub use backend::{BackendError, TextExtractor};
pub use reconcile::{
    ReconcileConfig, ReconcileOutcome, ReconcileStats, Resolution, ResolutionSource, ReviewFlag,
    ReviewKind, reconcile, resolve_correct_index,
};
pub use topic::{TOPIC_TABLE, Topic, classify_topic};

/// Number of answer options every usable question carries (labels A–D).
pub const OPTION_COUNT: usize = 4;

/// Option labels in output order.
pub const OPTION_LABELS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

/// A question recovered from the question-source document.
///
/// Only complete blocks exist as values of this type: a segment that did not
/// yield all four options is dropped by the parser rather than padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuestionBlock {
    pub ordinal: u32,
    pub question: String,
    pub options: [String; OPTION_COUNT],
}

/// An answer entry recovered from the answer-source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAnswerBlock {
    pub ordinal: u32,
    /// Restated question text. Informational only; the question source is authoritative.
    pub question: String,
    /// Free-form answer statement following the `ans-` marker.
    pub answer: String,
    /// Option letter detected opportunistically while parsing (`A`–`D`).
    pub detected_letter: Option<char>,
    /// Explanation text; equals `answer` when the block has no separate explanation.
    pub explanation: String,
}

/// A fully reconciled exam question. This is the only persisted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: u32,
    pub topic: Topic,
    pub question: String,
    pub options: [String; OPTION_COUNT],
    /// Zero-based index into `options` (0 = A .. 3 = D).
    pub correct_answer: usize,
    pub explanation: String,
}
