use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("text extraction tool not found: {0}")]
    ToolMissing(String),
    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Whether the failure means the extraction tool itself is unavailable.
    ///
    /// Callers treat this as recoverable: the run continues with no question text.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, BackendError::ToolMissing(_))
    }
}

/// Trait for document text extraction backends.
///
/// Implementors turn a question-source document into plain text with
/// layout-preserving line breaks; the parsing pipeline lives in
/// `examforge_parsing::QuestionBankExtractor`.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text content of a document.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}
