//! Output side of examforge: writes reconciled records as JSON or as a
//! JavaScript module, and summarizes the topic distribution.

use thiserror::Error;

pub mod export;
pub mod summary;
pub mod types;

pub use export::{DEFAULT_EXPORT_NAME, export_js_module, export_json, export_records};
pub use summary::TopicSummary;
pub use types::ExportFormat;

#[derive(Error, Debug)]
pub enum ReportingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
