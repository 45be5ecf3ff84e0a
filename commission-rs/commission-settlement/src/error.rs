//! Settlement error types.
//!
//! Every failure mode has a named variant. No stringly-typed errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("invalid period '{0}': expected YYYY-MM or a free-form label")]
    InvalidPeriod(String),

    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("template has no page {page} (pages: {available})")]
    TemplatePageMissing { page: u32, available: usize },

    #[error("unsupported template: {0}")]
    UnsupportedTemplate(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for settlement operations.
pub type SettlementResult<T> = Result<T, SettlementError>;
