//! Evaluation error types.
//!
//! Every blocking failure mode has a named variant. Per-cell coercion
//! failures and secondary-source problems are not errors; they degrade to
//! unavailable values and warnings on the report.

use commission_kpi::CommissionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("required column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no records found for '{target}', please check the CSV file")]
    NoMatch { target: String },

    #[error(transparent)]
    Commission(#[from] CommissionError),
}

/// Result type alias for evaluation operations.
pub type EvaluationResult<T> = Result<T, EvaluationError>;
