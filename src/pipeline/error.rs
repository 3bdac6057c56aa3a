//! Error types for persona segmentation.

use thiserror::Error;

/// Errors produced while ingesting records, building the segment table,
/// or looking up a persona.
#[derive(Error, Debug)]
pub enum SegmentError {
    /// No customer group matches the requested composite key.
    #[error("No customer group found for key '{key}'{}", format_suggestions(.suggestions))]
    NotFound {
        key: String,
        /// Known keys sharing the same country/platform prefix
        suggestions: Vec<String>,
    },

    /// Age falls outside (0, 70] and the policy rejects such rows.
    #[error("Age {age} in row {row} is outside the classified range (0, 70]")]
    AgeOutOfRange { row: usize, age: i64 },

    /// A persona query's age falls outside (0, 70] and the policy rejects it.
    #[error("Age {age} is outside the classified range (0, 70]")]
    QueryAgeOutOfRange { age: i64 },

    /// A required input column is absent.
    #[error("Required column '{column}' not found. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A cell failed ingestion validation.
    #[error("Invalid value in column '{column}' at row {row}: {message}")]
    InvalidValue {
        column: String,
        row: usize,
        message: String,
    },

    /// The dataset contains no records.
    #[error("Dataset contains no records")]
    EmptyDataset,

    #[error("Data frame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type SegmentResult<T> = Result<T, SegmentError>;

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(". Did you mean: {}?", suggestions.join(", "))
    }
}
