use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a file into a `SalesDataset`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet file: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("unexpected column layout: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse '{value}' as a date")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}, column '{column}': {reason} (got '{value}')")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
        reason: &'static str,
    },
}
