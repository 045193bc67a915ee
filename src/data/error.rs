use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the listings file. Always fatal for the dashboard.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("malformed file: {0}")]
    Malformed(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}
