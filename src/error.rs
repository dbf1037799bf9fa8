use std::path::PathBuf;

use thiserror::Error;

use crate::processors::SchemaViolation;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings file error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("{0}")]
    Schema(#[from] SchemaViolation),

    #[error("Column '{column}' has no valid values to interpolate from")]
    UnrecoverableGap { column: &'static str },

    #[error("Silver series has {rows} days, gold features need at least {required}")]
    InsufficientHistory { rows: usize, required: usize },

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}
