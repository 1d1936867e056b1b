use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmsfinError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error reading file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error reading file: line {line} has {got} fields but the header has {expected}")]
    RaggedRow { line: u64, expected: usize, got: usize },

    #[error("The uploaded file must have a column named '{0}'")]
    MissingColumn(String),

    #[error("Could not load model artifact {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("Classifier returned {got} labels for {expected} messages")]
    ClassifierMismatch { expected: usize, got: usize },

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, SmsfinError>;
