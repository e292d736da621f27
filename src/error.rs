//! Per-file error taxonomy

use thiserror::Error;

/// Errors raised while sweeping a single file.
///
/// Every variant is recoverable at file granularity: the batch reports it and
/// moves on to the next file.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Error reading {format} file: {message}")]
    ParseFailure { format: &'static str, message: String },

    #[error("The file {file} is empty or could not be read properly.")]
    EmptyOrUnreadable { file: String },

    #[error("Unknown column '{column}' in {file}")]
    UnknownColumn { file: String, column: String },

    #[error("Another file named {0} was already given in this batch")]
    DuplicateName(String),

    #[error("No file named {0} in this session")]
    UnknownFile(String),

    #[error("Failed to export {file}: {message}")]
    Export { file: String, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    pub(crate) fn parse(format: &'static str, err: impl std::fmt::Display) -> Self {
        SweepError::ParseFailure {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn export(file: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SweepError::Export {
            file: file.into(),
            message: err.to_string(),
        }
    }
}

pub type SweepResult<T> = Result<T, SweepError>;
