// src/error.rs
//! Error kinds reported to the user.
//!
//! Both enums are `Clone` because they travel inside UI messages, so the
//! underlying library errors are carried as rendered text.

use thiserror::Error;

use crate::data_types::SourceFormat;

/// Why a file could not become the new table. The current table is kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Could not read {file_name}: {message}")]
    Io { file_name: String, message: String },

    #[error("{format} parse error: {message}")]
    Parse {
        format: SourceFormat,
        message: String,
    },

    #[error("Unsupported file type: {file_name} (choose a .csv or .json file)")]
    UnsupportedFormat { file_name: String },
}

impl LoadError {
    pub fn parse(format: SourceFormat, err: impl std::fmt::Display) -> Self {
        LoadError::Parse {
            format,
            message: err.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("Could not serialize report: {0}")]
    Serialize(String),

    #[error("Could not write report: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialize(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}
