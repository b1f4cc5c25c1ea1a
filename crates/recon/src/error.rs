use std::fmt;

use crate::model::Side;

#[derive(Debug)]
pub enum ReconError {
    /// Cutoff outside the 0..=100 score range.
    InvalidCutoff(i64),
    /// A record has no usable value for the side's name field.
    MalformedRecord { side: Side, index: usize, field: String },
    /// A configured column is absent from a source's header row.
    MissingColumn { side: Side, column: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty column name, duplicate passthrough, etc.).
    ConfigValidation(String),
    /// CSV read/write error.
    Csv(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCutoff(value) => {
                write!(f, "cutoff must be between 0 and 100, got {value}")
            }
            Self::MalformedRecord { side, index, field } => {
                write!(f, "{side} record {index}: name field '{field}' is missing or blank")
            }
            Self::MissingColumn { side, column } => {
                write!(f, "{side} source: missing column '{column}'")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<csv::Error> for ReconError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

impl From<std::io::Error> for ReconError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
