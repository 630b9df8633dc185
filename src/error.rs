use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("line {line}: missing year")]
    MissingYear { line: usize },

    #[error("line {line}: invalid year {token:?}")]
    InvalidYear { line: usize, token: String },

    #[error("line {line}: invalid value {token:?} for month {month}")]
    InvalidValue {
        line: usize,
        month: u32,
        token: String,
    },

    #[error("invalid calendar month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("local midnight of {year}-{month:02}-01 does not exist")]
    NonexistentLocalTime { year: i32, month: u32 },

    #[error("{field} has {found} values, expected {expected} (length of times)")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("series has no samples")]
    EmptySeries,

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read/write error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plotting failed: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, SeriesError>;
