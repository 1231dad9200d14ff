use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TraceError>;

/// Failures of the save/load side. Tracing itself cannot fail.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The database file could not be opened or created
    #[cfg(feature = "sqlite")]
    #[error("cannot open database {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed after the database was opened
    #[cfg(feature = "sqlite")]
    #[error("sql error: {0}")]
    Statement(#[from] rusqlite::Error),

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored value does not map back to a known enum
    #[error("invalid {kind} value {value} in database")]
    InvalidValue { kind: &'static str, value: i64 },
}
