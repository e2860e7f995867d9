use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Error type covering the failures that can occur while the tool reads
/// roster exports, compares members, or renders a report.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Wrapper for IO failures such as opening an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the CSV reader cannot decode a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when the user provides an export path that does not exist.
    #[error("unable to find export {0}")]
    FileNotFound(PathBuf),

    /// Raised when a row does not have the shape expected for its source.
    #[error("malformed {source_kind} row at line {line}: {reason}")]
    MalformedRow {
        source_kind: &'static str,
        line: u64,
        reason: String,
    },

    /// Raised when an address does not contain exactly one `@`.
    #[error("invalid email address '{0}'")]
    InvalidEmailFormat(String),

    /// Raised when a report is filtered on a committee with no members.
    #[error("unknown committee '{0}'")]
    UnknownCommittee(String),

    /// Raised when the configuration file cannot be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
