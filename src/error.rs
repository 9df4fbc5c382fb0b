//! Error types for linequery.
//!
//! Only acquiring a text source, parsing query text, and validating settings
//! can fail. Building an index and evaluating a query are total: a term that
//! never occurs is an empty result, not an error.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LineQueryError>;

/// The error type for linequery operations.
#[derive(Debug, Error)]
pub enum LineQueryError {
    /// A file backing a line store (or a formatter output) could not be
    /// opened, read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error on a stream with no associated path.
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    /// Query text that the parser rejected.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An argument outside its valid domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration document that could not be understood.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LineQueryError {
    /// Create an I/O error tied to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LineQueryError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        LineQueryError::Parse(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        LineQueryError::InvalidArgument(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        LineQueryError::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = LineQueryError::io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_helpers() {
        assert!(matches!(
            LineQueryError::parse("x"),
            LineQueryError::Parse(ref m) if m == "x"
        ));
        assert_eq!(
            LineQueryError::invalid_argument("width must be positive").to_string(),
            "Invalid argument: width must be positive"
        );
    }
}
