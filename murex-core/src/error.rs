//! Structured error types for the murex crates.

use thiserror::Error;

/// Unified error type for all murex operations.
#[derive(Debug, Error)]
pub enum MurexError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed SMILES, option string, or fixture file)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A graph whose bonds reference atoms outside the graph
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// A caller-supplied match predicate failed
    #[error("predicate error: {0}")]
    Predicate(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the murex crates.
pub type Result<T> = std::result::Result<T, MurexError>;
