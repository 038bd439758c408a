//! Error types for sqlcell.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for sqlcell operations.
#[derive(Error, Debug)]
pub enum CellError {
    /// Cell usage errors (more than one target name, unknown magic, etc.)
    #[error("Usage error: {0}")]
    Usage(String),

    /// Malformed options line (unknown flag, missing or invalid flag value).
    #[error("Option error: {0}")]
    Options(String),

    /// Template substitution errors (unknown placeholder, unbalanced braces).
    #[error("Template error: {0}")]
    Template(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CellError {
    /// Creates a usage error with the given message.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Creates an option-parsing error with the given message.
    pub fn options(msg: impl Into<String>) -> Self {
        Self::Options(msg.into())
    }

    /// Creates a template error with the given message.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Usage(_) => "Usage Error",
            Self::Options(_) => "Option Error",
            Self::Template(_) => "Template Error",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using CellError.
pub type Result<T> = std::result::Result<T, CellError>;
