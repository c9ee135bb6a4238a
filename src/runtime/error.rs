//! Error types for the game core
//!
//! Script failures are not errors at this level: they collapse to a boolean
//! (see [`crate::interpreter::ParseError`]). These types cover setup problems
//! that the embedding application has to handle.

use thiserror::Error;

/// Top-level session error
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Map construction errors
    #[error("Map error: {0}")]
    Map(#[from] MapError),
}

/// Invalid session settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting that must be positive was zero
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Tile map text could not be turned into a map
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// Map text had no rows
    #[error("map has no rows")]
    Empty,

    /// A row had a different number of columns than the first row
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Columns in the first row
        expected: usize,
        /// Columns in this row
        found: usize,
    },

    /// A cell was not a tile id
    #[error("invalid tile id '{token}' at row {row}, column {col}")]
    InvalidTile {
        /// Zero-based row index
        row: usize,
        /// Zero-based column index
        col: usize,
        /// Offending text
        token: String,
    },
}

/// Result type using SessionError
pub type Result<T> = std::result::Result<T, SessionError>;
