//! Error types for Ironvale.
//!
//! The per-tick simulation never fails; these cover the edges where data enters
//! or leaves it (level layouts, snapshots, configuration files).

use thiserror::Error;

/// Top-level error type for Ironvale operations.
#[derive(Debug, Error)]
pub enum IronvaleError {
    /// World/layout errors
    #[error("World error: {0}")]
    World(#[from] WorldError),

    /// Snapshot encode/decode errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tile-grid authoring errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// Layout has no rows or no columns
    #[error("Layout is empty")]
    EmptyLayout,

    /// A row's width differs from the first row
    #[error("Row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of this row
        actual: usize,
    },

    /// Tile size must be positive and finite
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(String),
}

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Payload does not start with the snapshot magic bytes
    #[error("Not a snapshot payload")]
    BadMagic,

    /// Payload was written by an incompatible schema
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Version this build reads
        expected: String,
        /// Version found in the payload
        actual: String,
    },

    /// Encoding failed
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    /// Decoding failed
    #[error("Failed to decode snapshot: {0}")]
    Decode(String),
}

impl From<bincode::Error> for SnapshotError {
    fn from(err: bincode::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Failed to access {path}: {reason}")]
    Access {
        /// Path involved
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// File contents could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// Path involved
        path: String,
        /// Parser message
        reason: String,
    },
}

/// Result type alias for Ironvale operations.
pub type IronvaleResult<T> = Result<T, IronvaleError>;
