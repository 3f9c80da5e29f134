//! Error types for the fallible edges of the crate.
//!
//! The simulation itself never fails: invalid commands are ignored and
//! degenerate generation results are tolerated. Errors only come from
//! loading configuration, building hand-made worlds, and reading or writing
//! snapshots.

/// Errors raised at the crate's fallible edges.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem access failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] ron::Error),

    /// Snapshot JSON could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Configuration parsed but holds values the simulation cannot run with.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Planets and players handed to the world do not form a valid arena.
    #[error("invalid world: {0}")]
    InvalidWorld(String),
}

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
