//! Error types for vsixedit

use thiserror::Error;

/// Main error type for vsixedit operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Entry is not valid UTF-8: {0}")]
    Decode(String),

    #[error("Failed to parse {name}: {message}")]
    Parse { name: String, message: String },

    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    #[error("Address does not resolve: {0}")]
    AddressNotFound(String),

    #[error("Export failed: {0}")]
    Export(String),
}

/// Result type alias for vsixedit operations
pub type Result<T> = std::result::Result<T, Error>;
