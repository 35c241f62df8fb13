//! Error types for catalog loading

use thiserror::Error;

/// Result type alias using [`CatalogError`]
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while loading a Track Catalog Document
///
/// All of these are fatal to session initialization: without a catalog
/// there is nothing to play.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document could not be read
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON, or not a sequence of track objects
    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    /// A track entry has no playable source
    #[error("track {ordinal} has no src")]
    MissingSource { ordinal: usize },
}
