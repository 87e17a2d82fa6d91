//! Site error types.

use std::path::PathBuf;

use docweave_links::LinkError;
use docweave_routes::ComposeError;
use docweave_sources::SourceError;

/// Errors raised while resolving a site or writing its manifest.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Source registration, materialization or scanning failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Route prefixes overlap.
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// Links configured as errors did not resolve.
    #[error(transparent)]
    Links(#[from] LinkError),
    /// Manifest serialization failed.
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Manifest could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}
