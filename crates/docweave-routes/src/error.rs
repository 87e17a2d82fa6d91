//! Composition error types.

use std::path::PathBuf;

/// Errors raised while composing routes.
///
/// Collisions are never resolved by declaration order; every overlap the
/// composer cannot prove harmless is reported.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Two routes claim overlapping URL prefixes.
    #[error("Route collision: {first} at '{first_prefix}' overlaps {second} at '{second_prefix}'")]
    Collision {
        /// First route (namespace, with version label when versioned).
        first: String,
        /// Composed prefix of the first route.
        first_prefix: String,
        /// Second route.
        second: String,
        /// Composed prefix of the second route.
        second_prefix: String,
    },

    /// A page of an outer route lands under a nested route's prefix.
    #[error(
        "Page '{url}' of {outer} ({}) is shadowed by {inner} mounted at '{inner_prefix}'",
        file.display()
    )]
    Shadowed {
        /// Route owning the page.
        outer: String,
        /// Route whose prefix contains the page URL.
        inner: String,
        /// Composed prefix of the inner route.
        inner_prefix: String,
        /// Page URL.
        url: String,
        /// Page file.
        file: PathBuf,
    },
}
