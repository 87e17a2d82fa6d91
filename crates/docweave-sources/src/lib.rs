//! Documentation sources for docweave.
//!
//! This crate turns the `[[sources]]` declarations of a resolved config into
//! routable content trees. It handles:
//!
//! - Source validation and registration ([`SourceRegistry`])
//! - Expansion of versioned sources into per-version candidates
//!   ([`materialize_all`])
//! - Page discovery with front matter, number prefixes and index pages
//!   ([`scan_pages`])
//! - Sidebar generation, automatic or from an explicit file
//!   ([`build_sidebar`])
//!
//! # Example
//!
//! ```ignore
//! use docweave_config::LatestVersion;
//! use docweave_sources::{SourceRegistry, materialize_all, scan_pages};
//!
//! let registry = SourceRegistry::from_config(&config.sources_resolved)?;
//! for candidate in materialize_all(&registry, LatestVersion::Released)? {
//!     let pages = scan_pages(&candidate)?;
//!     println!("{}: {} pages", candidate.route, pages.len());
//! }
//! ```

mod edit_url;
mod error;
mod front_matter;
mod materialize;
mod registry;
mod scanner;
mod sidebar;
mod version;

pub use edit_url::EditUrlTemplate;
pub use error::SourceError;
pub use front_matter::FrontMatter;
pub use materialize::{
    RouteCandidate, VERSION_DIR_PREFIX, Version, materialize, materialize_all, released_versions,
};
pub use registry::{DocSource, SourceRegistry, Versioning};
pub use scanner::{Page, scan_pages};
pub use sidebar::{SidebarItem, build_sidebar};
pub use version::{VersionLabel, sort_descending};
