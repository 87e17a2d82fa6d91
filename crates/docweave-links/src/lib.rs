//! Link integrity checking for docweave.
//!
//! Extracts cross-references from every page of a composed [`RouteTable`],
//! resolves them against the composed URL space, and classifies each as
//! resolved, broken path or broken anchor. Link policies decide which
//! diagnostics fail the build.
//!
//! # Example
//!
//! ```ignore
//! use docweave_links::check_links;
//!
//! let report = check_links(&table);
//! let warnings = report.apply_policy(&config.links)?;
//! ```
//!
//! [`RouteTable`]: docweave_routes::RouteTable

mod checker;
mod extract;
mod kind;
mod resolve;

pub use checker::{
    CrossReference, LinkChecker, LinkDiagnostic, LinkError, LinkIndex, LinkReport, LinkStatus,
    check_links,
};
pub use extract::{Extracted, RawLink, extract, slugify};
pub use kind::{LinkKind, is_external_link, split_target};
pub use resolve::{resolve_physical_path, resolve_relative_url, resolve_site_root};
