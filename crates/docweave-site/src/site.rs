//! Site resolution pipeline.
//!
//! Runs every stage once, in order, and stops at the first fatal error:
//!
//! ```text
//! registry -> materialize -> scan + sidebars -> compose -> check links
//! ```
//!
//! Scanning runs in parallel per content root; results are collected in
//! candidate order so the first failing root in declaration order is
//! reported.

use std::path::{Path, PathBuf};
use std::time::Instant;

use docweave_config::{Channel, Config};
use docweave_links::{LinkDiagnostic, LinkReport, check_links};
use docweave_routes::{RouteContent, RouteTable, compose};
use docweave_sources::{
    RouteCandidate, SourceError, SourceRegistry, build_sidebar, materialize_all, scan_pages,
};
use rayon::prelude::*;

use crate::error::SiteError;
use crate::manifest::SiteManifest;

/// Entry point of the resolution pipeline.
pub struct Site;

impl Site {
    /// Resolve sources, versions, routes and links for one channel.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`SiteError`]: an invalid source, an
    /// unreadable content root, a route collision, or a link configured as
    /// an error.
    pub fn resolve(config: &Config, channel: &Channel) -> Result<ResolvedSite, SiteError> {
        let start = Instant::now();

        let registry = SourceRegistry::from_config(&config.sources_resolved)?;
        let candidates = materialize_all(&registry, channel.latest)?;

        let scanned: Vec<Result<RouteContent, SourceError>> =
            candidates.into_par_iter().map(scan_candidate).collect();
        let contents = scanned.into_iter().collect::<Result<Vec<_>, _>>()?;

        let table = compose(channel, contents)?;
        let report = check_links(&table);
        let warnings = report.clone().apply_policy(&config.links)?;

        tracing::info!(
            channel = %channel.name,
            sources = registry.len(),
            routes = table.len(),
            warnings = warnings.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Resolved site"
        );

        Ok(ResolvedSite {
            table,
            report,
            warnings,
            base_dir: config.base_dir().to_path_buf(),
        })
    }
}

fn scan_candidate(candidate: RouteCandidate) -> Result<RouteContent, SourceError> {
    let pages = scan_pages(&candidate)?;
    let sidebar = build_sidebar(&candidate, &pages)?;
    Ok(RouteContent {
        candidate,
        pages,
        sidebar,
    })
}

/// A fully resolved and checked site.
#[derive(Debug, Clone)]
pub struct ResolvedSite {
    table: RouteTable,
    report: LinkReport,
    warnings: Vec<LinkDiagnostic>,
    base_dir: PathBuf,
}

impl ResolvedSite {
    /// Composed route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// Link report before policies were applied.
    #[must_use]
    pub fn link_report(&self) -> &LinkReport {
        &self.report
    }

    /// Link diagnostics reported as warnings.
    #[must_use]
    pub fn warnings(&self) -> &[LinkDiagnostic] {
        &self.warnings
    }

    /// Directory paths in the manifest are relative to.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Serializable route manifest.
    #[must_use]
    pub fn manifest(&self) -> SiteManifest {
        SiteManifest::from_site(self)
    }
}
