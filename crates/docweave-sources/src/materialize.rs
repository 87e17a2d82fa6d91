//! Version materialization.
//!
//! Turns each registered source into route candidates: one for an
//! unversioned source, or one per released snapshot plus one for the
//! in-progress ("current") content of a versioned source.
//!
//! # Snapshot Layout
//!
//! ```text
//! docs/                      <- current content (source root)
//! docs_versioned_docs/
//!   version-0.12/            <- released snapshot "0.12"
//!   version-0.11/
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use docweave_config::{LatestVersion, RoutePath, SidebarStrategy};
use rayon::prelude::*;

use crate::edit_url::EditUrlTemplate;
use crate::error::SourceError;
use crate::registry::{DocSource, SourceRegistry, Versioning};
use crate::version::{VersionLabel, sort_descending};

/// Directory name prefix of released snapshots.
pub const VERSION_DIR_PREFIX: &str = "version-";

/// One version of a versioned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Version label (`0.12`, or the current label for in-progress content).
    pub label: String,
    /// Content root of this version.
    pub root: PathBuf,
    /// True for the in-progress content at the source root.
    pub is_current: bool,
    /// True for the version routed without a label segment.
    pub is_latest: bool,
}

/// A routable content tree, before composition with the channel base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCandidate {
    /// Owning namespace.
    pub namespace: String,
    /// Route relative to the channel base (source prefix plus version label).
    pub route: RoutePath,
    /// Content root.
    pub root: PathBuf,
    /// Version details; `None` for unversioned sources.
    pub version: Option<Version>,
    /// Sidebar generation strategy.
    pub sidebar: SidebarStrategy,
    /// Edit-link template.
    pub edit_url: Option<EditUrlTemplate>,
}

/// Materialize every source of the registry, in declaration order.
///
/// Sources are scanned in parallel; the first failing source in declaration
/// order is reported.
///
/// # Errors
///
/// Returns the first [`SourceError`] found.
pub fn materialize_all(
    registry: &SourceRegistry,
    latest: LatestVersion,
) -> Result<Vec<RouteCandidate>, SourceError> {
    let per_source: Vec<Result<Vec<RouteCandidate>, SourceError>> = registry
        .sources()
        .par_iter()
        .map(|source| materialize(source, latest))
        .collect();

    let mut candidates = Vec::new();
    for result in per_source {
        candidates.extend(result?);
    }
    Ok(candidates)
}

/// Materialize one source.
///
/// Candidates are ordered current first, then released versions newest
/// first. A versioned source without snapshots yields exactly one candidate.
///
/// # Errors
///
/// Returns [`SourceError`] if the snapshot directory cannot be read, a label
/// is unusable as a route segment, or an included label is missing.
pub fn materialize(
    source: &DocSource,
    latest: LatestVersion,
) -> Result<Vec<RouteCandidate>, SourceError> {
    let Some(versioning) = &source.versioning else {
        return Ok(vec![candidate(source, source.route.clone(), source.root.clone(), None)]);
    };

    let released = released_versions(source, versioning)?;
    let latest_released = latest == LatestVersion::Released && !released.is_empty();

    let mut candidates = Vec::with_capacity(released.len() + 1);

    let current_route = if latest_released {
        version_route(source, &versioning.current_label)?
    } else {
        source.route.clone()
    };
    candidates.push(candidate(
        source,
        current_route,
        source.root.clone(),
        Some(Version {
            label: versioning.current_label.clone(),
            root: source.root.clone(),
            is_current: true,
            is_latest: !latest_released,
        }),
    ));

    for (i, (label, root)) in released.into_iter().enumerate() {
        let is_latest = latest_released && i == 0;
        let route = if is_latest {
            source.route.clone()
        } else {
            version_route(source, &label)?
        };
        candidates.push(candidate(
            source,
            route,
            root.clone(),
            Some(Version {
                label,
                root,
                is_current: false,
                is_latest,
            }),
        ));
    }

    tracing::debug!(
        namespace = %source.namespace,
        versions = candidates.len(),
        "Materialized versions"
    );

    Ok(candidates)
}

/// List released snapshots of a source, newest first.
///
/// A missing snapshot directory means no released versions.
///
/// # Errors
///
/// Returns [`SourceError`] on unreadable directories, invalid or duplicate
/// labels, and labels listed in `include` without a snapshot.
pub fn released_versions(
    source: &DocSource,
    versioning: &Versioning,
) -> Result<Vec<(String, PathBuf)>, SourceError> {
    let mut found = read_snapshot_dirs(&versioning.dir)?;

    if let Some(include) = &versioning.include {
        if let Some(missing) = include.iter().find(|l| !found.iter().any(|(f, _)| f == *l)) {
            return Err(SourceError::MissingVersion {
                namespace: source.namespace.clone(),
                label: missing.clone(),
            });
        }
        found.retain(|(label, _)| include.contains(label));
    }

    for (label, _) in &found {
        if *label == versioning.current_label {
            return Err(SourceError::DuplicateVersion {
                namespace: source.namespace.clone(),
                label: label.clone(),
            });
        }
        version_route(source, label)?;
    }

    let mut labels: Vec<VersionLabel> = found.iter().map(|(l, _)| VersionLabel::new(l)).collect();
    sort_descending(&mut labels);

    Ok(labels
        .into_iter()
        .filter_map(|label| {
            found
                .iter()
                .find(|(l, _)| l == label.as_str())
                .map(|(l, root)| (l.clone(), root.clone()))
        })
        .collect())
}

fn read_snapshot_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, SourceError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SourceError::io(dir, e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SourceError::io(dir, e))?;
        if !entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(label) = name.strip_prefix(VERSION_DIR_PREFIX)
            && !label.is_empty()
        {
            found.push((label.to_owned(), entry.path()));
        }
    }
    Ok(found)
}

fn version_route(source: &DocSource, label: &str) -> Result<RoutePath, SourceError> {
    source
        .route
        .child(label)
        .map_err(|e| SourceError::InvalidVersionLabel {
            namespace: source.namespace.clone(),
            label: label.to_owned(),
            source: e,
        })
}

fn candidate(
    source: &DocSource,
    route: RoutePath,
    root: PathBuf,
    version: Option<Version>,
) -> RouteCandidate {
    RouteCandidate {
        namespace: source.namespace.clone(),
        route,
        root,
        version,
        sidebar: source.sidebar.clone(),
        edit_url: source.edit_url.clone(),
    }
}
