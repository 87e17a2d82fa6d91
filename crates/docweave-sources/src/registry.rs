//! Source registry.
//!
//! The registry is the validated, ordered table of documentation sources. It
//! is built once from the resolved config and never mutated.

use std::collections::HashSet;
use std::path::PathBuf;

use docweave_config::{RoutePath, SidebarStrategy, SourceConfig};
use rayon::prelude::*;

use crate::edit_url::EditUrlTemplate;
use crate::error::SourceError;

/// Versioning settings of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioning {
    /// Directory holding `version-<label>` snapshots.
    pub dir: PathBuf,
    /// Route label of in-progress content when it is not the latest.
    pub current_label: String,
    /// Only materialize these labels, when set.
    pub include: Option<Vec<String>>,
}

/// One independent collection of documentation content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSource {
    /// Unique namespace.
    pub namespace: String,
    /// Content root (in-progress content for versioned sources).
    pub root: PathBuf,
    /// Route prefix relative to the channel base.
    pub route: RoutePath,
    /// Sidebar generation strategy.
    pub sidebar: SidebarStrategy,
    /// Edit-link template.
    pub edit_url: Option<EditUrlTemplate>,
    /// Present for versioned sources.
    pub versioning: Option<Versioning>,
}

impl DocSource {
    /// True if this source tracks released versions.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        self.versioning.is_some()
    }
}

/// Ordered, validated list of sources.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<DocSource>,
}

impl SourceRegistry {
    /// Validate source declarations and build the registry.
    ///
    /// Checks, in order: namespace shape and uniqueness, route prefix,
    /// edit-link template and current label, then root existence and the
    /// explicit sidebar file. Root checks run in parallel; the first failing
    /// source in declaration order is reported.
    ///
    /// # Errors
    ///
    /// Returns the first [`SourceError`] found.
    pub fn from_config(configs: &[SourceConfig]) -> Result<Self, SourceError> {
        let mut seen = HashSet::new();
        let mut sources = Vec::with_capacity(configs.len());

        for config in configs {
            validate_namespace(&config.namespace)?;
            if !seen.insert(config.namespace.as_str()) {
                return Err(SourceError::DuplicateNamespace(config.namespace.clone()));
            }
            sources.push(describe(config)?);
        }

        let root_checks: Vec<Result<(), SourceError>> =
            sources.par_iter().map(check_root).collect();
        if let Some(err) = root_checks.into_iter().find_map(Result::err) {
            return Err(err);
        }

        for source in &sources {
            tracing::debug!(
                namespace = %source.namespace,
                route = %source.route,
                versioned = source.is_versioned(),
                "Registered source"
            );
        }

        Ok(Self { sources })
    }

    /// Sources in declaration order.
    #[must_use]
    pub fn sources(&self) -> &[DocSource] {
        &self.sources
    }

    /// Look up a source by namespace.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&DocSource> {
        self.sources.iter().find(|s| s.namespace == namespace)
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if no sources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

fn validate_namespace(namespace: &str) -> Result<(), SourceError> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SourceError::InvalidNamespace(namespace.to_owned()))
    }
}

/// Turn a config entry into a descriptor without touching the filesystem.
fn describe(config: &SourceConfig) -> Result<DocSource, SourceError> {
    let namespace = &config.namespace;

    let route = RoutePath::parse(&config.route).map_err(|source| SourceError::InvalidRoute {
        namespace: namespace.clone(),
        source,
    })?;

    let edit_url = config
        .edit_url
        .as_deref()
        .map(EditUrlTemplate::parse)
        .transpose()
        .map_err(|message| SourceError::InvalidEditUrl {
            namespace: namespace.clone(),
            message,
        })?;

    let versioning = match &config.versions {
        Some(versions) => {
            RoutePath::root()
                .child(&versions.current_label)
                .map_err(|source| SourceError::InvalidVersionLabel {
                    namespace: namespace.clone(),
                    label: versions.current_label.clone(),
                    source,
                })?;
            Some(Versioning {
                dir: versions.dir.clone(),
                current_label: versions.current_label.clone(),
                include: versions.include.clone(),
            })
        }
        None => None,
    };

    Ok(DocSource {
        namespace: namespace.clone(),
        root: config.root.clone(),
        route,
        sidebar: config.sidebar.clone(),
        edit_url,
        versioning,
    })
}

fn check_root(source: &DocSource) -> Result<(), SourceError> {
    if !source.root.is_dir() {
        return Err(SourceError::MissingRoot {
            namespace: source.namespace.clone(),
            path: source.root.clone(),
        });
    }
    if let SidebarStrategy::Explicit(file) = &source.sidebar {
        let path = source.root.join(file);
        if !path.is_file() {
            return Err(SourceError::MissingSidebar {
                namespace: source.namespace.clone(),
                path,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use docweave_config::VersionsConfig;

    use super::*;
    use crate::test_support::source_config;

    #[test]
    fn test_registers_in_declaration_order() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SourceRegistry::from_config(&[
            source_config("guide", dir.path(), "/guide"),
            source_config("api", dir.path(), "/api"),
        ])
        .unwrap();

        let namespaces: Vec<_> = registry
            .sources()
            .iter()
            .map(|s| s.namespace.as_str())
            .collect();
        assert_eq!(namespaces, ["guide", "api"]);
        assert_eq!(registry.get("api").unwrap().route.to_string(), "/api");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_namespace_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceRegistry::from_config(&[
            source_config("docs", dir.path(), "/a"),
            source_config("docs", dir.path(), "/b"),
        ])
        .unwrap_err();
        assert!(matches!(err, SourceError::DuplicateNamespace(ref ns) if ns == "docs"));
    }

    #[test]
    fn test_invalid_namespace_fails() {
        let dir = tempfile::tempdir().unwrap();
        for ns in ["", "my docs", "a/b"] {
            let err = SourceRegistry::from_config(&[source_config(ns, dir.path(), "/a")])
                .unwrap_err();
            assert!(matches!(err, SourceError::InvalidNamespace(_)), "{ns:?}");
        }
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = SourceRegistry::from_config(&[
            source_config("ok", dir.path(), "/ok"),
            source_config("vendored", &missing, "/vendored"),
        ])
        .unwrap_err();
        assert!(matches!(err, SourceError::MissingRoot { .. }));
        assert!(err.to_string().contains("vendored"));
    }

    #[test]
    fn test_first_missing_root_in_declaration_order() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceRegistry::from_config(&[
            source_config("first", &dir.path().join("a"), "/a"),
            source_config("second", &dir.path().join("b"), "/b"),
        ])
        .unwrap_err();
        assert!(matches!(err, SourceError::MissingRoot { ref namespace, .. } if namespace == "first"));
    }

    #[test]
    fn test_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.md");
        std::fs::write(&file, "# File").unwrap();
        let err = SourceRegistry::from_config(&[source_config("f", &file, "/f")]).unwrap_err();
        assert!(matches!(err, SourceError::MissingRoot { .. }));
    }

    #[test]
    fn test_malformed_route_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceRegistry::from_config(&[source_config("docs", dir.path(), "docs")])
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidRoute { .. }));
        assert!(err.to_string().contains("docs"));
    }

    #[test]
    fn test_invalid_edit_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = source_config("docs", dir.path(), "/docs");
        config.edit_url = Some("https://x.dev/{ref}/{path}".to_owned());
        let err = SourceRegistry::from_config(&[config]).unwrap_err();
        assert!(matches!(err, SourceError::InvalidEditUrl { .. }));
    }

    #[test]
    fn test_invalid_current_label_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = source_config("docs", dir.path(), "/docs");
        config.versions = Some(VersionsConfig {
            dir: dir.path().join("versions"),
            current_label: "in progress".to_owned(),
            include: None,
        });
        let err = SourceRegistry::from_config(&[config]).unwrap_err();
        assert!(matches!(err, SourceError::InvalidVersionLabel { .. }));
    }

    #[test]
    fn test_missing_explicit_sidebar_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = source_config("docs", dir.path(), "/docs");
        config.sidebar = SidebarStrategy::Explicit(PathBuf::from("sidebars.yml"));
        let err = SourceRegistry::from_config(&[config.clone()]).unwrap_err();
        assert!(matches!(err, SourceError::MissingSidebar { .. }));

        std::fs::write(dir.path().join("sidebars.yml"), "- intro\n").unwrap();
        assert!(SourceRegistry::from_config(&[config]).is_ok());
    }

    #[test]
    fn test_versioned_source_registered() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = source_config("docs", dir.path(), "/docs");
        config.versions = Some(VersionsConfig {
            dir: dir.path().join("versions"),
            current_label: "next".to_owned(),
            include: None,
        });
        let registry = SourceRegistry::from_config(&[config]).unwrap();
        assert!(registry.get("docs").unwrap().is_versioned());
    }
}
