//! Route manifest.
//!
//! The manifest is the artifact handed to the rendering tool: the channel,
//! every composed route with its sidebar, and every page with its URL, file
//! and edit link. File paths are relative to the config directory so the
//! manifest does not depend on where the repository is checked out.

use std::fs;
use std::path::Path;

use docweave_routes::Route;
use docweave_sources::SidebarItem;
use serde::Serialize;

use crate::error::SiteError;
use crate::site::ResolvedSite;

/// Serialized route table of one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteManifest {
    /// Channel name.
    pub channel: String,
    /// Channel base URL with trailing slash.
    pub base_url: String,
    /// Routes in composition order.
    pub routes: Vec<RouteManifest>,
}

/// One composed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteManifest {
    /// Composed prefix.
    pub prefix: String,
    /// Owning namespace.
    pub namespace: String,
    /// Content root.
    pub root: String,
    /// Version details, for versioned sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionManifest>,
    /// Sidebar tree.
    pub sidebar: Vec<SidebarItem>,
    /// Pages sorted by URL.
    pub pages: Vec<PageManifest>,
}

/// Version of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionManifest {
    /// Version label.
    pub label: String,
    /// In-progress content.
    pub current: bool,
    /// Routed without a label segment.
    pub latest: bool,
}

/// One page of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageManifest {
    /// Composed URL.
    pub url: String,
    /// Doc id.
    pub id: String,
    /// Markdown file.
    pub file: String,
    /// Page title.
    pub title: String,
    /// Edit link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
}

impl SiteManifest {
    /// Build the manifest of a resolved site.
    #[must_use]
    pub fn from_site(site: &ResolvedSite) -> Self {
        let table = site.routes();
        Self {
            channel: table.channel().name.clone(),
            base_url: table.channel().base_url(),
            routes: table
                .routes()
                .iter()
                .map(|route| route_manifest(route, site.base_dir()))
                .collect(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SiteError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the manifest, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Write`] on I/O failure.
    pub fn write(&self, path: &Path) -> Result<(), SiteError> {
        let json = self.to_json()?;
        let write_err = |source| SiteError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, json).map_err(write_err)?;
        tracing::info!(path = %path.display(), routes = self.routes.len(), "Wrote manifest");
        Ok(())
    }
}

fn route_manifest(route: &Route, base_dir: &Path) -> RouteManifest {
    RouteManifest {
        prefix: route.prefix.to_string(),
        namespace: route.namespace.clone(),
        root: relative_display(&route.root, base_dir),
        version: route.version.as_ref().map(|v| VersionManifest {
            label: v.label.clone(),
            current: v.is_current,
            latest: v.is_latest,
        }),
        sidebar: route.sidebar.clone(),
        pages: route
            .pages
            .iter()
            .map(|page| PageManifest {
                url: route.page_url(page).to_string(),
                id: page.id.clone(),
                file: relative_display(&page.file, base_dir),
                title: page.title.clone(),
                edit_url: route.edit_url_for(page, base_dir),
            })
            .collect(),
    }
}

/// Path relative to `base`, with `/` separators.
fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
