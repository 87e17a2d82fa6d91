//! Composed routes and the route table.

use std::path::{Path, PathBuf};

use docweave_config::{Channel, RoutePath};
use docweave_sources::{EditUrlTemplate, Page, SidebarItem, Version};

/// A composed URL prefix and the content tree serving it.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Absolute prefix (channel base + source route + version label).
    pub prefix: RoutePath,
    /// Owning namespace.
    pub namespace: String,
    /// Content root.
    pub root: PathBuf,
    /// Version details; `None` for unversioned sources.
    pub version: Option<Version>,
    /// Edit-link template.
    pub edit_url: Option<EditUrlTemplate>,
    /// Branch substituted into edit links (from the channel).
    pub branch: String,
    /// Sidebar tree.
    pub sidebar: Vec<SidebarItem>,
    /// Pages, sorted by slug.
    pub pages: Vec<Page>,
}

impl Route {
    /// Version label, if versioned.
    #[must_use]
    pub fn version_label(&self) -> Option<&str> {
        self.version.as_ref().map(|v| v.label.as_str())
    }

    /// Human-readable name for diagnostics (`docs` or `docs@0.11`).
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.version_label() {
            Some(label) => format!("{}@{label}", self.namespace),
            None => self.namespace.clone(),
        }
    }

    /// Absolute URL of a page of this route.
    #[must_use]
    pub fn page_url(&self, page: &Page) -> RoutePath {
        self.prefix.join(&page.slug)
    }

    /// Edit link of a page, if the source has a template.
    ///
    /// `{path}` is the page file relative to `base_dir` (the config file
    /// directory).
    #[must_use]
    pub fn edit_url_for(&self, page: &Page, base_dir: &Path) -> Option<String> {
        let template = self.edit_url.as_ref()?;
        let path = page.file.strip_prefix(base_dir).unwrap_or(&page.file);
        Some(template.render(
            &self.branch,
            self.version_label(),
            &path.to_string_lossy(),
        ))
    }
}

/// Immutable set of composed routes for one channel.
///
/// Routes are ordered by source declaration, then version order.
#[derive(Debug, Clone)]
pub struct RouteTable {
    channel: Channel,
    routes: Vec<Route>,
}

impl RouteTable {
    pub(crate) fn new(channel: Channel, routes: Vec<Route>) -> Self {
        Self { channel, routes }
    }

    /// Channel the routes were composed for.
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Routes in composition order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if no routes were composed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The most specific route whose prefix contains `path`.
    #[must_use]
    pub fn lookup(&self, path: &RoutePath) -> Option<&Route> {
        self.routes
            .iter()
            .filter(|r| path.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.segments().len())
    }

    /// The page served at `url`, with its route.
    #[must_use]
    pub fn find_page(&self, url: &RoutePath) -> Option<(&Route, &Page)> {
        let route = self.lookup(url)?;
        let slug = url.strip_prefix(&route.prefix)?;
        let page = route
            .pages
            .binary_search_by(|p| p.slug.cmp(&slug))
            .ok()
            .map(|i| &route.pages[i])?;
        Some((route, page))
    }
}
