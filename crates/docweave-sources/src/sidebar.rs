//! Sidebar generation.
//!
//! `auto` sidebars mirror the directory tree of a content root. Directories
//! may carry a `_category_.yml` (or `.yaml` / `.json`) file with a label and
//! position. `explicit` sidebars are read from a YAML or JSON list relative to
//! each content root.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use docweave_config::SidebarStrategy;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::materialize::RouteCandidate;
use crate::scanner::{Page, strip_number_prefix, titlecase_from_slug};

/// Category metadata file names, in lookup order.
const CATEGORY_FILES: [&str; 3] = ["_category_.yml", "_category_.yaml", "_category_.json"];

/// One entry of a sidebar tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarItem {
    /// A page of the route.
    Doc {
        /// Doc id.
        id: String,
        /// Display label.
        label: String,
    },
    /// A group of items.
    Category {
        /// Display label.
        label: String,
        /// Doc id of the category landing page.
        #[serde(skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        /// Nested items.
        items: Vec<SidebarItem>,
    },
    /// An arbitrary link.
    Link {
        /// Display label.
        label: String,
        /// Link target.
        href: String,
    },
}

/// Build the sidebar of a content root.
///
/// # Errors
///
/// Returns [`SourceError`] if an explicit sidebar file is missing, malformed,
/// or references an unknown doc id.
pub fn build_sidebar(
    candidate: &RouteCandidate,
    pages: &[Page],
) -> Result<Vec<SidebarItem>, SourceError> {
    match &candidate.sidebar {
        SidebarStrategy::Auto => Ok(auto_sidebar(&candidate.root, pages)),
        SidebarStrategy::Explicit(file) => {
            explicit_sidebar(&candidate.namespace, &candidate.root.join(file), pages)
        }
    }
}

/// Category metadata from `_category_.*`.
#[derive(Debug, Default, Deserialize)]
struct CategoryMeta {
    label: Option<String>,
    position: Option<f64>,
}

#[derive(Default)]
struct DirNode<'a> {
    pages: Vec<&'a Page>,
    children: BTreeMap<String, DirNode<'a>>,
}

fn auto_sidebar(root: &Path, pages: &[Page]) -> Vec<SidebarItem> {
    let mut tree = DirNode::default();
    for page in pages {
        let mut node = &mut tree;
        if let Some(parent) = page.rel_path.parent() {
            for component in parent.components() {
                let name = component.as_os_str().to_string_lossy().into_owned();
                node = node.children.entry(name).or_default();
            }
        }
        node.pages.push(page);
    }
    build_level(&tree, root, true)
}

fn build_level(node: &DirNode<'_>, dir: &Path, is_root: bool) -> Vec<SidebarItem> {
    let mut entries: Vec<(Option<f64>, String, SidebarItem)> = Vec::new();

    for page in &node.pages {
        if page.is_index && !is_root {
            continue;
        }
        entries.push((
            page.position,
            page.id.clone(),
            SidebarItem::Doc {
                id: page.id.clone(),
                label: page.label().to_owned(),
            },
        ));
    }

    for (name, child) in &node.children {
        let child_dir = dir.join(name);
        let items = build_level(child, &child_dir, false);
        let link = child.pages.iter().find(|p| p.is_index).map(|p| p.id.clone());
        if items.is_empty() && link.is_none() {
            continue;
        }

        let meta = read_category_meta(&child_dir);
        let (number_position, stripped) = strip_number_prefix(name);
        let label = meta
            .label
            .unwrap_or_else(|| titlecase_from_slug(stripped));
        entries.push((
            meta.position.or(number_position),
            stripped.to_owned(),
            SidebarItem::Category { label, link, items },
        ));
    }

    entries.sort_by(|a, b| compare_position(a.0, b.0).then_with(|| a.1.cmp(&b.1)));
    entries.into_iter().map(|(_, _, item)| item).collect()
}

/// Positioned items first, ascending; unpositioned items after.
fn compare_position(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn read_category_meta(dir: &Path) -> CategoryMeta {
    let Some(path) = CATEGORY_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
    else {
        return CategoryMeta::default();
    };

    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| {
            if path.extension().is_some_and(|e| e == "json") {
                serde_json::from_str(&content).map_err(|e| e.to_string())
            } else {
                serde_yaml::from_str(&content).map_err(|e| e.to_string())
            }
        });

    match parsed {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse category file");
            CategoryMeta::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SidebarEntry {
    Id(String),
    Item(SidebarEntryItem),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SidebarEntryItem {
    Doc {
        id: String,
        label: Option<String>,
    },
    Category {
        label: String,
        #[serde(default)]
        link: Option<String>,
        #[serde(default)]
        items: Vec<SidebarEntry>,
    },
    Link {
        label: String,
        href: String,
    },
}

fn explicit_sidebar(
    namespace: &str,
    path: &Path,
    pages: &[Page],
) -> Result<Vec<SidebarItem>, SourceError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SourceError::MissingSidebar {
                namespace: namespace.to_owned(),
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(SourceError::io(path, e)),
    };

    // JSON is a subset of YAML, so one parser covers both formats.
    let entries: Vec<SidebarEntry> =
        serde_yaml::from_str(&content).map_err(|e| SourceError::Sidebar {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let resolver = ExplicitResolver {
        path,
        pages: pages.iter().map(|p| (p.id.as_str(), p)).collect(),
    };
    resolver.resolve(entries)
}

struct ExplicitResolver<'a> {
    path: &'a Path,
    pages: HashMap<&'a str, &'a Page>,
}

impl ExplicitResolver<'_> {
    fn resolve(&self, entries: Vec<SidebarEntry>) -> Result<Vec<SidebarItem>, SourceError> {
        entries.into_iter().map(|e| self.resolve_entry(e)).collect()
    }

    fn resolve_entry(&self, entry: SidebarEntry) -> Result<SidebarItem, SourceError> {
        match entry {
            SidebarEntry::Id(id) => self.doc(id, None),
            SidebarEntry::Item(SidebarEntryItem::Doc { id, label }) => self.doc(id, label),
            SidebarEntry::Item(SidebarEntryItem::Category { label, link, items }) => {
                if let Some(link) = &link {
                    self.page(link)?;
                }
                Ok(SidebarItem::Category {
                    label,
                    link,
                    items: self.resolve(items)?,
                })
            }
            SidebarEntry::Item(SidebarEntryItem::Link { label, href }) => {
                Ok(SidebarItem::Link { label, href })
            }
        }
    }

    fn doc(&self, id: String, label: Option<String>) -> Result<SidebarItem, SourceError> {
        let page = self.page(&id)?;
        let label = label.unwrap_or_else(|| page.label().to_owned());
        Ok(SidebarItem::Doc { id, label })
    }

    fn page(&self, id: &str) -> Result<&Page, SourceError> {
        self.pages
            .get(id)
            .copied()
            .ok_or_else(|| SourceError::UnknownSidebarDoc {
                path: self.path.to_path_buf(),
                id: id.to_owned(),
            })
    }
}
