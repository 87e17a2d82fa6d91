//! Link integrity checking over a composed route table.
//!
//! Every page body is scanned for cross-references (in parallel), an index of
//! composed page URLs and their anchors is built, and each reference is
//! classified:
//!
//! - `Resolved`: the target page (and anchor, if any) exists
//! - `BrokenPath`: no page is served at the target URL
//! - `BrokenAnchor`: the page exists but has no such heading
//!
//! External links are not checked.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use docweave_config::{LinkPolicy, LinksConfig, RoutePath};
use docweave_routes::RouteTable;
use rayon::prelude::*;

use crate::extract::{Extracted, extract};
use crate::kind::{LinkKind, is_markdown_path, split_target};
use crate::resolve::{normalize, resolve_physical_path, resolve_relative_url, resolve_site_root};

/// Classification of one cross-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkStatus {
    /// Target page and anchor exist.
    Resolved,
    /// Target page does not exist.
    BrokenPath,
    /// Target page exists but the anchor does not.
    BrokenAnchor,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolved => "resolved",
            Self::BrokenPath => "broken link",
            Self::BrokenAnchor => "broken anchor",
        })
    }
}

/// An internal link found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    /// Composed URL of the linking page.
    pub source: RoutePath,
    /// True if the linking page is an index page (its URL is a directory).
    pub source_is_index: bool,
    /// Markdown file of the linking page.
    pub file: PathBuf,
    /// 1-based line of the link in the page body.
    pub line: usize,
    /// Link target as written.
    pub target: String,
}

/// A cross-reference that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LinkDiagnostic {
    /// Composed URL of the linking page.
    pub source: RoutePath,
    /// Link target as written.
    pub target: String,
    /// Markdown file of the linking page.
    pub file: PathBuf,
    /// 1-based line of the link in the page body.
    pub line: usize,
    /// Classification.
    pub status: LinkStatus,
}

impl fmt::Display for LinkDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} '{}' on page {}",
            self.file.display(),
            self.line,
            self.status,
            self.target,
            self.source
        )
    }
}

/// Fatal link diagnostics under the active policy.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// At least one diagnostic is configured as an error.
    #[error("{} broken link(s):\n{}", .0.len(), format_list(.0))]
    Broken(Vec<LinkDiagnostic>),
}

fn format_list(diagnostics: &[LinkDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Outcome of checking every cross-reference of a route table.
///
/// Diagnostics are sorted by source page, then target, and de-duplicated, so
/// repeated runs produce identical reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Number of internal references checked.
    pub checked: usize,
    /// Unresolved references.
    pub diagnostics: Vec<LinkDiagnostic>,
}

impl LinkReport {
    /// True if every reference resolved.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Apply link policies.
    ///
    /// Diagnostics configured as `warn` are logged and returned; `ignore`
    /// drops them.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Broken`] with every diagnostic configured as
    /// `error`.
    pub fn apply_policy(self, config: &LinksConfig) -> Result<Vec<LinkDiagnostic>, LinkError> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for diagnostic in self.diagnostics {
            let policy = match diagnostic.status {
                LinkStatus::BrokenPath => config.on_broken_links,
                LinkStatus::BrokenAnchor => config.on_broken_anchors,
                LinkStatus::Resolved => LinkPolicy::Ignore,
            };
            match policy {
                LinkPolicy::Error => errors.push(diagnostic),
                LinkPolicy::Warn => {
                    tracing::warn!(
                        file = %diagnostic.file.display(),
                        line = diagnostic.line,
                        target = %diagnostic.target,
                        "{}",
                        diagnostic.status
                    );
                    warnings.push(diagnostic);
                }
                LinkPolicy::Ignore => {}
            }
        }

        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(LinkError::Broken(errors))
        }
    }
}

/// Composed pages and their anchors, plus the file-to-URL mapping used for
/// `.md` links.
#[derive(Debug, Default)]
pub struct LinkIndex {
    anchors: HashMap<RoutePath, BTreeSet<String>>,
    files: HashMap<PathBuf, RoutePath>,
}

impl LinkIndex {
    /// True if a page is served at `url`.
    #[must_use]
    pub fn contains(&self, url: &RoutePath) -> bool {
        self.anchors.contains_key(url)
    }

    /// Anchors of the page at `url`.
    #[must_use]
    pub fn anchors(&self, url: &RoutePath) -> Option<&BTreeSet<String>> {
        self.anchors.get(url)
    }

    /// Composed URL of a markdown file.
    #[must_use]
    pub fn url_of_file(&self, file: &Path) -> Option<&RoutePath> {
        self.files.get(&normalize(file))
    }
}

/// Cross-references and page index of a route table.
pub struct LinkChecker {
    base: RoutePath,
    index: LinkIndex,
    references: Vec<CrossReference>,
}

impl LinkChecker {
    /// Extract references and anchors from every page of the table.
    #[must_use]
    pub fn new(table: &RouteTable) -> Self {
        let pages: Vec<_> = table
            .routes()
            .iter()
            .flat_map(|route| route.pages.iter().map(move |page| (route, page)))
            .collect();

        let extracted: Vec<Extracted> = pages
            .par_iter()
            .map(|(_, page)| extract(&page.body))
            .collect();

        let mut index = LinkIndex::default();
        let mut references = Vec::new();
        for ((route, page), extracted) in pages.iter().zip(extracted) {
            let url = route.page_url(page);
            index.files.insert(normalize(&page.file), url.clone());
            for link in extracted.links {
                references.push(CrossReference {
                    source: url.clone(),
                    source_is_index: page.is_index,
                    file: page.file.clone(),
                    line: link.line,
                    target: link.target,
                });
            }
            index.anchors.insert(url, extracted.anchors);
        }

        Self {
            base: table.channel().base.clone(),
            index,
            references,
        }
    }

    /// All extracted references, in route and page order.
    #[must_use]
    pub fn references(&self) -> &[CrossReference] {
        &self.references
    }

    /// Page index.
    #[must_use]
    pub fn index(&self) -> &LinkIndex {
        &self.index
    }

    /// Classify one reference. Returns `None` for links that are not checked
    /// (external URLs, site-root links to non-page files).
    #[must_use]
    pub fn classify(&self, reference: &CrossReference) -> Option<LinkStatus> {
        let (path, anchor) = split_target(&reference.target);

        match LinkKind::parse(&reference.target) {
            LinkKind::External(_) => None,
            LinkKind::Fragment(anchor) => Some(self.check_url(&reference.source, Some(anchor))),
            LinkKind::SiteRoot(_) => {
                if has_asset_extension(path) {
                    return None;
                }
                Some(match resolve_site_root(&self.base, path) {
                    Some(url) => self.check_url(&url, anchor),
                    None => LinkStatus::BrokenPath,
                })
            }
            LinkKind::Relative(_) if path.is_empty() => {
                Some(self.check_url(&reference.source, anchor))
            }
            LinkKind::Relative(_) if is_markdown_path(path) => {
                let dir = reference.file.parent().unwrap_or(Path::new(""));
                let file = resolve_physical_path(dir, path);
                Some(match self.index.url_of_file(&file) {
                    Some(url) => self.check_url(url, anchor),
                    None => LinkStatus::BrokenPath,
                })
            }
            LinkKind::Relative(_) if has_asset_extension(path) => {
                let dir = reference.file.parent().unwrap_or(Path::new(""));
                Some(if resolve_physical_path(dir, path).is_file() {
                    LinkStatus::Resolved
                } else {
                    LinkStatus::BrokenPath
                })
            }
            LinkKind::Relative(_) => Some(
                match resolve_relative_url(&reference.source, reference.source_is_index, path) {
                    Some(url) => self.check_url(&url, anchor),
                    None => LinkStatus::BrokenPath,
                },
            ),
        }
    }

    /// Classify every reference and build the report.
    #[must_use]
    pub fn check(&self) -> LinkReport {
        let mut report = LinkReport::default();

        for reference in &self.references {
            match self.classify(reference) {
                None => {}
                Some(LinkStatus::Resolved) => report.checked += 1,
                Some(status) => {
                    report.checked += 1;
                    report.diagnostics.push(LinkDiagnostic {
                        source: reference.source.clone(),
                        target: reference.target.clone(),
                        file: reference.file.clone(),
                        line: reference.line,
                        status,
                    });
                }
            }
        }

        report.diagnostics.sort();
        report
            .diagnostics
            .dedup_by(|a, b| a.source == b.source && a.target == b.target);

        tracing::info!(
            checked = report.checked,
            broken = report.diagnostics.len(),
            "Checked links"
        );

        report
    }

    fn check_url(&self, url: &RoutePath, anchor: Option<&str>) -> LinkStatus {
        let Some(anchors) = self.index.anchors(url) else {
            return LinkStatus::BrokenPath;
        };
        match anchor {
            Some(anchor) if !anchor.is_empty() && !anchors.contains(anchor) => {
                LinkStatus::BrokenAnchor
            }
            _ => LinkStatus::Resolved,
        }
    }
}

/// Check every cross-reference of a route table.
#[must_use]
pub fn check_links(table: &RouteTable) -> LinkReport {
    LinkChecker::new(table).check()
}

/// True if the last path segment has a non-markdown file extension.
///
/// Extensions need a letter, so version segments like `0.11` are not files.
fn has_asset_extension(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && ext.chars().any(|c| c.is_ascii_alphabetic())
                && !is_markdown_path(last)
        }
        None => false,
    }
}
