//! Page discovery by filesystem walking.
//!
//! Walks one content root and turns every markdown file into a [`Page`]
//! addressed by a slug relative to its route. Hidden entries (`.`) and
//! partials (`_`) are skipped, `index.md` and `README.md` map to their
//! directory, and numeric prefixes (`01-intro.md`) are stripped from URLs and
//! kept as ordering hints.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use docweave_config::RoutePath;
use regex::Regex;

use crate::error::SourceError;
use crate::front_matter::{self, FrontMatter};
use crate::materialize::RouteCandidate;

static H1_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("H1 regex is valid"));

/// A markdown page of one content root.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Absolute path of the markdown file.
    pub file: PathBuf,
    /// Path relative to the content root.
    pub rel_path: PathBuf,
    /// Doc id (`guides/setup`), used by explicit sidebars.
    pub id: String,
    /// URL path within the route (`/guides/setup`, `/` for the root index).
    pub slug: RoutePath,
    /// Page title (front matter > first H1 > file name).
    pub title: String,
    /// Sidebar label override.
    pub sidebar_label: Option<String>,
    /// Sidebar ordering hint (front matter or numeric prefix).
    pub position: Option<f64>,
    /// True for `index.md` / `README.md`.
    pub is_index: bool,
    /// Markdown content without front matter.
    pub body: String,
}

impl Page {
    /// Label shown in the sidebar.
    #[must_use]
    pub fn label(&self) -> &str {
        self.sidebar_label.as_deref().unwrap_or(&self.title)
    }
}

/// Scan the content root of a route candidate.
///
/// Pages are returned sorted by slug, so the result does not depend on
/// directory listing order.
///
/// # Errors
///
/// Returns [`SourceError`] on unreadable files, malformed front matter,
/// unroutable file names, or two pages sharing a slug.
pub fn scan_pages(candidate: &RouteCandidate) -> Result<Vec<Page>, SourceError> {
    let scanner = Scanner {
        root: &candidate.root,
    };
    let mut pages = Vec::new();
    scanner.scan_directory(&candidate.root, &[], &mut pages)?;

    pages.sort_by(|a, b| a.slug.cmp(&b.slug).then_with(|| a.rel_path.cmp(&b.rel_path)));

    if let Some(pair) = pages.windows(2).find(|w| w[0].slug == w[1].slug) {
        return Err(SourceError::DuplicatePage {
            namespace: candidate.namespace.clone(),
            slug: pair[0].slug.to_string(),
            first: pair[0].rel_path.clone(),
            second: pair[1].rel_path.clone(),
        });
    }

    tracing::debug!(
        namespace = %candidate.namespace,
        route = %candidate.route,
        pages = pages.len(),
        "Scanned content root"
    );

    Ok(pages)
}

struct Scanner<'a> {
    root: &'a Path,
}

impl Scanner<'_> {
    /// Scan a directory and collect its pages, recursing into subdirectories.
    ///
    /// `id_prefix` holds the directory names from the root, numeric prefixes
    /// already stripped.
    fn scan_directory(
        &self,
        dir: &Path,
        id_prefix: &[String],
        pages: &mut Vec<Page>,
    ) -> Result<(), SourceError> {
        let entries = fs::read_dir(dir).map_err(|e| SourceError::io(dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| SourceError::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                let (_, stripped) = strip_number_prefix(&name);
                let mut child_prefix = id_prefix.to_vec();
                child_prefix.push(stripped.to_owned());
                self.scan_directory(&path, &child_prefix, pages)?;
            } else if is_page_file(&path) {
                pages.push(self.build_page(path, id_prefix)?);
            }
        }

        Ok(())
    }

    fn build_page(&self, file: PathBuf, id_prefix: &[String]) -> Result<Page, SourceError> {
        let content = fs::read_to_string(&file).map_err(|e| SourceError::io(&file, e))?;
        let (front_matter, body) =
            front_matter::split(&content).map_err(|message| SourceError::FrontMatter {
                path: file.clone(),
                message,
            })?;

        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_index = stem.eq_ignore_ascii_case("index") || stem.eq_ignore_ascii_case("readme");
        let (number_position, stripped_stem) = strip_number_prefix(&stem);

        let id_last = match (&front_matter.id, is_index) {
            (Some(id), _) => id.clone(),
            (None, true) => "index".to_owned(),
            (None, false) => stripped_stem.to_owned(),
        };
        let id = if id_prefix.is_empty() {
            id_last.clone()
        } else {
            format!("{}/{id_last}", id_prefix.join("/"))
        };

        let slug = page_slug(&front_matter, id_prefix, is_index, &id_last).map_err(|source| {
            SourceError::InvalidPagePath {
                path: file.clone(),
                source,
            }
        })?;

        let title = front_matter
            .title
            .clone()
            .or_else(|| extract_h1(body))
            .unwrap_or_else(|| {
                let fallback = if is_index {
                    id_prefix.last().map_or("index", String::as_str)
                } else {
                    id_last.as_str()
                };
                titlecase_from_slug(fallback)
            });

        let rel_path = file.strip_prefix(self.root).unwrap_or(&file).to_path_buf();

        Ok(Page {
            rel_path,
            id,
            slug,
            title,
            sidebar_label: front_matter.sidebar_label,
            position: front_matter.sidebar_position.or(number_position),
            is_index,
            body: body.to_owned(),
            file,
        })
    }
}

/// Compute the slug of a page.
///
/// A front-matter slug starting with `/` is absolute within the route; any
/// other slug is relative to the page's directory.
fn page_slug(
    front_matter: &FrontMatter,
    id_prefix: &[String],
    is_index: bool,
    id_last: &str,
) -> Result<RoutePath, docweave_config::RoutePathError> {
    let dir = RoutePath::from_segments(id_prefix)?;
    match front_matter.slug.as_deref() {
        Some(slug) if slug.starts_with('/') => RoutePath::parse(slug),
        Some(slug) => {
            let relative = RoutePath::parse(&format!("/{slug}"))?;
            Ok(dir.join(&relative))
        }
        None if is_index => Ok(dir),
        None => dir.child(id_last),
    }
}

fn is_page_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("mdx"))
}

fn extract_h1(body: &str) -> Option<String> {
    let caps = H1_REGEX.captures(body)?;
    let title = caps[1].trim().trim_end_matches('#').trim();
    (!title.is_empty()).then(|| title.to_owned())
}

/// Split a numeric ordering prefix from a file or directory name.
///
/// `01-intro` -> `(Some(1.0), "intro")`. Names without a separator after the
/// digits, or with nothing after it, are returned unchanged.
pub(crate) fn strip_number_prefix(name: &str) -> (Option<f64>, &str) {
    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return (None, name);
    }
    let rest = &name[digits..];
    let stripped = rest.trim_start_matches(['-', '_', '.', ' ']);
    if stripped.len() == rest.len() || stripped.is_empty() {
        return (None, name);
    }
    (name[..digits].parse().ok(), stripped)
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
pub(crate) fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::candidate;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn slugs(pages: &[Page]) -> Vec<String> {
        pages.iter().map(|p| p.slug.to_string()).collect()
    }

    #[test]
    fn test_strip_number_prefix() {
        assert_eq!(strip_number_prefix("01-intro"), (Some(1.0), "intro"));
        assert_eq!(strip_number_prefix("2_setup"), (Some(2.0), "setup"));
        assert_eq!(strip_number_prefix("10. Guide"), (Some(10.0), "Guide"));
        assert_eq!(strip_number_prefix("intro"), (None, "intro"));
        assert_eq!(strip_number_prefix("404"), (None, "404"));
        assert_eq!(strip_number_prefix("3d"), (None, "3d"));
    }

    #[test]
    fn test_titlecase_from_slug() {
        assert_eq!(titlecase_from_slug("setup-guide"), "Setup Guide");
        assert_eq!(titlecase_from_slug("my_page"), "My Page");
        assert_eq!(titlecase_from_slug(""), "");
    }

    #[test]
    fn test_scan_maps_files_to_slugs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "# Home");
        write(dir.path(), "guide.md", "# Guide");
        write(dir.path(), "domain/index.md", "# Domain");
        write(dir.path(), "domain/setup.mdx", "# Setup");
        write(dir.path(), "domain/README.txt", "ignored");

        let pages = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap();
        assert_eq!(slugs(&pages), ["/", "/domain", "/domain/setup", "/guide"]);

        let setup = pages.iter().find(|p| p.id == "domain/setup").unwrap();
        assert_eq!(setup.title, "Setup");
        assert_eq!(setup.rel_path, PathBuf::from("domain/setup.mdx"));
        assert!(!setup.is_index);
        assert!(pages.iter().find(|p| p.id == "domain/index").unwrap().is_index);
    }

    #[test]
    fn test_scan_skips_hidden_and_partials() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".hidden.md", "# Hidden");
        write(dir.path(), "_partial.md", "# Partial");
        write(dir.path(), "_shared/snippet.md", "# Snippet");
        write(dir.path(), "visible.md", "# Visible");

        let pages = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap();
        assert_eq!(slugs(&pages), ["/visible"]);
    }

    #[test]
    fn test_number_prefixes_stripped_and_used_as_position() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "02-guides/01-install.md", "# Install");

        let pages = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap();
        assert_eq!(pages[0].slug.to_string(), "/guides/install");
        assert_eq!(pages[0].id, "guides/install");
        assert_eq!(pages[0].position, Some(1.0));
    }

    #[test]
    fn test_front_matter_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "guides/01-a.md",
            "---\nid: alpha\ntitle: Alpha Page\nsidebar_position: 5\nsidebar_label: A\n---\n# Ignored H1\n",
        );
        write(dir.path(), "guides/b.md", "---\nslug: /bee\n---\ntext");
        write(dir.path(), "guides/c.md", "---\nslug: sea/shore\n---\ntext");

        let pages = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap();
        assert_eq!(slugs(&pages), ["/bee", "/guides/alpha", "/guides/sea/shore"]);

        let alpha = pages.iter().find(|p| p.id == "guides/alpha").unwrap();
        assert_eq!(alpha.title, "Alpha Page");
        assert_eq!(alpha.label(), "A");
        assert_eq!(alpha.position, Some(5.0));
        assert_eq!(alpha.body, "# Ignored H1\n");

        let bee = pages.iter().find(|p| p.id == "guides/b").unwrap();
        assert_eq!(bee.title, "B");
    }

    #[test]
    fn test_duplicate_slug_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "guide.md", "# A");
        write(dir.path(), "guide/index.md", "# B");

        let err = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap_err();
        assert!(matches!(err, SourceError::DuplicatePage { ref slug, .. } if slug == "/guide"));
        let msg = err.to_string();
        assert!(msg.contains("guide.md"));
        assert!(msg.contains("docs"));
    }

    #[test]
    fn test_malformed_front_matter_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.md", "---\ntitle: [oops\n---\n");
        let err = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap_err();
        assert!(matches!(err, SourceError::FrontMatter { .. }));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_unroutable_file_name_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "my page.md", "# Spaces");
        let err = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap_err();
        assert!(matches!(err, SourceError::InvalidPagePath { .. }));
    }

    #[test]
    fn test_title_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "getting-started.md", "No heading here");
        write(dir.path(), "api-reference/index.md", "");
        write(dir.path(), "closing.md", "# Closing hashes ##");

        let pages = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap();
        let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Api Reference", "Closing hashes", "Getting Started"]);
    }

    #[test]
    fn test_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let pages = scan_pages(&candidate("docs", dir.path(), "/docs")).unwrap();
        assert!(pages.is_empty());
    }
}
