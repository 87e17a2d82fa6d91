//! Target path resolution.
//!
//! Pure functions mapping a link path and its context to a composed URL or a
//! filesystem path. Dot segments are removed lexically; `..` never climbs
//! above the root.

use std::path::{Component, Path, PathBuf};

use docweave_config::RoutePath;

/// Resolve a relative URL reference against a page URL (RFC 3986).
///
/// The last segment of `page` is the current document and is dropped unless
/// `page_is_dir` is set (index pages serve their directory URL). Returns
/// `None` if a resulting segment is not a valid route segment.
///
/// - page=`/docs/guide/setup`, rel=`install` -> `/docs/guide/install`
/// - page=`/docs/guide` (index), rel=`install` -> `/docs/guide/install`
/// - page=`/docs/guide/setup`, rel=`../api/` -> `/docs/api`
#[must_use]
pub fn resolve_relative_url(page: &RoutePath, page_is_dir: bool, rel: &str) -> Option<RoutePath> {
    let mut segments: Vec<&str> = page.segments().iter().map(String::as_str).collect();
    if !page_is_dir {
        segments.pop();
    }
    push_segments(&mut segments, rel);
    RoutePath::from_segments(segments).ok()
}

/// Resolve a site-root link against the channel base.
///
/// Links already under the base are kept as is; anything else is treated as
/// relative to the base (`/guide` on channel `/next/` -> `/next/guide`).
#[must_use]
pub fn resolve_site_root(base: &RoutePath, path: &str) -> Option<RoutePath> {
    let mut segments = Vec::new();
    push_segments(&mut segments, path);
    let path = RoutePath::from_segments(segments).ok()?;
    if path.starts_with(base) {
        Some(path)
    } else {
        Some(base.join(&path))
    }
}

/// Resolve a relative file reference against a directory.
#[must_use]
pub fn resolve_physical_path(dir: &Path, rel: &str) -> PathBuf {
    let mut result = normalize(dir);
    for part in rel.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                result.pop();
            }
            _ => result.push(part),
        }
    }
    result
}

fn push_segments<'a>(segments: &mut Vec<&'a str>, rel: &'a str) {
    for part in rel.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(part),
        }
    }
}

/// Lexically remove `.` and `..` components.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other),
        }
    }
    result
}
