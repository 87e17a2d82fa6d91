//! Link classification utilities.

/// Syntactic classification of a link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// URL with a scheme (`https:`, `mailto:`) or protocol-relative (`//host`).
    External(&'a str),
    /// Same-page anchor (`#section`). Value is the anchor without `#`.
    Fragment(&'a str),
    /// Path relative to the channel base (`/guide/setup`).
    SiteRoot(&'a str),
    /// Path relative to the current page or file (`../setup.md`, `other`).
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[must_use]
    pub fn parse(link: &'a str) -> Self {
        if is_external_link(link) {
            Self::External(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if let Some(anchor) = link.strip_prefix("./#") {
            Self::Fragment(anchor)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::Relative(link)
        }
    }
}

/// True for links with a URL scheme or a protocol-relative prefix.
#[must_use]
pub fn is_external_link(link: &str) -> bool {
    link.starts_with("//")
        || link.find(':').is_some_and(|pos| {
            pos > 0
                && link[..pos]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
}

/// Split a link into path and anchor, dropping any query string.
///
/// `guide?tab=1#setup` -> `("guide", Some("setup"))`.
#[must_use]
pub fn split_target(link: &str) -> (&str, Option<&str>) {
    let (path, anchor) = match link.split_once('#') {
        Some((path, anchor)) => (path, Some(anchor)),
        None => (link, None),
    };
    let path = path.split_once('?').map_or(path, |(p, _)| p);
    (path, anchor)
}

/// True if the path names a markdown source file.
#[must_use]
pub fn is_markdown_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".md") || lower.ends_with(".mdx")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_external() {
        assert!(matches!(
            LinkKind::parse("https://example.com"),
            LinkKind::External("https://example.com")
        ));
        assert!(matches!(
            LinkKind::parse("mailto:user@example.com"),
            LinkKind::External(_)
        ));
        assert!(matches!(
            LinkKind::parse("//cdn.example.com/x.js"),
            LinkKind::External(_)
        ));
    }

    #[test]
    fn test_parse_fragment() {
        assert!(matches!(LinkKind::parse("#section"), LinkKind::Fragment("section")));
        assert!(matches!(LinkKind::parse("./#setup"), LinkKind::Fragment("setup")));
        assert!(matches!(LinkKind::parse("#"), LinkKind::Fragment("")));
    }

    #[test]
    fn test_parse_site_root() {
        assert!(matches!(
            LinkKind::parse("/guide/setup#install"),
            LinkKind::SiteRoot("/guide/setup#install")
        ));
    }

    #[test]
    fn test_parse_relative() {
        assert!(matches!(LinkKind::parse("../other.md"), LinkKind::Relative("../other.md")));
        assert!(matches!(LinkKind::parse("setup"), LinkKind::Relative("setup")));
        // A colon after a slash is not a scheme
        assert!(matches!(LinkKind::parse("./a:b"), LinkKind::Relative(_)));
    }

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("guide?tab=1#setup"), ("guide", Some("setup")));
        assert_eq!(split_target("/guide"), ("/guide", None));
        assert_eq!(split_target("/guide#"), ("/guide", Some("")));
        assert_eq!(split_target("page.md?raw"), ("page.md", None));
    }

    #[test]
    fn test_is_markdown_path() {
        assert!(is_markdown_path("../setup.md"));
        assert!(is_markdown_path("Intro.MDX"));
        assert!(!is_markdown_path("setup"));
        assert!(!is_markdown_path("diagram.png"));
    }
}
