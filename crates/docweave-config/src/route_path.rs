//! Validated absolute URL paths.
//!
//! Every prefix in the composed site (channel base, source route, version
//! segment, page slug) is a [`RoutePath`]. Comparisons are segment-wise, so
//! `/guide` is a prefix of `/guide/setup` but not of `/guide-extra`.

use std::fmt;

/// Reasons a string is not a well-formed absolute route path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutePathError {
    /// Path does not start with `/`.
    #[error("'{0}' must start with '/'")]
    NotAbsolute(String),
    /// Path contains `//`.
    #[error("'{0}' contains an empty segment")]
    EmptySegment(String),
    /// Path contains a `.` or `..` segment.
    #[error("'{0}' contains a relative segment ('.' or '..')")]
    DotSegment(String),
    /// Path contains a character that cannot appear in a route.
    #[error("'{path}' contains invalid character {ch:?}")]
    InvalidChar {
        /// Offending path.
        path: String,
        /// Offending character.
        ch: char,
    },
}

/// Absolute URL path split into non-empty segments.
///
/// The root path `/` has no segments. Display form never carries a trailing
/// slash except for the root; use [`RoutePath::to_dir_string`] for the
/// `/next/` form used as a base URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath {
    segments: Vec<String>,
}

impl RoutePath {
    /// The root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and validate an absolute path.
    ///
    /// A single trailing slash is accepted and dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use docweave_config::RoutePath;
    ///
    /// let path = RoutePath::parse("/next/api/").unwrap();
    /// assert_eq!(path.to_string(), "/next/api");
    /// assert!(RoutePath::parse("next").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, RoutePathError> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(RoutePathError::NotAbsolute(raw.to_owned()));
        };
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in rest.split('/') {
            validate_segment(segment, raw)?;
            segments.push(segment.to_owned());
        }
        Ok(Self { segments })
    }

    /// Build a path from already split segments, validating each one.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, RoutePathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = Self::root();
        for segment in segments {
            path = path.child(segment.as_ref())?;
        }
        Ok(path)
    }

    /// Path segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a single validated segment.
    pub fn child(&self, segment: &str) -> Result<Self, RoutePathError> {
        let display = format!("{self}/{segment}");
        validate_segment(segment, &display)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        Ok(Self { segments })
    }

    /// Concatenate two paths (`/next` + `/api` = `/next/api`).
    #[must_use]
    pub fn join(&self, other: &RoutePath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Segment-wise prefix test. Every path starts with `/`.
    #[must_use]
    pub fn starts_with(&self, prefix: &RoutePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Remaining segments after `prefix`, if `prefix` is a segment prefix.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &RoutePath) -> Option<RoutePath> {
        self.segments
            .strip_prefix(prefix.segments.as_slice())
            .map(|rest| Self {
                segments: rest.to_vec(),
            })
    }

    /// Path with a trailing slash (`/`, `/next/`).
    #[must_use]
    pub fn to_dir_string(&self) -> String {
        if self.is_root() {
            "/".to_owned()
        } else {
            format!("{self}/")
        }
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

fn validate_segment(segment: &str, path: &str) -> Result<(), RoutePathError> {
    match segment {
        "" => return Err(RoutePathError::EmptySegment(path.to_owned())),
        "." | ".." => return Err(RoutePathError::DotSegment(path.to_owned())),
        _ => {}
    }
    if let Some(ch) = segment
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '?' | '#' | '\\' | '/'))
    {
        return Err(RoutePathError::InvalidChar {
            path: path.to_owned(),
            ch,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> RoutePath {
        RoutePath::parse(raw).unwrap()
    }

    #[test]
    fn test_parse_root() {
        assert!(path("/").is_root());
        assert_eq!(path("/").to_string(), "/");
        assert_eq!(path("/").to_dir_string(), "/");
    }

    #[test]
    fn test_parse_trailing_slash() {
        assert_eq!(path("/next/"), path("/next"));
        assert_eq!(path("/next/").to_dir_string(), "/next/");
        assert_eq!(path("/a/b").segments(), ["a", "b"]);
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert_eq!(
            RoutePath::parse("docs"),
            Err(RoutePathError::NotAbsolute("docs".to_owned()))
        );
        assert!(RoutePath::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        assert!(matches!(
            RoutePath::parse("/a//b"),
            Err(RoutePathError::EmptySegment(_))
        ));
        assert!(matches!(
            RoutePath::parse("//"),
            Err(RoutePathError::EmptySegment(_))
        ));
    }

    #[test]
    fn test_parse_rejects_dot_segments() {
        assert!(matches!(
            RoutePath::parse("/a/../b"),
            Err(RoutePathError::DotSegment(_))
        ));
        assert!(matches!(
            RoutePath::parse("/./b"),
            Err(RoutePathError::DotSegment(_))
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_chars() {
        for raw in ["/a b", "/a?x=1", "/a#frag", "/a\\b"] {
            assert!(
                matches!(
                    RoutePath::parse(raw),
                    Err(RoutePathError::InvalidChar { .. })
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_starts_with_is_segment_wise() {
        assert!(path("/guide/setup").starts_with(&path("/guide")));
        assert!(path("/guide").starts_with(&path("/guide")));
        assert!(!path("/guide-extra").starts_with(&path("/guide")));
        assert!(path("/anything").starts_with(&RoutePath::root()));
    }

    #[test]
    fn test_join_and_strip_prefix() {
        let joined = path("/next").join(&path("/api"));
        assert_eq!(joined.to_string(), "/next/api");
        assert_eq!(path("/").join(&path("/api")), path("/api"));
        assert_eq!(
            joined.strip_prefix(&path("/next")),
            Some(path("/api"))
        );
        assert_eq!(joined.strip_prefix(&path("/other")), None);
    }

    #[test]
    fn test_child_validates_segment() {
        assert_eq!(path("/docs").child("0.12").unwrap(), path("/docs/0.12"));
        assert!(path("/docs").child("a/b").is_err());
        assert!(path("/docs").child("").is_err());
    }

    #[test]
    fn test_from_segments() {
        assert_eq!(
            RoutePath::from_segments(["guides", "setup"]).unwrap(),
            path("/guides/setup")
        );
        assert!(RoutePath::from_segments(Vec::<String>::new()).unwrap().is_root());
    }
}
