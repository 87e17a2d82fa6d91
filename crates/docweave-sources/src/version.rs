//! Version label ordering.
//!
//! Snapshot labels are free-form strings taken from directory names
//! (`version-0.12` -> `0.12`). They are ordered by parsed version precedence
//! so the result is independent of directory listing order.

use std::cmp::Ordering;

/// A version label with its parsed precedence.
///
/// Short labels are padded before parsing (`0.12` -> `0.12.0`, `v2` ->
/// `2.0.0`). Labels that still do not parse rank below every parsable label
/// and compare lexically among themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLabel {
    raw: String,
    parsed: Option<semver::Version>,
}

impl VersionLabel {
    /// Parse a label.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_owned(),
            parsed: parse_lenient(raw),
        }
    }

    /// Label as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed version, if the label is version-like.
    #[must_use]
    pub fn version(&self) -> Option<&semver::Version> {
        self.parsed.as_ref()
    }
}

impl Ord for VersionLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.parsed, &other.parsed) {
            (Some(a), Some(b)) => a.cmp(b).then_with(|| self.raw.cmp(&other.raw)),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl PartialOrd for VersionLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort labels newest first.
pub fn sort_descending(labels: &mut [VersionLabel]) {
    labels.sort_by(|a, b| b.cmp(a));
}

fn parse_lenient(raw: &str) -> Option<semver::Version> {
    let trimmed = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);

    let components = core.split('.').count();
    if core.is_empty() || components > 3 {
        return None;
    }
    let padding = ".0".repeat(3 - components);
    semver::Version::parse(&format!("{core}{padding}{suffix}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(labels: &[&str]) -> Vec<String> {
        let mut labels: Vec<_> = labels.iter().map(|l| VersionLabel::new(l)).collect();
        sort_descending(&mut labels);
        labels.iter().map(|l| l.as_str().to_owned()).collect()
    }

    #[test]
    fn test_parse_short_labels() {
        assert_eq!(
            VersionLabel::new("0.12").version(),
            Some(&semver::Version::new(0, 12, 0))
        );
        assert_eq!(
            VersionLabel::new("v2").version(),
            Some(&semver::Version::new(2, 0, 0))
        );
        assert_eq!(
            VersionLabel::new("1.2.3").version(),
            Some(&semver::Version::new(1, 2, 3))
        );
        assert!(VersionLabel::new("legacy").version().is_none());
        assert!(VersionLabel::new("1.2.3.4").version().is_none());
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        assert_eq!(sorted(&["0.9", "0.12", "0.11"]), ["0.12", "0.11", "0.9"]);
    }

    #[test]
    fn test_prerelease_below_release() {
        assert_eq!(
            sorted(&["1.0-rc.1", "1.0", "0.99"]),
            ["1.0", "1.0-rc.1", "0.99"]
        );
    }

    #[test]
    fn test_unparsable_after_parsable() {
        assert_eq!(
            sorted(&["alpha", "0.1", "beta"]),
            ["0.1", "beta", "alpha"]
        );
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let a = sorted(&["0.11", "0.12", "0.2", "legacy"]);
        let b = sorted(&["legacy", "0.2", "0.12", "0.11"]);
        assert_eq!(a, b);
    }
}
