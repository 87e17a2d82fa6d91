//! YAML front matter of markdown pages.
//!
//! Front matter is a YAML block delimited by `---` lines at the very start of
//! a page. Only the fields docweave routes and orders by are parsed; unknown
//! keys are ignored so renderer-specific keys can live alongside.

use serde::Deserialize;

/// Front matter fields used for routing and sidebar ordering.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    /// Doc id override (replaces the file stem).
    pub id: Option<String>,
    /// URL override, absolute within the route or relative to the directory.
    pub slug: Option<String>,
    /// Page title.
    pub title: Option<String>,
    /// Sidebar label override.
    pub sidebar_label: Option<String>,
    /// Sidebar ordering hint.
    pub sidebar_position: Option<f64>,
}

/// Split a page into front matter and body.
///
/// Returns the default front matter and the whole content when no block is
/// present.
///
/// # Errors
///
/// Returns the YAML error message when the block is malformed or unterminated.
pub fn split(content: &str) -> Result<(FrontMatter, &str), String> {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok((FrontMatter::default(), content));
    };

    let (yaml, body) = find_closing(rest).ok_or_else(|| "unterminated front matter".to_owned())?;

    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return Ok((FrontMatter::default(), body));
    }

    let front_matter =
        serde_yaml::from_str(trimmed).map_err(|e| format!("Invalid YAML: {e}"))?;
    Ok((front_matter, body))
}

/// Find the closing `---` line, returning (yaml, body).
fn find_closing(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_front_matter() {
        let (fm, body) = split("# Title\n\nText").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "# Title\n\nText");
    }

    #[test]
    fn test_all_fields() {
        let content = "---\nid: setup\nslug: /start\ntitle: Setup\nsidebar_label: Start here\nsidebar_position: 2\n---\n# Body\n";
        let (fm, body) = split(content).unwrap();
        assert_eq!(fm.id.as_deref(), Some("setup"));
        assert_eq!(fm.slug.as_deref(), Some("/start"));
        assert_eq!(fm.title.as_deref(), Some("Setup"));
        assert_eq!(fm.sidebar_label.as_deref(), Some("Start here"));
        assert_eq!(fm.sidebar_position, Some(2.0));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_fractional_position_and_unknown_keys() {
        let content = "---\nsidebar_position: 2.5\nkeywords: [a, b]\n---\nbody";
        let (fm, body) = split(content).unwrap();
        assert_eq!(fm.sidebar_position, Some(2.5));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = split("---\n---\nbody").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_crlf_line_endings() {
        let (fm, body) = split("---\r\ntitle: Win\r\n---\r\nbody").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Win"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_unterminated_block() {
        let err = split("---\ntitle: Oops\n# Body").unwrap_err();
        assert!(err.contains("unterminated"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = split("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(err.contains("Invalid YAML"));
    }

    #[test]
    fn test_thematic_break_later_in_body_is_not_front_matter() {
        let (fm, body) = split("# Title\n\n---\n\nMore").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert!(body.starts_with("# Title"));
    }
}
