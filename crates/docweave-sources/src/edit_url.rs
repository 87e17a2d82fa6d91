//! Edit-link templates.
//!
//! A template such as `https://github.com/org/site/edit/{branch}/{path}` is
//! parsed once at registration and rendered per page. Placeholders:
//!
//! - `{branch}` - branch of the active channel
//! - `{version}` - version label (empty for unversioned sources)
//! - `{path}` - page file path relative to the site directory

const PLACEHOLDERS: [&str; 3] = ["branch", "version", "path"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Branch,
    Version,
    Path,
}

/// Parsed edit-link template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditUrlTemplate {
    raw: String,
    parts: Vec<Part>,
}

impl EditUrlTemplate {
    /// Parse a template, rejecting unknown or unterminated placeholders.
    ///
    /// The error string describes the problem; callers attach the namespace.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            if rest[..open].contains('}') {
                return Err(format!("unmatched '}}' in '{raw}'"));
            }
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                return Err(format!("unterminated placeholder in '{raw}'"));
            };
            let name = &after[..close];
            let part = match name {
                "branch" => Part::Branch,
                "version" => Part::Version,
                "path" => Part::Path,
                _ => {
                    return Err(format!(
                        "unknown placeholder '{{{name}}}' (expected one of: {})",
                        PLACEHOLDERS.join(", ")
                    ));
                }
            };
            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            }
            parts.push(part);
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(format!("unmatched '}}' in '{raw}'"));
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_owned(),
            parts,
        })
    }

    /// Template as written in the config.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Render the edit link of one page.
    ///
    /// `path` is joined with `/` separators regardless of platform.
    #[must_use]
    pub fn render(&self, branch: &str, version: Option<&str>, path: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + path.len());
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Branch => out.push_str(branch),
                Part::Version => out.push_str(version.unwrap_or_default()),
                Part::Path => out.push_str(&path.replace('\\', "/")),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_all_placeholders() {
        let template =
            EditUrlTemplate::parse("https://github.com/org/site/edit/{branch}/{path}?v={version}")
                .unwrap();
        assert_eq!(
            template.render("next", Some("0.12"), "versioned/version-0.12/intro.md"),
            "https://github.com/org/site/edit/next/versioned/version-0.12/intro.md?v=0.12"
        );
    }

    #[test]
    fn test_render_without_version() {
        let template = EditUrlTemplate::parse("https://x.dev/{branch}/{version}{path}").unwrap();
        assert_eq!(template.render("main", None, "a.md"), "https://x.dev/main/a.md");
    }

    #[test]
    fn test_render_literal_only() {
        let template = EditUrlTemplate::parse("https://x.dev/edit").unwrap();
        assert_eq!(template.render("main", None, "a.md"), "https://x.dev/edit");
        assert_eq!(template.as_str(), "https://x.dev/edit");
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = EditUrlTemplate::parse("https://x.dev/{locale}/{path}").unwrap_err();
        assert!(err.contains("{locale}"));
        assert!(err.contains("branch, version, path"));
    }

    #[test]
    fn test_unterminated_placeholder_rejected() {
        let err = EditUrlTemplate::parse("https://x.dev/{branch").unwrap_err();
        assert!(err.contains("unterminated"));
        assert!(EditUrlTemplate::parse("https://x.dev/branch}").is_err());
    }

    #[test]
    fn test_windows_separators_normalized() {
        let template = EditUrlTemplate::parse("{path}").unwrap();
        assert_eq!(template.render("main", None, "docs\\a.md"), "docs/a.md");
    }
}
