//! Link and anchor extraction from markdown.
//!
//! Walks pulldown-cmark events of a page body. Link targets are collected
//! with their source line; images are ignored. Heading anchors use GitHub-style
//! slugs, de-duplicated with `-1`, `-2` suffixes, unless the heading carries an
//! explicit `{#custom-id}`.

use std::collections::{BTreeSet, HashMap};

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// A link found in a page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    /// Link destination as written.
    pub target: String,
    /// 1-based line of the link in the page body.
    pub line: usize,
}

/// Links and anchors of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Links in document order.
    pub links: Vec<RawLink>,
    /// Heading anchors.
    pub anchors: BTreeSet<String>,
}

/// Extract links and heading anchors from markdown.
#[must_use]
pub fn extract(markdown: &str) -> Extracted {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(markdown, options);

    let mut extracted = Extracted::default();
    let mut ids = AnchorIds::default();
    let mut heading: Option<HeadingCapture> = None;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { id, .. }) => {
                heading = Some(HeadingCapture {
                    explicit_id: id.map(|id| id.to_string()),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(capture) = heading.take() {
                    let anchor = match capture.explicit_id {
                        Some(id) => id,
                        None => ids.generate(&capture.text),
                    };
                    if !anchor.is_empty() {
                        extracted.anchors.insert(anchor);
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(capture) = heading.as_mut() {
                    capture.text.push_str(&text);
                }
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                if !dest_url.is_empty() {
                    extracted.links.push(RawLink {
                        target: dest_url.to_string(),
                        line: line_of(markdown, range.start),
                    });
                }
            }
            _ => {}
        }
    }

    extracted
}

struct HeadingCapture {
    explicit_id: Option<String>,
    text: String,
}

/// Generates unique heading ids within one page.
#[derive(Default)]
struct AnchorIds {
    counts: HashMap<String, usize>,
}

impl AnchorIds {
    fn generate(&mut self, text: &str) -> String {
        let base_id = slugify(text);
        let count = self.counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }
}

/// Convert heading text to an anchor slug, the way GitHub does.
///
/// Lowercases, keeps letters, digits, `-` and `_` (any script), turns each
/// space into `-` without collapsing runs, and drops everything else.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ' ' {
            result.push('-');
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            result.extend(c.to_lowercase());
        }
    }
    result
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn targets(extracted: &Extracted) -> Vec<&str> {
        extracted.links.iter().map(|l| l.target.as_str()).collect()
    }

    fn anchors(extracted: &Extracted) -> Vec<&str> {
        extracted.anchors.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Install npm -- fast!"), "install-npm----fast");
        assert_eq!(slugify("API_Reference"), "api_reference");
        assert_eq!(slugify("Café Ürün"), "café-ürün");
        assert_eq!(slugify("v1.2 (beta)"), "v12-beta");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_extracts_links_with_lines() {
        let extracted = extract("# Title\n\nSee [setup](./setup.md).\n\nAnd [api](/api#auth).\n");
        assert_eq!(
            extracted.links,
            vec![
                RawLink {
                    target: "./setup.md".to_owned(),
                    line: 3
                },
                RawLink {
                    target: "/api#auth".to_owned(),
                    line: 5
                },
            ]
        );
    }

    #[test]
    fn test_ignores_images_and_code() {
        let extracted = extract(
            "![diagram](./diagram.png)\n\n`[not](a-link)`\n\n```\n[also](not)\n```\n\n[real](real)\n",
        );
        assert_eq!(targets(&extracted), ["real"]);
    }

    #[test]
    fn test_reference_style_links() {
        let extracted = extract("Read the [guide][g].\n\n[g]: /guide/intro\n");
        assert_eq!(targets(&extracted), ["/guide/intro"]);
    }

    #[test]
    fn test_heading_anchors_deduplicated() {
        let extracted = extract("## FAQ\n\n## FAQ\n\n## FAQ\n\n## Install `npm`\n");
        assert_eq!(anchors(&extracted), ["faq", "faq-1", "faq-2", "install-npm"]);
    }

    #[test]
    fn test_heading_anchors_keep_underscores_dashes_and_unicode() {
        let extracted = extract("## API_Reference\n\n## a -- b\n\n## Café\n");
        assert_eq!(anchors(&extracted), ["a----b", "api_reference", "café"]);
    }

    #[test]
    fn test_explicit_heading_ids() {
        let extracted = extract("## Getting Started {#start}\n\n## Getting Started\n");
        assert_eq!(anchors(&extracted), ["getting-started", "start"]);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract(""), Extracted::default());
    }
}
