// src/extract/html.rs
// =============================================================================
// This module extracts text and links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Parse and validate URLs
// - Resolve relative URLs to absolute URLs
//
// Rust concepts:
// - Iterators: walking every node of the DOM tree
// - Closures: Anonymous functions (|x| ...)
// - HashSet: dropping duplicate links while keeping page order
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Node, Selector};
use url::Url;

use super::{ContentExtractor, ExtractError, Extracted};
use crate::fetch::RenderedPage;

// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts text and `<a href>` links using scraper.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    links: Selector,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        // Selector::parse only fails on invalid CSS; "a[href]" is a constant
        let links = Selector::parse("a[href]").unwrap();
        Self { links }
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for HtmlExtractor {
    // Parameters:
    //   page: the rendered HTML
    //   base_url: the URL of the page (for resolving relative links)
    //
    // Example:
    //   html = "<p>Hello</p><a href='/docs'>Docs</a>"
    //   base_url = "https://example.com"
    //   text = "Hello\nDocs", links = ["https://example.com/docs"]
    fn extract(&self, page: &RenderedPage, base_url: &str) -> Result<Extracted, ExtractError> {
        let base = Url::parse(base_url).map_err(|source| ExtractError::InvalidBase {
            url: base_url.to_string(),
            source,
        })?;

        let document = Html::parse_document(&page.html);

        Ok(Extracted {
            text: visible_text(&document),
            links: self.links(&document, &base),
        })
    }
}

impl HtmlExtractor {
    fn links(&self, document: &Html, base: &Url) -> Vec<String> {
        let mut seen = HashSet::new();
        document
            .select(&self.links)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_link(base, href))
            // insert() returns false for URLs we already have
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }
}

// Collects every text node, trimmed, skipping empty ones and anything inside
// HIDDEN_ELEMENTS, one per line.
fn visible_text(document: &Html) -> String {
    let mut lines = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    lines.join("\n")
}

// Resolves a link (possibly relative) to an absolute URL
//
// Returns None for links that never lead to another page:
// in-page anchors, mailto:, tel:, javascript: and data: links
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    // join() also handles absolute hrefs (it just returns them parsed)
    base.join(href).ok().map(|url| url.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is let-else?
//    - let Node::Text(text) = node.value() else { continue; };
//    - If the pattern matches, `text` is bound and we keep going
//    - If not, the else block runs (and must leave the loop body)
//
// 2. Why check ancestors?
//    - The text inside <script> is JavaScript, not page content
//    - A text node is hidden if ANY element above it is one of those tags
//
// 3. What does .filter(|url| seen.insert(url.clone())) do?
//    - HashSet::insert returns true only the first time a value is added
//    - So the filter keeps the first copy of each link and drops the rest
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, base: &str) -> Extracted {
        let page = RenderedPage {
            url: base.to_string(),
            html: html.to_string(),
        };
        HtmlExtractor::new().extract(&page, base).unwrap()
    }

    #[test]
    fn test_extract_absolute_link() {
        let out = extract(r#"<a href="https://www.rust-lang.org">Rust</a>"#, "https://example.com");
        assert_eq!(out.links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let out = extract(r#"<a href="/docs">Docs</a>"#, "https://example.com/page");
        assert_eq!(out.links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_skip_mailto_and_anchor() {
        let out = extract(
            r##"<a href="mailto:test@example.com">Email</a><a href="#top">Top</a>"##,
            "https://example.com",
        );
        assert!(out.links.is_empty());
    }

    #[test]
    fn test_duplicate_links_collapsed() {
        let html = r#"
            <a href="/a">A</a>
            <a href="https://example.com/a">A again</a>
            <a href="../b">B</a>
        "#;
        let out = extract(html, "https://example.com/x/");
        assert_eq!(out.links, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn test_text_one_node_per_line() {
        let html = r#"
            <html><head><title>Title</title></head>
            <body>
              <h1>  Heading  </h1>
              <p>First <b>bold</b></p>
            </body></html>
        "#;
        let out = extract(html, "https://example.com/");
        assert_eq!(out.text, "Title\nHeading\nFirst\nbold");
    }

    #[test]
    fn test_text_skips_scripts_and_styles() {
        let html = r#"
            <body>
              <script>var hidden = 1;</script>
              <style>p { color: red; }</style>
              <p>Shown</p>
            </body>
        "#;
        let out = extract(html, "https://example.com/");
        assert_eq!(out.text, "Shown");
    }

    #[test]
    fn test_invalid_base_is_error() {
        let page = RenderedPage {
            url: "nope".to_string(),
            html: String::new(),
        };
        let err = HtmlExtractor::new().extract(&page, "nope").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidBase { .. }));
    }
}
