//! HTML parser for extracting anchors from rendered item bodies
//!
//! Extraction never fails: anchors without an `href` are skipped, and content
//! that is not well-formed HTML is parsed as leniently as a browser would.

use scraper::{Html, Selector};

/// An anchor as it appears in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    /// Visible text of the anchor, trimmed
    pub text: String,

    /// The `href` attribute exactly as written
    pub href: String,
}

/// Extracts every anchor with an `href` from HTML content, in document order
///
/// # Example
///
/// ```
/// use weblink_tree::crawler::extract_links;
///
/// let links = extract_links(r#"<p><a href="https://qiita.com/bob/items/def456"> B </a></p>"#);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].text, "B");
/// assert_eq!(links[0].href, "https://qiita.com/bob/items/def456");
/// ```
pub fn extract_links(html: &str) -> Vec<RawLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            links.push(RawLink {
                text: element.text().collect::<String>().trim().to_string(),
                href: href.to_string(),
            });
        }
    }

    links
}
