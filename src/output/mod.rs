//! Output module for rendering the link tree
//!
//! This module handles:
//! - Serializing the finished tree as YAML or JSON
//! - Recording and logging crawl statistics

pub mod stats;

pub use stats::{log_statistics, CrawlStats};

use crate::tree::LinkNode;
use crate::WeblinkError;

/// Text format the tree is rendered in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Renders the tree in the given format
///
/// # Example
///
/// ```
/// use weblink_tree::output::{render_tree, OutputFormat};
/// use weblink_tree::{normalize_url, LinkNode};
///
/// let url = normalize_url("https://example.com/").unwrap();
/// let tree = LinkNode { text: url.to_string(), url, children: Some(vec![]) };
///
/// let yaml = render_tree(&tree, OutputFormat::Yaml).unwrap();
/// assert!(yaml.contains("children: []"));
/// ```
pub fn render_tree(tree: &LinkNode, format: OutputFormat) -> Result<String, WeblinkError> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(tree)?,
        OutputFormat::Json => serde_json::to_string_pretty(tree)?,
    };
    Ok(rendered)
}
