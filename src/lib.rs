//! Weblink-Tree: a link-graph mapper for a single content platform
//!
//! This crate starts from a seed article URL, fetches each article's rendered
//! body from the platform API, extracts its outbound links, and follows the
//! ones that point back into the platform breadth-first. The result is a tree
//! recording, for every visited page, the links found on it.

pub mod config;
pub mod crawler;
pub mod output;
pub mod tree;
pub mod url;

use thiserror::Error;

/// Main error type for Weblink-Tree operations
#[derive(Debug, Error)]
pub enum WeblinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    Seed(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The string could not be parsed as an absolute URL at all
    #[error("Malformed URL '{url}': {reason}")]
    Malformed { url: String, reason: String },

    /// The URL parsed, but its scheme is not http or https
    #[error("Not an HTTP(S) URL: {0}")]
    NotHttpUrl(String),
}

/// Reasons a URL is not a content item on the target platform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("Host is outside the target platform: {0}")]
    NotTargetHost(String),

    #[error("Path is not an item path: {0}")]
    NotItemPath(String),
}

/// Result type alias for Weblink-Tree operations
pub type Result<T> = std::result::Result<T, WeblinkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlOutcome};
pub use output::{render_tree, CrawlStats, OutputFormat};
pub use tree::LinkNode;
pub use crate::url::{normalize_url, NormalizedUrl};
