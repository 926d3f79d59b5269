use serde::Deserialize;

/// Main configuration structure for Weblink-Tree
///
/// Every section falls back to its defaults, so an empty file is a valid
/// configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default = "default_exclude")]
    pub exclude: Vec<ExcludeEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            platform: PlatformConfig::default(),
            exclude: default_exclude(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Minimum time between two platform API requests (milliseconds, 0 disables pacing)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Maximum number of node expansions in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout for the platform API (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Stop expanding nodes once this many have been expanded
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 200,
            max_concurrent_fetches: 1,
            request_timeout_secs: 30,
            max_pages: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "weblink-tree".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Target platform configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Root domain; the domain itself and all its subdomains are in scope
    #[serde(rename = "root-domain")]
    pub root_domain: String,

    /// Base URL the item API lives under (`{api-base}/api/v2/items/{id}`)
    #[serde(rename = "api-base")]
    pub api_base: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            root_domain: "qiita.com".to_string(),
            api_base: "https://qiita.com".to_string(),
        }
    }
}

/// A named rule excluding links by their normalized URL
///
/// Exactly one of `prefix` and `contains` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExcludeEntry {
    pub name: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

impl ExcludeEntry {
    pub fn prefix(name: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: Some(prefix.to_string()),
            contains: None,
        }
    }

    pub fn contains(name: &str, needle: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: None,
            contains: Some(needle.to_string()),
        }
    }
}

/// Asset proxy mirror and internal file endpoint of the default platform
pub fn default_exclude() -> Vec<ExcludeEntry> {
    vec![
        ExcludeEntry::prefix("asset-proxy", "https://camo.qiitausercontent.com"),
        ExcludeEntry::contains("internal-files", "qiita.com/files/"),
    ]
}
