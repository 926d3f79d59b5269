//! HTTP fetcher for the platform item API
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the user agent and timeouts
//! - Attaching the optional bearer credential
//! - Pacing requests through the shared [`RequestPacer`]
//! - Turning every failure into [`FetchOutcome::Unavailable`] with diagnostics

use crate::config::UserAgentConfig;
use crate::crawler::rate_limit::RequestPacer;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Rate-limit headers sent by the platform API
const HEADER_RATE_REMAINING: &str = "rate-remaining";
const HEADER_RATE_LIMIT: &str = "rate-limit";
const HEADER_RATE_RESET: &str = "rate-reset";

/// Quota information reported by the API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests left in the current window
    pub remaining: Option<u32>,
    /// Size of the window
    pub limit: Option<u32>,
    /// When the window resets
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitInfo {
    /// Reads the rate-limit headers; missing or unparsable values stay `None`
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<i64>().ok())
        };

        Self {
            remaining: number(HEADER_RATE_REMAINING).and_then(|v| u32::try_from(v).ok()),
            limit: number(HEADER_RATE_LIMIT).and_then(|v| u32::try_from(v).ok()),
            reset_at: number(HEADER_RATE_RESET).and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        }
    }
}

impl fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<u32>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
        write!(f, "remaining {}/{}", show(self.remaining), show(self.limit))?;
        match self.reset_at {
            Some(reset) => write!(f, ", resets at {}", reset.to_rfc3339()),
            None => write!(f, ", reset unknown"),
        }
    }
}

/// Why an item could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    /// HTTP status, if a response arrived at all
    pub status: Option<u16>,
    /// Human-readable description
    pub reason: String,
    /// Quota headers of the failed response
    pub rate_limit: RateLimitInfo,
}

/// Result of fetching one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The item's rendered HTML body
    Content(String),

    /// Non-200 response, timeout, transport or body error
    Unavailable(Unavailable),
}

#[derive(Debug, Deserialize)]
struct ItemResponse {
    rendered_body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout; an expired request counts as unavailable
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use weblink_tree::config::UserAgentConfig;
/// use weblink_tree::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", config.crawler_name, config.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the platform's item API
#[derive(Clone)]
pub struct ItemFetcher {
    client: Client,
    api_base: String,
    token: Option<String>,
    pacer: Arc<RequestPacer>,
}

impl fmt::Debug for ItemFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemFetcher")
            .field("api_base", &self.api_base)
            .field("authenticated", &self.token.is_some())
            .field("pacer", &self.pacer)
            .finish()
    }
}

impl ItemFetcher {
    /// Creates a fetcher
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use
    /// * `api_base` - Scheme and host the API lives under, e.g. `https://qiita.com`
    /// * `token` - Optional bearer credential
    /// * `pacer` - Pacer shared by every request this fetcher (and its clones) sends
    pub fn new(
        client: Client,
        api_base: &str,
        token: Option<String>,
        pacer: Arc<RequestPacer>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            pacer,
        }
    }

    /// The API endpoint for an item
    pub fn endpoint(&self, item_id: &str) -> String {
        format!("{}/api/v2/items/{}", self.api_base, item_id)
    }

    /// Fetches the rendered HTML body of an item
    ///
    /// # Outcomes
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 200 with `rendered_body` | `Content` |
    /// | HTTP 200, body not an item | `Unavailable` |
    /// | Any other status | `Unavailable` with rate-limit diagnostics |
    /// | Timeout / connection error | `Unavailable` |
    ///
    /// Every `Unavailable` is logged at warn level; none of them is an error
    /// for the caller.
    pub async fn fetch_rendered_body(&self, item_id: &str) -> FetchOutcome {
        let endpoint = self.endpoint(item_id);

        self.pacer.wait().await;
        tracing::debug!("GET {}", endpoint);

        let mut request = self.client.get(&endpoint);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let outcome = match request.send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                match response.json::<ItemResponse>().await {
                    Ok(item) => return FetchOutcome::Content(item.rendered_body),
                    Err(e) => Unavailable {
                        status: Some(StatusCode::OK.as_u16()),
                        reason: format!("invalid item body: {}", e),
                        rate_limit: RateLimitInfo::default(),
                    },
                }
            }
            Ok(response) => Unavailable {
                status: Some(response.status().as_u16()),
                reason: format!("HTTP {}", response.status()),
                rate_limit: RateLimitInfo::from_headers(response.headers()),
            },
            Err(e) => Unavailable {
                status: None,
                reason: if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    e.to_string()
                },
                rate_limit: RateLimitInfo::default(),
            },
        };

        tracing::warn!(
            "Item {} unavailable ({}); {}",
            item_id,
            outcome.reason,
            outcome.rate_limit
        );
        FetchOutcome::Unavailable(outcome)
    }
}
