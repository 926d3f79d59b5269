//! Crawler module for item fetching and link traversal
//!
//! This module contains the core crawling logic, including:
//! - Paced fetching of rendered item bodies from the platform API
//! - HTML parsing and anchor extraction
//! - The link filter pipeline
//! - The breadth-first traversal that builds the link tree

mod coordinator;
mod fetcher;
mod filter;
mod parser;
mod rate_limit;
mod scheduler;

pub use coordinator::{Coordinator, CrawlOutcome, Expander, Expansion, LeafReason};
pub use fetcher::{build_http_client, FetchOutcome, ItemFetcher, RateLimitInfo, Unavailable};
pub use filter::{ExcludeRule, FilterPipeline, FilterStage};
pub use parser::{extract_links, RawLink};
pub use rate_limit::RequestPacer;
pub use scheduler::Frontier;

use crate::config::Config;
use crate::url::normalize_url;
use crate::WeblinkError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Normalize the seed URL
/// 2. Build the HTTP client, pacer and filter pipeline
/// 3. Traverse breadth-first from the seed
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The seed URL, in any form the normalizer accepts
/// * `token` - Optional bearer credential for the item API
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The link tree and crawl statistics
/// * `Err(WeblinkError)` - The seed is not an HTTP(S) URL, or the client could not be built
pub async fn crawl(
    config: &Config,
    seed: &str,
    token: Option<String>,
) -> Result<CrawlOutcome, WeblinkError> {
    let seed = normalize_url(seed)?;
    let coordinator = Coordinator::new(config, token)?;
    Ok(coordinator.run(seed).await)
}
