//! Crawler coordinator - main traversal logic
//!
//! This module contains the breadth-first loop that ties the crawl together:
//! - Dequeuing nodes in FIFO order and skipping already visited URLs
//! - Dispatching node expansions to a bounded set of worker tasks
//! - Attaching each expansion's links to the tree and enqueueing them
//!
//! The coordinator task alone owns the queue, the visited set and the tree.
//! Workers only compute expansions. Results are consumed in dispatch order,
//! so the tree is the same whatever the number of workers.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, FetchOutcome, ItemFetcher};
use crate::crawler::filter::FilterPipeline;
use crate::crawler::parser::extract_links;
use crate::crawler::rate_limit::RequestPacer;
use crate::crawler::scheduler::Frontier;
use crate::output::{log_statistics, CrawlStats};
use crate::tree::{DiscoveredLink, LinkNode, TreeBuilder};
use crate::url::{extract_item_id, is_target_host, NormalizedUrl};
use crate::{ClassifyError, WeblinkError};
use futures::stream::{FuturesOrdered, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why an expanded node has no children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafReason {
    /// The URL is outside the target platform
    NotTargetHost,
    /// The URL is on the platform but not an item page
    NotItemPath,
    /// The item API did not return content
    Unavailable,
}

/// Result of expanding one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// The item was fetched; these links survived the filter pipeline
    Links(Vec<DiscoveredLink>),
    /// The node is a leaf
    Leaf(LeafReason),
}

impl Expansion {
    pub fn into_links(self) -> Vec<DiscoveredLink> {
        match self {
            Self::Links(links) => links,
            Self::Leaf(_) => Vec::new(),
        }
    }
}

impl From<ClassifyError> for LeafReason {
    fn from(e: ClassifyError) -> Self {
        match e {
            ClassifyError::NotTargetHost(_) => Self::NotTargetHost,
            ClassifyError::NotItemPath(_) => Self::NotItemPath,
        }
    }
}

/// Turns one URL into its list of child links
///
/// Classification, fetching, extraction and filtering happen here; nothing
/// in this type touches traversal state.
#[derive(Debug)]
pub struct Expander {
    fetcher: ItemFetcher,
    pipeline: FilterPipeline,
    root_domain: String,
}

impl Expander {
    pub fn new(fetcher: ItemFetcher, pipeline: FilterPipeline, root_domain: &str) -> Self {
        Self {
            fetcher,
            pipeline,
            root_domain: root_domain.to_string(),
        }
    }

    /// Expands a URL
    ///
    /// Off-platform URLs and non-item paths become leaves without any request
    /// being sent. An unavailable item becomes a leaf as well.
    pub async fn expand(&self, url: &NormalizedUrl) -> Expansion {
        if !is_target_host(url.host(), &self.root_domain) {
            tracing::debug!("{} is off-platform, leaf", url);
            return Expansion::Leaf(LeafReason::NotTargetHost);
        }

        let item_id = match extract_item_id(url, &self.root_domain) {
            Ok(item_id) => item_id,
            Err(e) => {
                tracing::debug!("{}: {}, leaf", url, e);
                return Expansion::Leaf(e.into());
            }
        };

        match self.fetcher.fetch_rendered_body(&item_id).await {
            FetchOutcome::Content(html) => {
                let raw = extract_links(&html);
                let found = raw.len();
                let links = self.pipeline.apply(raw);
                tracing::debug!("{}: {} anchors, {} kept", url, found, links.len());
                Expansion::Links(links)
            }
            FetchOutcome::Unavailable(_) => Expansion::Leaf(LeafReason::Unavailable),
        }
    }
}

/// The finished tree and the statistics of the run that built it
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub tree: LinkNode,
    pub stats: CrawlStats,
}

/// Main crawler coordinator structure
#[derive(Debug)]
pub struct Coordinator {
    expander: Arc<Expander>,
    max_in_flight: usize,
    max_pages: Option<usize>,
}

impl Coordinator {
    /// Creates a coordinator from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `token` - Optional bearer credential for the item API
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(WeblinkError)` - The HTTP client could not be built
    pub fn new(config: &Config, token: Option<String>) -> Result<Self, WeblinkError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        let pacer = Arc::new(RequestPacer::new(Duration::from_millis(
            config.crawler.request_delay_ms,
        )));
        let fetcher = ItemFetcher::new(client, &config.platform.api_base, token, pacer);
        let pipeline = FilterPipeline::from_entries(&config.exclude);
        let expander = Expander::new(fetcher, pipeline, &config.platform.root_domain);

        Ok(Self::with_expander(
            expander,
            config.crawler.max_concurrent_fetches as usize,
            config.crawler.max_pages,
        ))
    }

    /// Creates a coordinator around an existing expander
    pub fn with_expander(expander: Expander, max_in_flight: usize, max_pages: Option<usize>) -> Self {
        Self {
            expander: Arc::new(expander),
            max_in_flight: max_in_flight.max(1),
            max_pages,
        }
    }

    fn page_cap_reached(&self, stats: &CrawlStats) -> bool {
        self.max_pages
            .is_some_and(|max| stats.expanded >= max as u64)
    }

    /// Runs the traversal from an already normalized seed
    ///
    /// Each loop iteration first dispatches queued nodes until the worker
    /// limit is reached, then waits for the oldest dispatched expansion and
    /// attaches its links. The run ends when the queue is drained and no
    /// expansion is in flight.
    pub async fn run(&self, seed: NormalizedUrl) -> CrawlOutcome {
        let (mut tree, root) = TreeBuilder::new(seed);
        let mut frontier = Frontier::new(root);
        let mut stats = CrawlStats::default();
        let mut in_flight = FuturesOrdered::new();
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl from {} ({} workers)",
            tree.link(root).url,
            self.max_in_flight
        );

        loop {
            while in_flight.len() < self.max_in_flight && !self.page_cap_reached(&stats) {
                let Some(id) = frontier.pop() else {
                    break;
                };

                let url = tree.link(id).url.clone();
                if !frontier.mark_visited(&url) {
                    tracing::trace!("Already visited {}, skipping", url);
                    stats.duplicates_skipped += 1;
                    continue;
                }

                stats.expanded += 1;
                let expander = Arc::clone(&self.expander);
                let task = tokio::spawn(async move { expander.expand(&url).await });
                in_flight.push_back(async move { (id, task.await) });
            }

            let Some((id, joined)) = in_flight.next().await else {
                break;
            };

            let expansion = match joined {
                Ok(expansion) => expansion,
                Err(e) => {
                    tracing::error!("Expansion of {} failed: {}", tree.link(id).url, e);
                    Expansion::Leaf(LeafReason::Unavailable)
                }
            };

            stats.record(&expansion);
            let children = tree.attach(id, expansion.into_links());
            frontier.extend(children);

            let completed = stats.fetched + stats.unavailable + stats.non_target + stats.non_item;
            if completed % 10 == 0 {
                tracing::info!(
                    "Progress: {} nodes expanded, {} queued, {} discovered, {:.1}s elapsed",
                    completed,
                    frontier.queued(),
                    tree.node_count(),
                    start_time.elapsed().as_secs_f64()
                );
            }
        }

        stats.left_in_queue = frontier.queued() as u64;

        tracing::info!(
            "Crawl complete: {} URLs visited in {:.1}s",
            frontier.visited(),
            start_time.elapsed().as_secs_f64()
        );
        log_statistics(&stats);

        CrawlOutcome {
            tree: tree.build(),
            stats,
        }
    }
}
