//! Statistics gathered during a traversal
//!
//! The summary is logged at the end of a run rather than printed, since
//! standard output carries the serialized tree.

use crate::crawler::{Expansion, LeafReason};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Nodes whose URL was visited for the first time and expanded
    pub expanded: u64,

    /// Dequeued nodes skipped because their URL was already visited
    pub duplicates_skipped: u64,

    /// Items whose rendered body was fetched
    pub fetched: u64,

    /// Items whose fetch was unavailable (non-200, timeout, bad body)
    pub unavailable: u64,

    /// Expanded nodes outside the target platform
    pub non_target: u64,

    /// Expanded nodes on the platform that are not item pages
    pub non_item: u64,

    /// Links attached as children after filtering
    pub links_discovered: u64,

    /// Nodes still queued when the page cap stopped the traversal
    pub left_in_queue: u64,
}

impl CrawlStats {
    /// Counts the result of one expansion
    pub fn record(&mut self, expansion: &Expansion) {
        match expansion {
            Expansion::Links(links) => {
                self.fetched += 1;
                self.links_discovered += links.len() as u64;
            }
            Expansion::Leaf(LeafReason::NotTargetHost) => self.non_target += 1,
            Expansion::Leaf(LeafReason::NotItemPath) => self.non_item += 1,
            Expansion::Leaf(LeafReason::Unavailable) => self.unavailable += 1,
        }
    }
}

/// Logs the statistics summary at info level
pub fn log_statistics(stats: &CrawlStats) {
    tracing::info!(
        "Expanded {} nodes ({} fetched, {} unavailable, {} off-platform, {} non-item)",
        stats.expanded,
        stats.fetched,
        stats.unavailable,
        stats.non_target,
        stats.non_item
    );
    tracing::info!(
        "Discovered {} links, skipped {} duplicates",
        stats.links_discovered,
        stats.duplicates_skipped
    );
    if stats.left_in_queue > 0 {
        tracing::info!("Page cap reached with {} nodes left in queue", stats.left_in_queue);
    }
}
