//! Traversal frontier: FIFO queue of nodes plus the visited set
//!
//! The frontier belongs to one traversal run and is owned by the task that
//! drives it, so the visited check-and-mark is a single `HashSet::insert`.

use crate::tree::NodeId;
use crate::url::NormalizedUrl;
use std::collections::{HashSet, VecDeque};

/// FIFO queue of nodes awaiting expansion and the URLs already visited
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<NodeId>,
    visited: HashSet<NormalizedUrl>,
}

impl Frontier {
    /// Creates a frontier seeded with exactly the root node
    pub fn new(root: NodeId) -> Self {
        Self {
            queue: VecDeque::from([root]),
            visited: HashSet::new(),
        }
    }

    /// Removes the oldest queued node
    pub fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    /// Enqueues newly discovered nodes behind everything already queued
    pub fn extend(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.queue.extend(ids);
    }

    /// Marks a URL as visited
    ///
    /// Returns true the first time a URL is seen in this run and false for
    /// every later call with the same URL.
    pub fn mark_visited(&mut self, url: &NormalizedUrl) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.clone())
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
