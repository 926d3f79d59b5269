//! URL handling module for Weblink-Tree
//!
//! This module provides URL normalization and the classification of URLs
//! into content items on the target platform.

mod classify;
mod normalize;

// Re-export main functions
pub use classify::{extract_item_id, is_target_host};
pub use normalize::{normalize_url, NormalizedUrl};
