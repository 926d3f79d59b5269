//! Configuration module for Weblink-Tree
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional; every value has a default.
//!
//! # Example
//!
//! ```no_run
//! use weblink_tree::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("weblink-tree.toml")).unwrap();
//! println!("Requests are paced every {}ms", config.crawler.request_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_exclude, Config, CrawlerConfig, ExcludeEntry, PlatformConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
