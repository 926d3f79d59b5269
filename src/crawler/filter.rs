//! Link filter pipeline
//!
//! Raw anchors pass through a fixed normalize-or-drop stage followed by the
//! configured exclusion stages, in order. A link dropped by one stage never
//! reaches the next.

use crate::config::{default_exclude, ExcludeEntry};
use crate::crawler::parser::RawLink;
use crate::tree::DiscoveredLink;
use crate::url::{normalize_url, NormalizedUrl};

/// How an exclusion stage matches a normalized URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludeRule {
    /// Drop URLs starting with this string
    Prefix(String),
    /// Drop URLs containing this string anywhere
    Contains(String),
}

/// A named exclusion stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStage {
    name: String,
    rule: ExcludeRule,
}

impl FilterStage {
    pub fn new(name: &str, rule: ExcludeRule) -> Self {
        Self {
            name: name.to_string(),
            rule,
        }
    }

    /// Builds a stage from a config entry; `None` if the entry has no pattern
    pub fn from_entry(entry: &ExcludeEntry) -> Option<Self> {
        let rule = match (&entry.prefix, &entry.contains) {
            (Some(prefix), _) => ExcludeRule::Prefix(prefix.clone()),
            (None, Some(needle)) => ExcludeRule::Contains(needle.clone()),
            (None, None) => return None,
        };
        Some(Self::new(&entry.name, rule))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this stage drops the URL
    pub fn excludes(&self, url: &NormalizedUrl) -> bool {
        match &self.rule {
            ExcludeRule::Prefix(prefix) => url.as_str().starts_with(prefix.as_str()),
            ExcludeRule::Contains(needle) => url.as_str().contains(needle.as_str()),
        }
    }
}

/// Ordered list of exclusion stages applied after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPipeline {
    stages: Vec<FilterStage>,
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::from_entries(&default_exclude())
    }
}

impl FilterPipeline {
    pub fn new(stages: Vec<FilterStage>) -> Self {
        Self { stages }
    }

    /// Builds the pipeline from configured exclusion entries, keeping their order
    pub fn from_entries(entries: &[ExcludeEntry]) -> Self {
        Self::new(entries.iter().filter_map(FilterStage::from_entry).collect())
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Runs every raw link through the pipeline
    ///
    /// Links whose href is not an absolute HTTP(S) URL are dropped, then each
    /// exclusion stage is checked against the normalized URL. Survivors keep
    /// their document order.
    pub fn apply(&self, links: Vec<RawLink>) -> Vec<DiscoveredLink> {
        links
            .into_iter()
            .filter_map(|link| {
                let url = match normalize_url(&link.href) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::trace!("Dropping link at normalize stage: {}", e);
                        return None;
                    }
                };

                if let Some(stage) = self.stages.iter().find(|stage| stage.excludes(&url)) {
                    tracing::trace!("Dropping {} at {} stage", url, stage.name());
                    return None;
                }

                Some(DiscoveredLink {
                    text: link.text,
                    url,
                })
            })
            .collect()
    }
}
