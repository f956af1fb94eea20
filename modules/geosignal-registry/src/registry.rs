use std::collections::HashMap;
use std::sync::Arc;

use geosignal_common::{Priority, Source};

use crate::error::RegistryError;

#[derive(Debug, Default)]
struct Indices {
    by_language: HashMap<String, Vec<Source>>,
    by_priority: HashMap<Priority, Vec<Source>>,
    by_conflict_zone: HashMap<String, Vec<Source>>,
}

/// Immutable in-memory catalog of configured feeds (C2). Loaded once at
/// start and safe to share across every worker pool without synchronization
/// (§5: "Source Registry is immutable after load; safe to share").
///
/// `reload_sources` does not mutate this value in place — it builds a new
/// `SourceRegistry` and the caller swaps the `Arc` it holds, so in-flight
/// readers of the old registry are never disturbed mid-read.
#[derive(Clone)]
pub struct SourceRegistry {
    all: Arc<Vec<Source>>,
    indices: Arc<Indices>,
}

impl SourceRegistry {
    /// Build a registry from a flat list of sources. Rejects duplicate
    /// `feed_url`s (§4.2 constraint) rather than silently keeping the last.
    pub fn new(sources: Vec<Source>) -> Result<Self, RegistryError> {
        let mut seen = std::collections::HashSet::new();
        for source in &sources {
            if !seen.insert(source.feed_url.clone()) {
                return Err(RegistryError::DuplicateFeedUrl(source.feed_url.clone()));
            }
        }

        let enabled: Vec<Source> = sources.into_iter().filter(|s| s.enabled).collect();

        let mut indices = Indices::default();
        for source in &enabled {
            indices.by_language.entry(source.language.clone()).or_default().push(source.clone());
            indices.by_priority.entry(source.priority).or_default().push(source.clone());
            if let Some(tag) = &source.conflict_zone_tag {
                indices.by_conflict_zone.entry(tag.clone()).or_default().push(source.clone());
            }
        }

        Ok(Self { all: Arc::new(enabled), indices: Arc::new(indices) })
    }

    pub fn from_catalog_json(json: &str) -> Result<Self, RegistryError> {
        Self::new(crate::catalog::parse_catalog(json)?)
    }

    pub fn all(&self) -> &[Source] {
        &self.all
    }

    pub fn sources_by_language(&self, lang: &str) -> &[Source] {
        self.indices.by_language.get(lang).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn sources_by_priority(&self, priority: Priority) -> &[Source] {
        self.indices.by_priority.get(&priority).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn sources_by_conflict_zone(&self, tag: &str) -> &[Source] {
        self.indices.by_conflict_zone.get(tag).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosignal_common::Protocol;

    fn source(name: &str, feed_url: &str, language: &str, priority: Priority) -> Source {
        Source {
            name: name.to_string(),
            feed_url: feed_url.to_string(),
            protocol: Protocol::Rss,
            language: language.to_string(),
            country: "UA".to_string(),
            region: "Eastern Europe".to_string(),
            priority,
            conflict_zone_tag: Some("donbas".to_string()),
            enabled: true,
        }
    }

    #[test]
    fn rejects_duplicate_feed_urls() {
        let sources = vec![
            source("A", "https://a.example/feed", "en", Priority::High),
            source("B", "https://a.example/feed", "en", Priority::Standard),
        ];
        let result = SourceRegistry::new(sources);
        assert!(matches!(result, Err(RegistryError::DuplicateFeedUrl(_))));
    }

    #[test]
    fn disabled_sources_excluded_from_all_projections() {
        let mut disabled = source("C", "https://c.example/feed", "en", Priority::Standard);
        disabled.enabled = false;
        let registry = SourceRegistry::new(vec![disabled]).unwrap();
        assert!(registry.sources_by_language("en").is_empty());
        assert!(registry.sources_by_priority(Priority::Standard).is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn projections_index_by_language_priority_and_zone() {
        let sources = vec![
            source("A", "https://a.example/feed", "en", Priority::Critical),
            source("B", "https://b.example/feed", "ru", Priority::High),
        ];
        let registry = SourceRegistry::new(sources).unwrap();
        assert_eq!(registry.sources_by_language("en").len(), 1);
        assert_eq!(registry.sources_by_priority(Priority::Critical).len(), 1);
        assert_eq!(registry.sources_by_conflict_zone("donbas").len(), 2);
    }
}
