use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use geosignal_common::{Article, ProcessingState, Source};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::FetchError;

/// Normalize one RSS/Atom feed entry into a candidate `Article` (§4.3).
/// Returns `None` for entries without enough to be useful (no link, no
/// title) rather than erroring the whole feed over one bad entry.
pub fn normalize_entry(entry: &Entry, source: &Source, fetched_at: DateTime<Utc>) -> Option<Article> {
    let url = entry.links.first().map(|l| l.href.clone())?;
    let title = entry.title.as_ref().map(|t| t.content.clone()).filter(|t| !t.trim().is_empty())?;
    let content = entry
        .content
        .as_ref()
        .and_then(|c| c.body.clone())
        .or_else(|| entry.summary.as_ref().map(|s| s.content.clone()))
        .unwrap_or_default();
    let summary = entry.summary.as_ref().map(|s| s.content.clone());
    let published_at = entry.published.or(entry.updated).unwrap_or(fetched_at);
    let image_url = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .find_map(|c| c.url.as_ref())
        .map(|u| u.to_string());

    Some(Article {
        id: Uuid::new_v4(),
        url,
        title,
        content,
        summary,
        source_name: source.name.clone(),
        source_url: source.feed_url.clone(),
        published_at,
        fetched_at,
        original_language: Some(source.language.clone()),
        canonical_language: source.language.clone(),
        translated_title: None,
        translated_content: None,
        country: None,
        region: None,
        latitude: None,
        longitude: None,
        image_url,
        risk_level: None,
        risk_score: None,
        sentiment_score: None,
        category: None,
        entities: None,
        processing_state: ProcessingState::Raw,
    })
}

/// Parse an RSS/Atom byte body into candidate articles, newest-first as
/// returned by the feed (§4.3: "within a source, newest-first").
pub fn parse_feed(body: &[u8], source: &Source, fetched_at: DateTime<Utc>) -> Result<Vec<Article>, FetchError> {
    let feed: Feed = feed_rs::parser::parse(body)
        .map_err(|e| FetchError::Parse { source: source.name.clone(), cause: e.to_string() })?;
    Ok(feed.entries.iter().filter_map(|entry| normalize_entry(entry, source, fetched_at)).collect())
}

/// Wire shape accepted from `protocol: json-api` sources: a flat JSON array
/// of article-like objects. The core does not speak any one vendor's JSON
/// API; this is the minimal common shape a source adapter is expected to
/// emit (§6: "JSON feeds over HTTPS").
#[derive(Debug, Deserialize)]
struct JsonApiEntry {
    url: String,
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    summary: Option<String>,
    published_at: DateTime<Utc>,
    #[serde(default)]
    image_url: Option<String>,
}

pub fn parse_json_api(body: &[u8], source: &Source, fetched_at: DateTime<Utc>) -> Result<Vec<Article>, FetchError> {
    let entries: Vec<JsonApiEntry> = serde_json::from_slice(body)
        .map_err(|e| FetchError::Parse { source: source.name.clone(), cause: e.to_string() })?;
    Ok(entries
        .into_iter()
        .map(|entry| Article {
            id: Uuid::new_v4(),
            url: entry.url,
            title: entry.title,
            content: entry.content,
            summary: entry.summary,
            source_name: source.name.clone(),
            source_url: source.feed_url.clone(),
            published_at: entry.published_at,
            fetched_at,
            original_language: Some(source.language.clone()),
            canonical_language: source.language.clone(),
            translated_title: None,
            translated_content: None,
            country: None,
            region: None,
            latitude: None,
            longitude: None,
            image_url: entry.image_url,
            risk_level: None,
            risk_score: None,
            sentiment_score: None,
            category: None,
            entities: None,
            processing_state: ProcessingState::Raw,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosignal_common::{Priority, Protocol};

    fn source() -> Source {
        Source {
            name: "Test Wire".to_string(),
            feed_url: "https://wire.example/feed.xml".to_string(),
            protocol: Protocol::Rss,
            language: "en".to_string(),
            country: "US".to_string(),
            region: "North America".to_string(),
            priority: Priority::Standard,
            conflict_zone_tag: None,
            enabled: true,
        }
    }

    const SAMPLE_RSS: &str = r#"<?xml version="1.0"?>
    <rss version="2.0"><channel>
      <title>Test Wire</title>
      <item>
        <title>Missile strike in city X</title>
        <link>https://wire.example/a</link>
        <description>Officials confirmed a missile strike overnight.</description>
        <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
      </item>
    </channel></rss>"#;

    #[test]
    fn parses_rss_entries_into_articles() {
        let articles = parse_feed(SAMPLE_RSS.as_bytes(), &source(), Utc::now()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://wire.example/a");
        assert_eq!(articles[0].processing_state, ProcessingState::Raw);
    }

    #[test]
    fn parses_json_api_entries_into_articles() {
        let body = serde_json::json!([
            {"url": "https://wire.example/b", "title": "Clashes reported", "published_at": "2024-01-01T00:00:00Z"}
        ]);
        let articles = parse_json_api(body.to_string().as_bytes(), &source(), Utc::now()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Clashes reported");
    }
}
