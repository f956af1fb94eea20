use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use geosignal_common::{CancelToken, Protocol, Source};
use geosignal_store::{ArticleStore, InsertOutcome};
use tracing::{info, warn};

use crate::dedup::BatchDedup;
use crate::normalize::{parse_feed, parse_json_api};
use crate::rate_limiter::HostRateLimiter;
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Copy)]
pub struct FetcherConfig {
    pub workers: usize,
    pub qps_per_host: u32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub shutdown_grace: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            qps_per_host: 2,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

/// Outcome of polling one source, reported per-source so the caller can
/// expose per-source fetch success rate (§4.10).
#[derive(Debug, Default)]
pub struct SourceRunStats {
    pub source_name: String,
    pub inserted: u64,
    pub duplicates: u64,
    pub in_batch_duplicates: u64,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct FetchRunStats {
    pub per_source: Vec<SourceRunStats>,
}

impl FetchRunStats {
    pub fn total_inserted(&self) -> u64 {
        self.per_source.iter().map(|s| s.inserted).sum()
    }
}

/// Bounded concurrent Fetcher Pool (C3): retrieves RSS/Atom/JSON feeds for a
/// batch of sources, rate limited per host, with bounded retries and
/// in-batch dedup ahead of storage (§4.3).
pub struct FetcherPool {
    config: FetcherConfig,
    http: reqwest::Client,
    rate_limiter: Arc<HostRateLimiter>,
    dedup: Arc<BatchDedup>,
    store: ArticleStore,
}

impl FetcherPool {
    pub fn new(config: FetcherConfig, store: ArticleStore) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("fetcher pool: reqwest client build");
        Self {
            rate_limiter: Arc::new(HostRateLimiter::new(config.qps_per_host)),
            dedup: Arc::new(BatchDedup::default()),
            http,
            store,
            config,
        }
    }

    /// Poll every source in `sources`, bounded to `config.workers` in
    /// flight at once (§4.3). No ordering guarantee between sources; each
    /// source's own entries are processed newest-first, as the feed itself
    /// returns them. `stop` is checked between sources so a shutdown drains
    /// in-flight requests rather than aborting them outright.
    pub async fn run_batch(&self, sources: &[Source], stop: CancelToken) -> FetchRunStats {
        let mut in_flight = FuturesUnordered::new();
        let mut iter = sources.iter();
        let mut stats = FetchRunStats::default();

        for _ in 0..self.config.workers {
            if let Some(source) = iter.next() {
                in_flight.push(self.fetch_one(source.clone()));
            }
        }

        while let Some(result) = in_flight.next().await {
            stats.per_source.push(result);
            if stop.is_cancelled() {
                break;
            }
            if let Some(source) = iter.next() {
                in_flight.push(self.fetch_one(source.clone()));
            }
        }

        stop.drain(self.config.shutdown_grace, || !in_flight.is_empty()).await;
        stats
    }

    async fn fetch_one(&self, source: Source) -> SourceRunStats {
        let mut stats = SourceRunStats { source_name: source.name.clone(), ..Default::default() };
        let host = host_of(&source.feed_url);
        self.rate_limiter.acquire(&host).await;

        let mut attempt = 0u32;
        let body = loop {
            attempt += 1;
            match self.http.get(&source.feed_url).send().await {
                Ok(response) if response.status().is_success() => match response.bytes().await {
                    Ok(bytes) => break bytes,
                    Err(e) => {
                        warn!(source = %source.name, error = %e, "failed reading response body");
                        stats.error = Some(e.to_string());
                        return stats;
                    }
                },
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 429 {
                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        warn!(source = %source.name, host = %host, retry_after, "rate limited");
                        stats.error = Some(format!("rate limited, retry after {retry_after}s"));
                        return stats;
                    }
                    if !self.config.retry.should_retry(attempt, Some(status)) {
                        stats.error = Some(format!("http {status}"));
                        return stats;
                    }
                }
                Err(e) => {
                    if !self.config.retry.should_retry(attempt, None) {
                        warn!(source = %source.name, error = %e, "fetch failed, giving up");
                        stats.error = Some(e.to_string());
                        return stats;
                    }
                }
            }
            tokio::time::sleep(self.config.retry.delay_for_attempt(attempt)).await;
        };

        let fetched_at = chrono::Utc::now();
        let parsed = match source.protocol {
            Protocol::Rss | Protocol::Atom => parse_feed(&body, &source, fetched_at),
            Protocol::JsonApi => parse_json_api(&body, &source, fetched_at),
        };

        let candidates = match parsed {
            Ok(articles) => articles,
            Err(e) => {
                warn!(source = %source.name, error = %e, "parse error");
                stats.error = Some(e.to_string());
                return stats;
            }
        };

        for article in candidates {
            if !self.dedup.insert_if_new(&article.content_hash()) {
                stats.in_batch_duplicates += 1;
                continue;
            }
            match self.store.insert_raw_article(&article).await {
                Ok(InsertOutcome::Inserted) => stats.inserted += 1,
                Ok(InsertOutcome::Duplicate) => stats.duplicates += 1,
                Err(e) => {
                    warn!(source = %source.name, error = %e, "storage error inserting article");
                    stats.error = Some(e.to_string());
                }
            }
        }

        info!(
            source = %source.name,
            inserted = stats.inserted,
            duplicates = stats.duplicates,
            in_batch_duplicates = stats.in_batch_duplicates,
            "source fetch complete"
        );
        stats
    }
}

/// Extracts the authority (host[:port]) from a URL without pulling in a
/// dedicated URL-parsing crate — the rate limiter only needs a stable
/// per-host bucket key, not a validated URL.
fn host_of(url: &str) -> String {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    let authority = without_scheme.split(['/', '?', '#']).next().unwrap_or(without_scheme);
    if authority.is_empty() {
        url.to_string()
    } else {
        authority.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_of_extracts_authority() {
        assert_eq!(host_of("https://example.com/feed.xml"), "example.com");
    }

    #[test]
    fn host_of_falls_back_to_whole_url_on_parse_failure() {
        assert_eq!(host_of("not a url"), "not a url");
    }
}
