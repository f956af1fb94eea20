use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use geosignal_common::{Article, CancelToken, EntityMap};
use geosignal_store::{ArticleStore, EnrichmentFields};
use tracing::{info, warn};

use crate::geocode::{select_primary_location, Geocoder};
use crate::language::detect_language;
use crate::ner::NerExtractor;
use crate::risk::classify_risk;
use crate::sentiment::score_sentiment;
use geosignal_translate::TranslationGateway;

#[derive(Debug, Clone)]
pub struct EnricherConfig {
    pub workers: usize,
    pub batch_size: i64,
    pub per_article_timeout: Duration,
    pub translate_char_cap: usize,
    pub canonical_language: String,
    pub max_retries: i32,
    pub shutdown_grace: Duration,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            batch_size: 20,
            per_article_timeout: Duration::from_secs(60),
            translate_char_cap: 4000,
            canonical_language: "en".to_string(),
            max_retries: 2,
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EnrichRunStats {
    pub claimed: usize,
    pub enriched: usize,
    pub failed: usize,
}

/// The NLP Enricher (C5): a cooperative worker pool over `claim_for_enrichment`
/// batches. Mirrors the shape of `geosignal_fetch::FetcherPool::run_batch` —
/// bounded concurrency via `FuturesUnordered`, a single `CancelToken` honored
/// between completions, and a final drain on shutdown.
pub struct EnricherPool {
    config: EnricherConfig,
    store: ArticleStore,
    translation: Arc<TranslationGateway>,
    ner: Arc<NerExtractor>,
    geocoder: Arc<dyn Geocoder>,
}

impl EnricherPool {
    pub fn new(
        config: EnricherConfig,
        store: ArticleStore,
        translation: Arc<TranslationGateway>,
        ner: Arc<NerExtractor>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self { config, store, translation, ner, geocoder }
    }

    /// Claims one batch and processes every article in it, bounded to
    /// `config.workers` concurrent articles. Returns once the batch is
    /// drained or cancellation is observed.
    pub async fn run_batch(&self, stop: CancelToken) -> EnrichRunStats {
        let mut stats = EnrichRunStats::default();

        let claimed = match self.store.claim_for_enrichment(self.config.batch_size, Utc::now()).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = %e, "failed to claim articles for enrichment");
                return stats;
            }
        };
        stats.claimed = claimed.len();
        if claimed.is_empty() {
            return stats;
        }

        let mut in_flight = FuturesUnordered::new();
        let mut pending = claimed.into_iter();

        for article in pending.by_ref().take(self.config.workers) {
            in_flight.push(self.enrich_one(article));
        }

        while let Some(outcome) = in_flight.next().await {
            match outcome {
                Ok(()) => stats.enriched += 1,
                Err(()) => stats.failed += 1,
            }

            if stop.is_cancelled() {
                break;
            }
            if let Some(next) = pending.next() {
                in_flight.push(self.enrich_one(next));
            }
        }

        stop.drain(self.config.shutdown_grace, || !in_flight.is_empty()).await;
        stats
    }

    /// Runs the ordered enrichment steps for one article (§4.5). Each step
    /// is individually tolerant of failure; whatever succeeds is committed.
    /// `processing_state` becomes `enriched` only if language, sentiment,
    /// and risk were all produced — otherwise the claim is released back to
    /// `raw` (or `failed`, past the retry budget) via `mark_failed`.
    async fn enrich_one(&self, article: Article) -> Result<(), ()> {
        let article_id = article.id;
        let result = tokio::time::timeout(self.config.per_article_timeout, self.run_steps(&article)).await;

        match result {
            Ok(Ok(fields)) => match self.store.commit_enrichment(article_id, fields).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    warn!(article_id = %article_id, error = %e, "commit_enrichment failed");
                    let _ = self.store.mark_failed(article_id, "commit_failed", self.config.max_retries).await;
                    Err(())
                }
            },
            Ok(Err(reason)) => {
                warn!(article_id = %article_id, reason, "enrichment step produced no usable result");
                let _ = self.store.mark_failed(article_id, reason, self.config.max_retries).await;
                Err(())
            }
            Err(_elapsed) => {
                warn!(article_id = %article_id, "enrichment timed out");
                let _ = self.store.mark_failed(article_id, "timeout", self.config.max_retries).await;
                Err(())
            }
        }
    }

    async fn run_steps(&self, article: &Article) -> Result<EnrichmentFields, &'static str> {
        let mut fields = EnrichmentFields::default();

        // Step 1: language detection.
        let original_language = match &article.original_language {
            Some(lang) => lang.clone(),
            None => {
                let source_default = article.canonical_language.clone();
                let (lang, _confidence) = detect_language(&article.content, &source_default);
                lang
            }
        };
        fields.original_language = Some(original_language.clone());

        // Step 2: canonical translation, only if needed.
        let (canonical_title, canonical_body) = if original_language != self.config.canonical_language {
            let truncated_body = truncate_chars(&article.content, self.config.translate_char_cap);
            let title_result = self
                .translation
                .translate(&article.title, &original_language, &self.config.canonical_language)
                .await;
            let body_result = self
                .translation
                .translate(&truncated_body, &original_language, &self.config.canonical_language)
                .await;

            match (title_result, body_result) {
                (Ok(title), Ok(body)) => {
                    fields.translated_title = Some(title.text.clone());
                    fields.translated_content = Some(body.text.clone());
                    (title.text, body.text)
                }
                _ => {
                    warn!(article_id = %article.id, "translation failed, proceeding on source text");
                    (article.title.clone(), article.content.clone())
                }
            }
        } else {
            (article.title.clone(), article.content.clone())
        };

        // Step 3: named-entity extraction.
        let entities = match self.ner.extract(&canonical_body).await {
            Ok(entities) => {
                fields.entities = Some(entities.clone());
                entities
            }
            Err(e) => {
                warn!(article_id = %article.id, error = %e, "ner extraction failed");
                EntityMap::default()
            }
        };

        // Step 4: geolocation resolution. Source country is never used here.
        if let Some(primary) = select_primary_location(&entities.locations, &canonical_title, &canonical_body) {
            match self.geocoder.resolve(primary).await {
                Ok(Some(place)) => {
                    fields.country = Some(place.country);
                    fields.region = place.region;
                    fields.latitude = Some(place.lat);
                    fields.longitude = Some(place.lon);
                }
                Ok(None) => info!(article_id = %article.id, location = primary, "geocoder found no match"),
                Err(e) => warn!(article_id = %article.id, error = %e, "geocoding failed"),
            }
        }

        // Step 5: sentiment.
        let sentiment_score = score_sentiment(&canonical_body);
        fields.sentiment_score = Some(sentiment_score);

        // Step 6: risk classification.
        let (risk_level, risk_score) = classify_risk(&canonical_body, sentiment_score, &entities, None);
        fields.risk_level = Some(risk_level);
        fields.risk_score = Some(risk_score);

        if fields.original_language.is_some() && fields.sentiment_score.is_some() && fields.risk_level.is_some() {
            Ok(fields)
        } else {
            Err("incomplete_enrichment")
        }
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_chars;

    #[test]
    fn truncate_chars_respects_the_cap() {
        let long = "a".repeat(100);
        assert_eq!(truncate_chars(&long, 10).chars().count(), 10);
    }

    #[test]
    fn truncate_chars_is_a_no_op_under_the_cap() {
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
