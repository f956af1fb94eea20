use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use ai_client::TextProvider;
use chrono::Utc;
use geosignal_common::{BoundingBox, ConflictZone, GeoPoint, SignalSourceKind};
use geosignal_store::ArticleStore;
use tracing::info;
use uuid::Uuid;

use crate::amplify;
use crate::cluster::{cluster_signals, Cluster};
use crate::error::ConsolidateError;
use crate::score::{monitoring_frequency_for, risk_level_for_final_score, score_cluster, ScoringContext};
use crate::signal::{ConflictSignal, GlobalRiskLevel};

/// Conflict set used to filter event records into consolidator inputs
/// (§4.7 "Event records with ... `event_type ∈` the conflict set"). The
/// conflict set is a domain concept the store doesn't own (see
/// `ArticleStore::query_events_since`'s doc comment), so filtering happens
/// here.
const CONFLICT_EVENT_TYPES: &[&str] = &[
    "battle",
    "violence against civilians",
    "explosions/remote violence",
    "armed clash",
    "shelling/artillery/missile attack",
    "air/drone strike",
];

#[derive(Debug, Clone)]
pub struct ConsolidatorConfig {
    pub lookback_days: i64,
    pub proximity_radius_degrees: f64,
    pub news_risk_threshold: f32,
    pub news_sentiment_threshold: f32,
    pub tone_min_event_count: u32,
    pub ai_amplification_enabled: bool,
    pub ai_amplification_threshold: f64,
    pub predictions_enabled: bool,
    pub prediction_threshold: f64,
    pub prediction_offset_degrees: f64,
}

impl Default for ConsolidatorConfig {
    fn default() -> Self {
        Self {
            lookback_days: 7,
            proximity_radius_degrees: crate::cluster::default_radius(),
            news_risk_threshold: 0.5,
            news_sentiment_threshold: -0.3,
            tone_min_event_count: 3,
            ai_amplification_enabled: true,
            ai_amplification_threshold: 0.6,
            predictions_enabled: true,
            prediction_threshold: 0.4,
            prediction_offset_degrees: 0.6,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolidationStats {
    pub signals_considered: usize,
    pub zones_published: usize,
    pub predicted_zones: usize,
    pub amplified_zones: usize,
}

impl std::fmt::Display for ConsolidationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "signals={} zones={} predictions={} amplified={}",
            self.signals_considered, self.zones_published, self.predicted_zones, self.amplified_zones
        )
    }
}

/// The Conflict Zone Consolidator (C7): single-worker, never overlapping
/// itself (§5) — callers are responsible for that mutex (the scheduler's
/// job-level lock); this type itself holds no internal reentrancy guard.
pub struct Consolidator {
    config: ConsolidatorConfig,
    store: ArticleStore,
    ai_client: Option<Arc<dyn TextProvider>>,
}

impl Consolidator {
    pub fn new(config: ConsolidatorConfig, store: ArticleStore, ai_client: Option<Arc<dyn TextProvider>>) -> Self {
        Self { config, store, ai_client }
    }

    /// Runs one full consolidation pass (§4.7): reads all inputs within the
    /// lookback window, clusters and scores them, optionally amplifies and
    /// predicts, then publishes the entire new collection atomically via
    /// `replace_zones`.
    pub async fn run(&self) -> Result<ConsolidationStats, ConsolidateError> {
        let mut stats = ConsolidationStats::default();
        let now = Utc::now();
        let since = now - chrono::Duration::days(self.config.lookback_days);
        let since_date = since.date_naive();

        let articles = self
            .store
            .query_conflict_articles(since, self.config.news_risk_threshold, self.config.news_sentiment_threshold)
            .await?;
        let events = self.store.query_events_since(since_date).await?;
        let tone_events = self.store.query_tone_events_since(since_date).await?;
        let risk_index = self.store.latest_risk_index().await?;

        let global_risk_level = risk_index
            .as_ref()
            .map(|r| GlobalRiskLevel::from_gpr_value(r.gpr_value))
            .unwrap_or(GlobalRiskLevel::Low);

        let mut signals = Vec::new();

        for article in &articles {
            if let (Some(lat), Some(lon)) = (article.latitude, article.longitude) {
                let score = article.risk_score.unwrap_or(0.0) as f64;
                signals.push(ConflictSignal::news(
                    lat,
                    lon,
                    score,
                    article.published_at,
                    article.country.clone(),
                    article.region.clone(),
                    article.id,
                ));
            }
        }

        for event in &events {
            if !CONFLICT_EVENT_TYPES.iter().any(|t| t.eq_ignore_ascii_case(&event.event_type)) {
                continue;
            }
            let occurred_at = event.event_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
            let actors: Vec<String> = [event.actor1.clone(), event.actor2.clone()].into_iter().flatten().collect();
            signals.push(ConflictSignal::events(
                event.latitude,
                event.longitude,
                1.0,
                occurred_at,
                Some(event.country.clone()),
                event.region.clone(),
                event.fatalities,
                actors,
                vec![event.event_type.clone()],
            ));
        }

        // Tone events aggregated by rounded location before the count/avg_tone filter:
        // §4.7 "Tone events with avg_tone < 0 and event_count >= 3 (aggregated by location)".
        let mut tone_by_location: HashMap<(i64, i64), Vec<&geosignal_common::GlobalEventTone>> = HashMap::new();
        for tone in &tone_events {
            let key = (round_to_tenth(tone.latitude), round_to_tenth(tone.longitude));
            tone_by_location.entry(key).or_default().push(tone);
        }
        for ((lat_key, lon_key), group) in tone_by_location {
            let avg_tone = group.iter().map(|t| t.avg_tone).sum::<f64>() / group.len() as f64;
            let event_count = group.len() as u32;
            if avg_tone < 0.0 && event_count >= self.config.tone_min_event_count {
                let latest = group.iter().map(|t| t.sql_date).max().unwrap_or(since_date);
                let occurred_at = latest.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
                let lat = lat_key as f64 / 10.0;
                let lon = lon_key as f64 / 10.0;
                let score = (-avg_tone / 100.0).clamp(0.0, 1.0);
                signals.push(ConflictSignal::tone(lat, lon, score, occurred_at, event_count as i64));
            }
        }

        stats.signals_considered = signals.len();
        if signals.is_empty() {
            info!("no conflict signals within lookback window, publishing empty zone collection");
            self.store.replace_zones(&[]).await?;
            return Ok(stats);
        }

        let clusters = cluster_signals(signals, self.config.proximity_radius_degrees);
        let ctx = ScoringContext { global_risk_level, now };

        let mut zones = Vec::new();
        for cluster in &clusters {
            let zone = self.build_zone(cluster, &ctx).await;
            zones.push(zone);
        }

        stats.amplified_zones = zones.iter().filter(|z| z.final_risk_score >= self.config.ai_amplification_threshold).count();

        if self.config.predictions_enabled {
            let predictions: Vec<ConflictZone> = zones
                .iter()
                .filter(|z| z.final_risk_score > self.config.prediction_threshold && z.sources.len() >= 2)
                .map(|z| self.predict_adjacent_zone(z))
                .collect();
            stats.predicted_zones = predictions.len();
            zones.extend(predictions);
        }

        stats.zones_published = zones.len();
        self.store.replace_zones(&zones).await?;

        info!(%stats, "consolidation run complete");
        Ok(stats)
    }

    async fn build_zone(&self, cluster: &Cluster, ctx: &ScoringContext) -> ConflictZone {
        let breakdown = score_cluster(cluster, ctx);

        let mut final_score = breakdown.final_score;
        if self.config.ai_amplification_enabled && final_score >= self.config.ai_amplification_threshold {
            if let Some(client) = &self.ai_client {
                let summary = summarize_for_amplification(cluster);
                let bonus = amplify::amplify(client, &summary).await;
                final_score = (final_score + bonus).min(1.0);
            }
        }

        let risk_level = risk_level_for_final_score(final_score);
        let monitoring_frequency = monitoring_frequency_for(risk_level);

        let (centroid_lat, centroid_lon) = cluster.centroid();
        let bbox = bounding_box(cluster);

        let sources: HashSet<SignalSourceKind> = cluster.members.iter().map(|s| s.source_kind).collect();
        let mut source_scores: HashMap<String, f64> = HashMap::new();
        source_scores.insert("base".to_string(), breakdown.base);
        source_scores.insert("multi_src".to_string(), breakdown.multi_src);
        source_scores.insert("volume".to_string(), breakdown.volume);
        source_scores.insert("fatality".to_string(), breakdown.fatality);
        source_scores.insert("global_ctx".to_string(), breakdown.global_ctx);
        source_scores.insert("recency".to_string(), breakdown.recency);

        let total_events: i64 = cluster.members.iter().map(|s| s.event_count).sum();
        let total_fatalities: i64 = cluster.members.iter().map(|s| s.fatalities).sum();
        let actors: HashSet<String> = cluster.members.iter().flat_map(|s| s.actors.iter().cloned()).collect();
        let event_types: HashSet<String> = cluster.members.iter().flat_map(|s| s.event_types.iter().cloned()).collect();
        let latest_event_at = cluster.members.iter().map(|s| s.occurred_at).max().unwrap_or_else(Utc::now);
        let member_article_ids: HashSet<Uuid> = cluster.members.iter().filter_map(|s| s.article_id).collect();

        let country = cluster.members.iter().find_map(|s| s.country.clone());
        let region = cluster.members.iter().find_map(|s| s.region.clone());
        let location_label = country.clone().unwrap_or_else(|| format!("{centroid_lat:.2},{centroid_lon:.2}"));

        ConflictZone {
            zone_id: Uuid::new_v4(),
            centroid: GeoPoint { lat: centroid_lat, lng: centroid_lon },
            bbox,
            location_label,
            country,
            region,
            sources,
            source_scores,
            total_events,
            total_fatalities,
            actors,
            event_types,
            latest_event_at,
            final_risk_score: final_score,
            risk_level,
            monitoring_frequency,
            member_article_ids,
            is_prediction: false,
        }
    }

    /// Emits the adjacent predicted zone for a consolidated zone (§4.7
    /// "Predictions"): `final' = 0.6 * final`, offset by a fixed delta in
    /// both lat and lon, flagged `is_prediction`.
    fn predict_adjacent_zone(&self, zone: &ConflictZone) -> ConflictZone {
        let delta = self.config.prediction_offset_degrees;
        let lat = zone.centroid.lat + delta;
        let lon = zone.centroid.lng + delta;
        let final_score = zone.final_risk_score * 0.6;
        let risk_level = risk_level_for_final_score(final_score);

        ConflictZone {
            zone_id: Uuid::new_v4(),
            centroid: GeoPoint { lat, lng: lon },
            bbox: BoundingBox {
                min_lat: lat - (zone.bbox.max_lat - zone.bbox.min_lat) / 2.0,
                min_lng: lon - (zone.bbox.max_lng - zone.bbox.min_lng) / 2.0,
                max_lat: lat + (zone.bbox.max_lat - zone.bbox.min_lat) / 2.0,
                max_lng: lon + (zone.bbox.max_lng - zone.bbox.min_lng) / 2.0,
            },
            location_label: format!("{} (projected)", zone.location_label),
            country: zone.country.clone(),
            region: zone.region.clone(),
            sources: {
                let mut s = HashSet::new();
                s.insert(SignalSourceKind::Prediction);
                s
            },
            source_scores: HashMap::new(),
            total_events: 0,
            total_fatalities: 0,
            actors: zone.actors.clone(),
            event_types: zone.event_types.clone(),
            latest_event_at: zone.latest_event_at,
            final_risk_score: final_score,
            risk_level,
            monitoring_frequency: monitoring_frequency_for(risk_level),
            member_article_ids: HashSet::new(),
            is_prediction: true,
        }
    }
}

fn bounding_box(cluster: &Cluster) -> BoundingBox {
    let lats: Vec<f64> = cluster.members.iter().map(|s| s.lat).collect();
    let lons: Vec<f64> = cluster.members.iter().map(|s| s.lon).collect();
    BoundingBox {
        min_lat: lats.iter().cloned().fold(f64::INFINITY, f64::min),
        min_lng: lons.iter().cloned().fold(f64::INFINITY, f64::min),
        max_lat: lats.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        max_lng: lons.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    }
}

fn round_to_tenth(v: f64) -> i64 {
    (v * 10.0).round() as i64
}

fn summarize_for_amplification(cluster: &Cluster) -> String {
    let sources: HashSet<String> = cluster.members.iter().map(|s| s.source_kind.to_string()).collect();
    let actors: Vec<String> = cluster.members.iter().flat_map(|s| s.actors.iter().cloned()).take(10).collect();
    let total_fatalities: i64 = cluster.members.iter().map(|s| s.fatalities).sum();
    format!(
        "Cluster of {} signals from sources [{}], total fatalities {}, actors: {}",
        cluster.members.len(),
        sources.into_iter().collect::<Vec<_>>().join(", "),
        total_fatalities,
        if actors.is_empty() { "none identified".to_string() } else { actors.join(", ") }
    )
}

/// Allows `ConsolidatorConfig` to be built from shared process config
/// without every caller repeating the field list (§6's enumerated config
/// keys map 1:1 onto this).
impl From<&geosignal_common::Config> for ConsolidatorConfig {
    fn from(cfg: &geosignal_common::Config) -> Self {
        Self {
            lookback_days: cfg.events_window_days,
            proximity_radius_degrees: cfg.proximity_radius_degrees,
            news_risk_threshold: cfg.news_risk_threshold as f32,
            news_sentiment_threshold: cfg.news_sentiment_threshold as f32,
            tone_min_event_count: cfg.tone_event_min_count,
            ai_amplification_enabled: cfg.ai_amplification_enabled,
            ai_amplification_threshold: 0.6,
            predictions_enabled: cfg.predictions_enabled,
            prediction_threshold: 0.4,
            prediction_offset_degrees: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_tenth_buckets_nearby_coordinates_together() {
        assert_eq!(round_to_tenth(48.51), round_to_tenth(48.54));
        assert_ne!(round_to_tenth(48.51), round_to_tenth(48.61));
    }
}
