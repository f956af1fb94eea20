use chrono::{DateTime, NaiveDate, Utc};
use geosignal_common::{Article, EntityMap, ProcessingState, RiskLevel};
use uuid::Uuid;

/// Raw database row for `articles`, kept distinct from the public `Article`
/// type so storage-layer nullability and bookkeeping columns (`claimed_at`,
/// `retry_count`) never leak into the domain model.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ArticleRow {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub source_name: String,
    pub source_url: String,
    pub published_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
    pub original_language: Option<String>,
    pub canonical_language: String,
    pub translated_title: Option<String>,
    pub translated_content: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub risk_level: Option<String>,
    pub risk_score: Option<f32>,
    pub sentiment_score: Option<f32>,
    pub category: Option<String>,
    pub entities: Option<serde_json::Value>,
    pub processing_state: String,
}

impl ArticleRow {
    pub(crate) fn into_article(self) -> Article {
        Article {
            id: self.id,
            url: self.url,
            title: self.title,
            content: self.content,
            summary: self.summary,
            source_name: self.source_name,
            source_url: self.source_url,
            published_at: self.published_at,
            fetched_at: self.fetched_at,
            original_language: self.original_language,
            canonical_language: self.canonical_language,
            translated_title: self.translated_title,
            translated_content: self.translated_content,
            country: self.country,
            region: self.region,
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self.image_url,
            risk_level: self.risk_level.and_then(|s| s.parse::<RiskLevel>().ok()),
            risk_score: self.risk_score,
            sentiment_score: self.sentiment_score,
            category: self.category,
            entities: self.entities.and_then(|v| serde_json::from_value::<EntityMap>(v).ok()),
            processing_state: self
                .processing_state
                .parse::<ProcessingState>()
                .unwrap_or(ProcessingState::Failed),
        }
    }
}

/// Fields the enricher commits in one call (§4.1 `commit_enrichment`).
#[derive(Debug, Clone, Default)]
pub struct EnrichmentFields {
    pub original_language: Option<String>,
    pub translated_title: Option<String>,
    pub translated_content: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub risk_score: Option<f32>,
    pub sentiment_score: Option<f32>,
    pub category: Option<String>,
    pub entities: Option<EntityMap>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct EventRecordRow {
    pub event_id_from_provider: String,
    pub event_date: NaiveDate,
    pub country: String,
    pub region: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub event_type: String,
    pub sub_event_type: Option<String>,
    pub actor1: Option<String>,
    pub actor2: Option<String>,
    pub fatalities: i64,
    pub notes: Option<String>,
    pub imported_at: DateTime<Utc>,
}

impl EventRecordRow {
    pub(crate) fn into_record(self) -> geosignal_common::EventRecord {
        geosignal_common::EventRecord {
            event_id_from_provider: self.event_id_from_provider,
            event_date: self.event_date,
            country: self.country,
            region: self.region,
            latitude: self.latitude,
            longitude: self.longitude,
            event_type: self.event_type,
            sub_event_type: self.sub_event_type,
            actor1: self.actor1,
            actor2: self.actor2,
            fatalities: self.fatalities,
            notes: self.notes,
            imported_at: self.imported_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct GlobalEventToneRow {
    pub global_event_id: String,
    pub sql_date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub avg_tone: f64,
    pub goldstein_scale: f64,
    pub event_code: String,
    pub event_root_code: String,
    pub num_mentions: i64,
    pub num_sources: i64,
    pub num_articles: i64,
}

impl GlobalEventToneRow {
    pub(crate) fn into_tone(self) -> geosignal_common::GlobalEventTone {
        geosignal_common::GlobalEventTone {
            global_event_id: self.global_event_id,
            sql_date: self.sql_date,
            latitude: self.latitude,
            longitude: self.longitude,
            avg_tone: self.avg_tone,
            goldstein_scale: self.goldstein_scale,
            event_code: self.event_code,
            event_root_code: self.event_root_code,
            num_mentions: self.num_mentions,
            num_sources: self.num_sources,
            num_articles: self.num_articles,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ConflictZoneRow {
    pub zone_id: Uuid,
    pub centroid_lat: f64,
    pub centroid_lng: f64,
    pub bbox_min_lat: f64,
    pub bbox_min_lng: f64,
    pub bbox_max_lat: f64,
    pub bbox_max_lng: f64,
    pub location_label: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub sources: serde_json::Value,
    pub source_scores: serde_json::Value,
    pub total_events: i64,
    pub total_fatalities: i64,
    pub actors: serde_json::Value,
    pub event_types: serde_json::Value,
    pub latest_event_at: DateTime<Utc>,
    pub final_risk_score: f64,
    pub risk_level: String,
    pub monitoring_frequency: String,
    pub member_article_ids: serde_json::Value,
    pub is_prediction: bool,
}

impl ConflictZoneRow {
    pub(crate) fn into_zone(self) -> geosignal_common::ConflictZone {
        geosignal_common::ConflictZone {
            zone_id: self.zone_id,
            centroid: geosignal_common::GeoPoint { lat: self.centroid_lat, lng: self.centroid_lng },
            bbox: geosignal_common::BoundingBox {
                min_lat: self.bbox_min_lat,
                min_lng: self.bbox_min_lng,
                max_lat: self.bbox_max_lat,
                max_lng: self.bbox_max_lng,
            },
            location_label: self.location_label,
            country: self.country,
            region: self.region,
            sources: serde_json::from_value(self.sources).unwrap_or_default(),
            source_scores: serde_json::from_value(self.source_scores).unwrap_or_default(),
            total_events: self.total_events,
            total_fatalities: self.total_fatalities,
            actors: serde_json::from_value(self.actors).unwrap_or_default(),
            event_types: serde_json::from_value(self.event_types).unwrap_or_default(),
            latest_event_at: self.latest_event_at,
            final_risk_score: self.final_risk_score,
            risk_level: self.risk_level.parse().unwrap_or(RiskLevel::Low),
            monitoring_frequency: self.monitoring_frequency.parse().unwrap_or(
                geosignal_common::MonitoringFrequency::Monthly,
            ),
            member_article_ids: serde_json::from_value(self.member_article_ids).unwrap_or_default(),
            is_prediction: self.is_prediction,
        }
    }
}
