use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A geographic point. `lat`/`lng` are either both set or both absent on an
/// `Article` — there is no partial coordinate state (§3 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    Raw,
    Enriching,
    Enriched,
    Failed,
}

impl std::fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProcessingState::Raw => "raw",
            ProcessingState::Enriching => "enriching",
            ProcessingState::Enriched => "enriched",
            ProcessingState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ProcessingState {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "enriching" => Ok(Self::Enriching),
            "enriched" => Ok(Self::Enriched),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown processing_state: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown risk_level: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EntityMap {
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub misc: Vec<String>,
}

/// A single ingested news item. See §3 for the full invariant list; the
/// notable one enforced only at the store boundary (not in this struct
/// alone) is the raw→enriching→(enriched|failed) state machine.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Article {
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
    pub risk_level: Option<RiskLevel>,
    pub risk_score: Option<f32>,
    pub sentiment_score: Option<f32>,
    pub category: Option<String>,
    pub entities: Option<EntityMap>,
    pub processing_state: ProcessingState,
}

impl Article {
    /// Content hash used as the dedup key (§3): normalized over `(title, url)`.
    pub fn content_hash(&self) -> String {
        content_hash(&self.title, &self.url)
    }

    /// Whether this article carries a complete geolocation (both-or-neither
    /// invariant from §3).
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    pub fn geo_point(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

/// Dedup key per §3: a content hash over normalized `(title, url)`.
pub fn content_hash(title: &str, url: &str) -> String {
    use std::hash::{Hash, Hasher};
    let normalized_title: String = title.trim().to_lowercase();
    let normalized_url: String = url.trim().to_lowercase();
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    normalized_title.hash(&mut hasher);
    normalized_url.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Rss,
    Atom,
    JsonApi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Standard,
}

/// A configured feed endpoint (§3). Created from the static registry;
/// enabled/disabled by an operator, never deleted at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Source {
    pub name: String,
    pub feed_url: String,
    pub protocol: Protocol,
    pub language: String,
    pub country: String,
    pub region: String,
    pub priority: Priority,
    pub conflict_zone_tag: Option<String>,
    pub enabled: bool,
}

/// External events dataset row (§3). Identity is `(event_id_from_provider, event_date)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EventRecord {
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

/// Global event-tone dataset row (§3). Identity is `global_event_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GlobalEventTone {
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

/// Global risk index series row (§3). Identity is `date`; replacing the full
/// series is allowed (the table is monotone in date, not append-only).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RiskIndexPoint {
    pub date: NaiveDate,
    pub gpr_value: f64,
    pub gpr_threats: f64,
    pub gpr_acts: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringFrequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for MonitoringFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MonitoringFrequency::Hourly => "hourly",
            MonitoringFrequency::Daily => "daily",
            MonitoringFrequency::Weekly => "weekly",
            MonitoringFrequency::Monthly => "monthly",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MonitoringFrequency {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown monitoring_frequency: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalSourceKind {
    News,
    Events,
    Tone,
    RiskIndex,
    Prediction,
}

impl std::fmt::Display for SignalSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SignalSourceKind::News => "news",
            SignalSourceKind::Events => "events",
            SignalSourceKind::Tone => "tone",
            SignalSourceKind::RiskIndex => "risk_index",
            SignalSourceKind::Prediction => "prediction",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

/// A clustered aggregation of spatially co-located conflict signals (§3, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConflictZone {
    pub zone_id: Uuid,
    pub centroid: GeoPoint,
    pub bbox: BoundingBox,
    pub location_label: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub sources: HashSet<SignalSourceKind>,
    pub source_scores: HashMap<String, f64>,
    pub total_events: i64,
    pub total_fatalities: i64,
    pub actors: HashSet<String>,
    pub event_types: HashSet<String>,
    pub latest_event_at: DateTime<Utc>,
    pub final_risk_score: f64,
    pub risk_level: RiskLevel,
    pub monitoring_frequency: MonitoringFrequency,
    pub member_article_ids: HashSet<Uuid>,
    pub is_prediction: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedRunStatus {
    Ok,
    Error,
}

/// Per-run, per-source integrator log entry (§3, §4.6).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FeedUpdateLog {
    pub id: Uuid,
    pub integrator_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub records_ingested: i64,
    pub status: FeedRunStatus,
    pub error_message: Option<String>,
    pub data_date_range_start: Option<NaiveDate>,
    pub data_date_range_end: Option<NaiveDate>,
}

/// Operational notice raised by the health monitor (§4.10 supplement): a
/// threshold breach on risk aggregates, or a stalled integrator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Alert {
    pub severity: RiskLevel,
    pub component: String,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_case_and_whitespace_insensitive() {
        let a = content_hash("Missile Strike", "https://example.com/a");
        let b = content_hash("  missile strike  ", "HTTPS://EXAMPLE.COM/a");
        assert_eq!(a, b);
    }

    #[test]
    fn content_hash_differs_on_url() {
        let a = content_hash("Missile Strike", "https://example.com/a");
        let b = content_hash("Missile Strike", "https://example.com/b");
        assert_ne!(a, b);
    }

    #[test]
    fn processing_state_round_trips_through_display_and_from_str() {
        use std::str::FromStr;
        for state in [
            ProcessingState::Raw,
            ProcessingState::Enriching,
            ProcessingState::Enriched,
            ProcessingState::Failed,
        ] {
            let rendered = state.to_string();
            assert_eq!(ProcessingState::from_str(&rendered).unwrap(), state);
        }
    }
}
