use chrono::{DateTime, Utc};
use geosignal_common::SignalSourceKind;
use uuid::Uuid;

/// A single conflict-relevant observation cast into the common shape the
/// clusterer operates on (§4.7 normalization). `metadata` carries whatever
/// the owning zone needs to roll up later without the clusterer itself
/// having to know the shape of an `Article` vs. an `EventRecord`.
#[derive(Debug, Clone)]
pub struct ConflictSignal {
    pub lat: f64,
    pub lon: f64,
    pub source_kind: SignalSourceKind,
    pub weight: f64,
    pub score: f64,
    pub occurred_at: DateTime<Utc>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub article_id: Option<Uuid>,
    pub event_count: i64,
    pub fatalities: i64,
    pub actors: Vec<String>,
    pub event_types: Vec<String>,
}

impl ConflictSignal {
    pub fn news(
        lat: f64,
        lon: f64,
        score: f64,
        occurred_at: DateTime<Utc>,
        country: Option<String>,
        region: Option<String>,
        article_id: Uuid,
    ) -> Self {
        Self {
            lat,
            lon,
            source_kind: SignalSourceKind::News,
            weight: geosignal_common::quality::WEIGHT_NEWS,
            score,
            occurred_at,
            country,
            region,
            article_id: Some(article_id),
            event_count: 0,
            fatalities: 0,
            actors: Vec::new(),
            event_types: Vec::new(),
        }
    }

    pub fn events(
        lat: f64,
        lon: f64,
        score: f64,
        occurred_at: DateTime<Utc>,
        country: Option<String>,
        region: Option<String>,
        fatalities: i64,
        actors: Vec<String>,
        event_types: Vec<String>,
    ) -> Self {
        Self {
            lat,
            lon,
            source_kind: SignalSourceKind::Events,
            weight: geosignal_common::quality::WEIGHT_EVENTS,
            score,
            occurred_at,
            country,
            region,
            article_id: None,
            event_count: 1,
            fatalities,
            actors,
            event_types,
        }
    }

    pub fn tone(lat: f64, lon: f64, score: f64, occurred_at: DateTime<Utc>, event_count: i64) -> Self {
        Self {
            lat,
            lon,
            source_kind: SignalSourceKind::Tone,
            weight: geosignal_common::quality::WEIGHT_TONE,
            score,
            occurred_at,
            country: None,
            region: None,
            article_id: None,
            event_count,
            fatalities: 0,
            actors: Vec::new(),
            event_types: Vec::new(),
        }
    }
}

/// The current global risk index, as a scalar context applied uniformly to
/// every zone's `global_ctx` term (§4.7) rather than as a spatial signal
/// clustered by proximity — a single GPR value has no `(lat, lon)` of its
/// own.
#[derive(Debug, Clone, Copy)]
pub enum GlobalRiskLevel {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl GlobalRiskLevel {
    /// `gpr_value` bands, calibrated against the Geopolitical Risk Index's
    /// own historical 0-300 range (baseline ~100).
    pub fn from_gpr_value(gpr_value: f64) -> Self {
        if gpr_value >= 200.0 {
            GlobalRiskLevel::VeryHigh
        } else if gpr_value >= 150.0 {
            GlobalRiskLevel::High
        } else if gpr_value >= 100.0 {
            GlobalRiskLevel::Medium
        } else {
            GlobalRiskLevel::Low
        }
    }

    pub fn global_ctx_contribution(self) -> f64 {
        match self {
            GlobalRiskLevel::VeryHigh => 0.15,
            GlobalRiskLevel::High => 0.10,
            GlobalRiskLevel::Medium => 0.05,
            GlobalRiskLevel::Low => 0.0,
        }
    }
}
