use chrono::{DateTime, Utc};
use geosignal_common::RiskLevel;

/// Filter for `query_articles` (§4.9).
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub language: Option<String>,
    pub country: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

/// Filter for `query_zones` (§4.9). `priority` is a minimum `risk_level`
/// floor (e.g. "only critical-and-above"), distinct from the exact-match
/// `risk_level` filter.
#[derive(Debug, Clone, Default)]
pub struct ZoneFilter {
    pub risk_level: Option<RiskLevel>,
    pub since: Option<DateTime<Utc>>,
    pub priority: Option<RiskLevel>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}
