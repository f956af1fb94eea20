use std::collections::HashSet;

use chrono::{DateTime, Utc};
use geosignal_common::quality::risk_level_for_score;
use geosignal_common::{MonitoringFrequency, RiskLevel, SignalSourceKind};

use crate::cluster::Cluster;
use crate::signal::GlobalRiskLevel;

/// Inputs the final-score formula (§4.7) needs beyond what's already on the
/// cluster's members: the risk-index context and "now" for recency.
pub struct ScoringContext {
    pub global_risk_level: GlobalRiskLevel,
    pub now: DateTime<Utc>,
}

/// The components of the §4.7 final-score formula, kept visible on the
/// zone's `source_scores` map (one entry per term, not per source_kind) so
/// the breakdown is inspectable rather than folded away immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub multi_src: f64,
    pub volume: f64,
    pub fatality: f64,
    pub global_ctx: f64,
    pub recency: f64,
    pub final_score: f64,
}

/// Computes the final zone score per §4.7's formula, exactly as given —
/// this is the canonical formula (§9 Open Question 1), no alternative
/// scoring variant is applied.
pub fn score_cluster(cluster: &Cluster, ctx: &ScoringContext) -> ScoreBreakdown {
    let total_weight: f64 = cluster.members.iter().map(|s| s.weight).sum();
    let weighted_score: f64 = cluster.members.iter().map(|s| s.score * s.weight).sum();
    let base = if total_weight > 0.0 { weighted_score / total_weight } else { 0.0 };

    let distinct_sources: HashSet<SignalSourceKind> = cluster.members.iter().map(|s| s.source_kind).collect();
    let multi_src = (0.05 * distinct_sources.len() as f64).min(0.2);

    let total_events: i64 = cluster.members.iter().map(|s| s.event_count).sum();
    let volume = (total_events as f64 / 20.0).min(0.3);

    let total_fatalities: i64 = cluster.members.iter().map(|s| s.fatalities).sum();
    let fatality = (total_fatalities as f64 / 50.0).min(0.2);

    let global_ctx = ctx.global_risk_level.global_ctx_contribution();

    let latest_event_at = cluster.members.iter().map(|s| s.occurred_at).max().unwrap_or(ctx.now);
    let days_since_latest = (ctx.now - latest_event_at).num_hours() as f64 / 24.0;
    let recency = (0.1 - 0.01 * days_since_latest).max(0.0);

    let final_score = (base + multi_src + volume + fatality + global_ctx + recency).min(1.0);

    ScoreBreakdown { base, multi_src, volume, fatality, global_ctx, recency, final_score }
}

pub fn risk_level_for_final_score(score: f64) -> RiskLevel {
    risk_level_for_score(score as f32)
}

/// `critical→daily, high→weekly, else→monthly` (§4.7).
pub fn monitoring_frequency_for(level: RiskLevel) -> MonitoringFrequency {
    match level {
        RiskLevel::Critical => MonitoringFrequency::Daily,
        RiskLevel::High => MonitoringFrequency::Weekly,
        RiskLevel::Medium | RiskLevel::Low => MonitoringFrequency::Monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::ConflictSignal;
    use chrono::Utc;

    fn ctx(global: GlobalRiskLevel) -> ScoringContext {
        ScoringContext { global_risk_level: global, now: Utc::now() }
    }

    #[test]
    fn base_is_weighted_average_of_member_scores() {
        let now = Utc::now();
        let cluster = Cluster {
            members: vec![
                ConflictSignal::news(0.0, 0.0, 0.8, now, None, None, uuid::Uuid::new_v4()),
                ConflictSignal::events(0.0, 0.0, 0.6, now, None, None, 0, vec![], vec![]),
            ],
        };
        let breakdown = score_cluster(&cluster, &ctx(GlobalRiskLevel::Low));
        let expected = (0.8 * 0.4 + 0.6 * 0.3) / (0.4 + 0.3);
        assert!((breakdown.base - expected).abs() < 1e-9);
    }

    #[test]
    fn final_score_never_exceeds_one() {
        let now = Utc::now();
        let cluster = Cluster {
            members: vec![
                ConflictSignal::news(0.0, 0.0, 1.0, now, None, None, uuid::Uuid::new_v4()),
                ConflictSignal::events(0.0, 0.0, 1.0, now, None, None, 1000, vec![], vec![]),
                ConflictSignal::tone(0.0, 0.0, 1.0, now, 100),
            ],
        };
        let breakdown = score_cluster(&cluster, &ctx(GlobalRiskLevel::VeryHigh));
        assert!(breakdown.final_score <= 1.0);
    }

    #[test]
    fn scenario_4_matches_expected_critical_zone() {
        // §8 scenario 4: 10 articles risk_score in [0.6,0.9], 20 events, 75 fatalities.
        let now = Utc::now();
        let mut members = Vec::new();
        for i in 0..10 {
            let score = 0.6 + (i as f64 * 0.03);
            members.push(ConflictSignal::news(48.5, 37.5, score, now, Some("Y".into()), None, uuid::Uuid::new_v4()));
        }
        for _ in 0..20 {
            members.push(ConflictSignal::events(48.5, 37.5, 0.8, now, Some("Y".into()), None, 75 / 20, vec![], vec![]));
        }
        let cluster = Cluster { members };
        let breakdown = score_cluster(&cluster, &ctx(GlobalRiskLevel::Medium));
        assert!(breakdown.final_score >= 0.9, "expected >= 0.9, got {}", breakdown.final_score);
        assert_eq!(risk_level_for_final_score(breakdown.final_score), RiskLevel::Critical);
        assert_eq!(monitoring_frequency_for(RiskLevel::Critical), MonitoringFrequency::Daily);
    }

    #[test]
    fn monitoring_frequency_maps_each_tier() {
        assert_eq!(monitoring_frequency_for(RiskLevel::Critical), MonitoringFrequency::Daily);
        assert_eq!(monitoring_frequency_for(RiskLevel::High), MonitoringFrequency::Weekly);
        assert_eq!(monitoring_frequency_for(RiskLevel::Medium), MonitoringFrequency::Monthly);
        assert_eq!(monitoring_frequency_for(RiskLevel::Low), MonitoringFrequency::Monthly);
    }
}
