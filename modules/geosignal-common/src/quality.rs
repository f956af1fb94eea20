/// Risk-level score floors (§4.5.6): `critical ⇒ risk_score ≥ 0.8`, `high ⇒ ≥ 0.6`,
/// `medium ⇒ ≥ 0.4`, `low` otherwise.
pub const RISK_THRESHOLD_CRITICAL: f32 = 0.8;
pub const RISK_THRESHOLD_HIGH: f32 = 0.6;
pub const RISK_THRESHOLD_MEDIUM: f32 = 0.4;

/// Zone final-score weights per source kind (§4.7 normalization table).
pub const WEIGHT_NEWS: f64 = 0.4;
pub const WEIGHT_EVENTS: f64 = 0.3;
pub const WEIGHT_TONE: f64 = 0.2;
pub const WEIGHT_RISK_INDEX: f64 = 0.1;

/// Proximity radius (degrees) used by the consolidator's clustering (§4.7).
pub const DEFAULT_PROXIMITY_RADIUS_DEGREES: f64 = 0.5;

/// Default lookback window (days) for consolidator inputs (§4.7).
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Given a `risk_score`, derive the `risk_level` per the thresholds ties break
/// toward the lower level, so boundary values round down to the stricter tier.
pub fn risk_level_for_score(score: f32) -> crate::types::RiskLevel {
    use crate::types::RiskLevel;
    if score >= RISK_THRESHOLD_CRITICAL {
        RiskLevel::Critical
    } else if score >= RISK_THRESHOLD_HIGH {
        RiskLevel::High
    } else if score >= RISK_THRESHOLD_MEDIUM {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLevel;

    #[test]
    fn exact_boundary_rounds_to_stricter_tier() {
        assert_eq!(risk_level_for_score(0.8), RiskLevel::Critical);
        assert_eq!(risk_level_for_score(0.6), RiskLevel::High);
        assert_eq!(risk_level_for_score(0.4), RiskLevel::Medium);
    }

    #[test]
    fn below_medium_is_low() {
        assert_eq!(risk_level_for_score(0.39), RiskLevel::Low);
    }
}
