use std::sync::Arc;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::{Alert, RiskLevel};

/// Outcome of one source's poll within a fetch job run, as seen by C10
/// ("per-source fetch success rate"). Distinct from `geosignal_fetch`'s own
/// richer stats type — this is the trimmed, crate-agnostic shape that
/// crosses into the health snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceFetchHealth {
    pub source_name: String,
    pub inserted: u64,
    pub duplicates: u64,
    pub succeeded: bool,
    pub last_error: Option<String>,
}

/// A point-in-time view of every component's last run, assembled from
/// whatever the scheduler's jobs reported (§4.10). Never written to the
/// Article Store; this is operational state, not domain state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HealthSnapshot {
    pub last_fetch_at: Option<DateTime<Utc>>,
    pub last_fetch_sources: Vec<SourceFetchHealth>,

    pub last_enrich_at: Option<DateTime<Utc>>,
    pub last_enrich_claimed: usize,
    pub last_enrich_enriched: usize,
    pub last_enrich_failed: usize,

    pub last_consolidate_at: Option<DateTime<Utc>>,
    pub last_consolidate_duration_ms: u64,
    pub last_consolidate_zones: usize,

    pub alerts: Vec<Alert>,
}

/// Shared handle the scheduler's job wrappers write into after each run and
/// the Query API's `/metrics` and `/health` handlers read from (§4.10).
/// Modeled the same way as `CancelToken` — cheap to clone, internally
/// synchronized, no caller ever sees a torn snapshot because every update
/// replaces the relevant fields under one write lock.
#[derive(Clone, Default)]
pub struct HealthMonitor(Arc<RwLock<HealthSnapshot>>);

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_fetch(&self, sources: Vec<SourceFetchHealth>) {
        let mut snapshot = self.0.write().await;
        snapshot.last_fetch_at = Some(Utc::now());
        snapshot.last_fetch_sources = sources;
    }

    pub async fn record_enrich(&self, claimed: usize, enriched: usize, failed: usize) {
        let mut snapshot = self.0.write().await;
        snapshot.last_enrich_at = Some(Utc::now());
        snapshot.last_enrich_claimed = claimed;
        snapshot.last_enrich_enriched = enriched;
        snapshot.last_enrich_failed = failed;
    }

    pub async fn record_consolidate(&self, duration_ms: u64, zones: usize) {
        let mut snapshot = self.0.write().await;
        snapshot.last_consolidate_at = Some(Utc::now());
        snapshot.last_consolidate_duration_ms = duration_ms;
        snapshot.last_consolidate_zones = zones;
    }

    /// Appends an alert (§4.10 supplement), keeping only the most recent
    /// `cap` so the snapshot can't grow unbounded across a long uptime.
    pub async fn raise_alert(&self, alert: Alert, cap: usize) {
        let mut snapshot = self.0.write().await;
        snapshot.alerts.push(alert);
        let len = snapshot.alerts.len();
        if len > cap {
            snapshot.alerts.drain(0..len - cap);
        }
    }

    pub async fn snapshot(&self) -> HealthSnapshot {
        self.0.read().await.clone()
    }
}

/// Raises a `critical`-severity alert when `critical_zone_count` exceeds
/// `ceiling`, per §4.10's supplement. Pure helper so the engine and tests
/// can both drive it without going through the monitor's lock.
pub fn critical_zone_alert(critical_zone_count: i64, ceiling: i64) -> Option<Alert> {
    if critical_zone_count > ceiling {
        Some(Alert {
            severity: RiskLevel::Critical,
            component: "consolidator".to_string(),
            message: format!("{critical_zone_count} critical zones active, exceeding ceiling of {ceiling}"),
            raised_at: Utc::now(),
        })
    } else {
        None
    }
}

/// Raises a `high`-severity alert when an integrator's last recorded run is
/// older than its expected cadence, per §4.10's supplement.
pub fn stale_integrator_alert(component: &str, last_success: Option<DateTime<Utc>>, max_age: chrono::Duration) -> Option<Alert> {
    let is_stale = match last_success {
        None => true,
        Some(at) => Utc::now().signed_duration_since(at) > max_age,
    };
    if is_stale {
        Some(Alert {
            severity: RiskLevel::High,
            component: component.to_string(),
            message: format!("{component} has not completed a successful run within the expected cadence"),
            raised_at: Utc::now(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn record_and_read_fetch_snapshot() {
        let monitor = HealthMonitor::new();
        monitor
            .record_fetch(vec![SourceFetchHealth {
                source_name: "bbc".to_string(),
                inserted: 3,
                duplicates: 1,
                succeeded: true,
                last_error: None,
            }])
            .await;
        let snapshot = monitor.snapshot().await;
        assert!(snapshot.last_fetch_at.is_some());
        assert_eq!(snapshot.last_fetch_sources.len(), 1);
    }

    #[tokio::test]
    async fn alert_cap_drops_oldest_first() {
        let monitor = HealthMonitor::new();
        for i in 0..5 {
            monitor
                .raise_alert(
                    Alert {
                        severity: RiskLevel::Low,
                        component: "x".to_string(),
                        message: format!("alert {i}"),
                        raised_at: Utc::now(),
                    },
                    3,
                )
                .await;
        }
        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.alerts.len(), 3);
        assert_eq!(snapshot.alerts[0].message, "alert 2");
    }

    #[test]
    fn critical_zone_alert_fires_only_past_ceiling() {
        assert!(critical_zone_alert(5, 5).is_none());
        assert!(critical_zone_alert(6, 5).is_some());
    }

    #[test]
    fn stale_integrator_alert_fires_when_never_run() {
        assert!(stale_integrator_alert("events", None, chrono::Duration::days(1)).is_some());
    }

    #[test]
    fn stale_integrator_alert_silent_when_recent() {
        let recent = Some(Utc::now());
        assert!(stale_integrator_alert("events", recent, chrono::Duration::days(1)).is_none());
    }
}
