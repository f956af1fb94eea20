use chrono::NaiveDate;
use geosignal_common::RiskIndexPoint;
use geosignal_store::ArticleStore;
use serde::Deserialize;

use crate::error::IntegratorError;
use crate::log::run_logged;

#[derive(Debug, Deserialize)]
struct RiskIndexCsvRow {
    date: NaiveDate,
    gpr: f64,
    gpr_threats: f64,
    gpr_acts: f64,
}

pub fn parse_risk_index_csv(bytes: &[u8]) -> Result<Vec<RiskIndexPoint>, IntegratorError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut points = Vec::new();
    for result in reader.deserialize::<RiskIndexCsvRow>() {
        let row = result.map_err(|e| IntegratorError::Schema(e.to_string()))?;
        points.push(RiskIndexPoint {
            date: row.date,
            gpr_value: row.gpr,
            gpr_threats: row.gpr_threats,
            gpr_acts: row.gpr_acts,
        });
    }
    Ok(points)
}

/// RiskIndexIntegrator (§4.6): fetches the complete historical CSV and
/// replaces the `risk_index` table atomically — unlike the other two
/// integrators this one ships the full series, not a delta, so a monthly
/// refresh can only make the table more current, never merge against stale
/// rows.
pub struct RiskIndexIntegrator {
    http: reqwest::Client,
    feed_url: String,
    store: ArticleStore,
}

impl RiskIndexIntegrator {
    pub fn new(feed_url: impl Into<String>, store: ArticleStore) -> Self {
        Self { http: reqwest::Client::new(), feed_url: feed_url.into(), store }
    }

    pub async fn run(&self) -> Result<(), IntegratorError> {
        run_logged(&self.store, "risk_index_integrator", || async {
            let response = self
                .http
                .get(&self.feed_url)
                .send()
                .await
                .map_err(|e| IntegratorError::Fetch(e.to_string()))?;

            if !response.status().is_success() {
                return Err(IntegratorError::Fetch(format!("http {}", response.status().as_u16())));
            }

            let bytes = response.bytes().await.map_err(|e| IntegratorError::Fetch(e.to_string()))?;
            let points = parse_risk_index_csv(&bytes)?;
            let count = points.len() as i64;

            self.store.replace_risk_index(&points).await?;

            Ok(count)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "date,gpr,gpr_threats,gpr_acts\n2026-01-01,112.4,98.2,126.1\n2026-02-01,140.9,130.0,151.8\n";

    #[test]
    fn parses_the_full_historical_series() {
        let points = parse_risk_index_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].gpr_value, 140.9);
    }

    #[test]
    fn malformed_csv_surfaces_a_schema_error() {
        let bad = "date,gpr\nnot-a-date,abc\n";
        let result = parse_risk_index_csv(bad.as_bytes());
        assert!(matches!(result, Err(IntegratorError::Schema(_))));
    }
}
