use std::future::Future;

use chrono::Utc;
use geosignal_common::{FeedRunStatus, FeedUpdateLog};
use geosignal_store::ArticleStore;
use uuid::Uuid;

use crate::error::IntegratorError;

/// Brackets an integrator run with a single `FeedUpdateLog` entry (§4.6's
/// shared contract across all three integrators). `work` returns the number
/// of records ingested on success; its error is logged and returned to the
/// caller, but the log entry itself is always written so a failed run is
/// visible to the health monitor.
pub async fn run_logged<F, Fut>(store: &ArticleStore, integrator_name: &str, work: F) -> Result<(), IntegratorError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<i64, IntegratorError>>,
{
    let started_at = Utc::now();
    let result = work().await;
    let ended_at = Utc::now();

    let log = match &result {
        Ok(count) => FeedUpdateLog {
            id: Uuid::new_v4(),
            integrator_name: integrator_name.to_string(),
            started_at,
            ended_at: Some(ended_at),
            records_ingested: *count,
            status: FeedRunStatus::Ok,
            error_message: None,
            data_date_range_start: None,
            data_date_range_end: None,
        },
        Err(e) => FeedUpdateLog {
            id: Uuid::new_v4(),
            integrator_name: integrator_name.to_string(),
            started_at,
            ended_at: Some(ended_at),
            records_ingested: 0,
            status: FeedRunStatus::Error,
            error_message: Some(e.to_string()),
            data_date_range_start: None,
            data_date_range_end: None,
        },
    };

    if let Err(e) = store.log_feed_run(&log).await {
        tracing::warn!(integrator = integrator_name, error = %e, "failed to write feed update log");
    }

    result.map(|_| ())
}
