use std::sync::Arc;

use async_trait::async_trait;
use geosignal_common::health::SourceFetchHealth;
use geosignal_common::{CancelToken, GeoSignalError, HealthMonitor};
use geosignal_consolidator::Consolidator;
use geosignal_enrich::EnricherPool;
use geosignal_fetch::FetcherPool;
use geosignal_integrators::{EventsIntegrator, RiskIndexIntegrator, ToneIntegrator};
use geosignal_registry::SourceRegistry;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::job::Job;

/// Fetch Job wrapping the Fetcher Pool (C3). Reads the registry through a
/// shared, swappable handle so `reload_sources` (§6) takes effect on the
/// job's very next run without restarting it.
pub struct FetchJob {
    pool: FetcherPool,
    registry: Arc<RwLock<SourceRegistry>>,
    health: HealthMonitor,
    /// When set, restricts this run to sources named here (the control
    /// channel's `run_fetch(source_set?)`, §6); `None` polls every source.
    source_set: Option<Vec<String>>,
}

impl FetchJob {
    pub fn new(pool: FetcherPool, registry: Arc<RwLock<SourceRegistry>>, health: HealthMonitor) -> Self {
        Self { pool, registry, health, source_set: None }
    }

    pub fn for_sources(
        pool: FetcherPool,
        registry: Arc<RwLock<SourceRegistry>>,
        health: HealthMonitor,
        source_set: Vec<String>,
    ) -> Self {
        Self { pool, registry, health, source_set: Some(source_set) }
    }
}

#[async_trait]
impl Job for FetchJob {
    fn name(&self) -> &str {
        "fetch"
    }

    async fn run(&self, stop: CancelToken) -> Result<(), GeoSignalError> {
        let registry = self.registry.read().await;
        let all = registry.all();
        let selected: Vec<_> = match &self.source_set {
            Some(names) => all.iter().filter(|s| names.contains(&s.name)).cloned().collect(),
            None => all.to_vec(),
        };
        drop(registry);

        if selected.is_empty() {
            info!("fetch job: no matching sources, nothing to do");
            return Ok(());
        }

        let stats = self.pool.run_batch(&selected, stop).await;
        info!(inserted = stats.total_inserted(), sources = selected.len(), "fetch job complete");
        let per_source = stats
            .per_source
            .into_iter()
            .map(|s| SourceFetchHealth {
                source_name: s.source_name,
                inserted: s.inserted,
                duplicates: s.duplicates,
                succeeded: s.error.is_none(),
                last_error: s.error,
            })
            .collect();
        self.health.record_fetch(per_source).await;
        Ok(())
    }
}

/// Enrich Job wrapping the Enricher Pool (C5). "Enrich continuously" (§4.8)
/// is realized by scheduling this job on a short interval rather than
/// looping internally — each tick claims and drains one batch.
pub struct EnrichJob {
    pool: EnricherPool,
    health: HealthMonitor,
}

impl EnrichJob {
    pub fn new(pool: EnricherPool, health: HealthMonitor) -> Self {
        Self { pool, health }
    }
}

#[async_trait]
impl Job for EnrichJob {
    fn name(&self) -> &str {
        "enrich"
    }

    async fn run(&self, stop: CancelToken) -> Result<(), GeoSignalError> {
        let stats = self.pool.run_batch(stop).await;
        info!(claimed = stats.claimed, enriched = stats.enriched, failed = stats.failed, "enrich job complete");
        self.health.record_enrich(stats.claimed, stats.enriched, stats.failed).await;
        Ok(())
    }
}

#[async_trait]
impl Job for EventsIntegrator {
    fn name(&self) -> &str {
        "integrator.events"
    }

    async fn run(&self, _stop: CancelToken) -> Result<(), GeoSignalError> {
        EventsIntegrator::run(self).await.map_err(Into::into)
    }
}

#[async_trait]
impl Job for ToneIntegrator {
    fn name(&self) -> &str {
        "integrator.tone"
    }

    async fn run(&self, _stop: CancelToken) -> Result<(), GeoSignalError> {
        ToneIntegrator::run(self).await.map_err(Into::into)
    }
}

#[async_trait]
impl Job for RiskIndexIntegrator {
    fn name(&self) -> &str {
        "integrator.risk_index"
    }

    async fn run(&self, _stop: CancelToken) -> Result<(), GeoSignalError> {
        RiskIndexIntegrator::run(self).await.map_err(Into::into)
    }
}

/// Consolidate Job wrapping the Conflict Zone Consolidator (C7). Never
/// overlaps itself (§5) — enforced by the scheduler's job-level mutex, not
/// by this wrapper.
pub struct ConsolidateJob {
    consolidator: Consolidator,
    health: HealthMonitor,
}

impl ConsolidateJob {
    pub fn new(consolidator: Consolidator, health: HealthMonitor) -> Self {
        Self { consolidator, health }
    }
}

#[async_trait]
impl Job for ConsolidateJob {
    fn name(&self) -> &str {
        "consolidate"
    }

    async fn run(&self, _stop: CancelToken) -> Result<(), GeoSignalError> {
        let started = std::time::Instant::now();
        match self.consolidator.run().await {
            Ok(stats) => {
                info!(%stats, "consolidate job complete");
                self.health.record_consolidate(started.elapsed().as_millis() as u64, stats.zones_published).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "consolidate job failed");
                Err(e.into())
            }
        }
    }
}
