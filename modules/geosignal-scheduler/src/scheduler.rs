use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geosignal_common::CancelToken;
use geosignal_registry::SourceRegistry;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{info, warn};

use crate::command::Command;
use crate::job::Job;
use crate::schedule::Schedule;

/// The shared registry handle plus the on-disk catalog `reload_sources`
/// (§6, SPEC_FULL §4.2) re-reads from. Kept separate from `ScheduledJob`
/// since reloading the catalog isn't itself a schedulable job.
struct SourceReloadHandle {
    registry: Arc<RwLock<SourceRegistry>>,
    catalog_path: PathBuf,
}

/// One job under scheduler management: its trigger rule, a mutex enforcing
/// at-most-one running instance (§4.8), and the watermark used to decide
/// whether it's due.
struct ScheduledJob {
    job: Arc<dyn Job>,
    schedule: Schedule,
    lock: Arc<Mutex<()>>,
    last_run: Arc<RwLock<Option<DateTime<Utc>>>>,
}

/// The Scheduler (C8): ticks a fixed-size set of jobs against their
/// schedules, enforcing "jobs missing their window skip rather than pile
/// up" via `try_lock` — a busy job is simply skipped this tick, never
/// queued. Also drains an internal control channel (§6) for on-demand
/// triggers and shutdown.
pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
    tick_interval: Duration,
    shutdown_grace: Duration,
    source_reload: Option<SourceReloadHandle>,
}

impl Scheduler {
    pub fn new(tick_interval: Duration, shutdown_grace: Duration) -> Self {
        Self { jobs: Vec::new(), tick_interval, shutdown_grace, source_reload: None }
    }

    pub fn register(&mut self, job: Arc<dyn Job>, schedule: Schedule) {
        self.jobs.push(ScheduledJob {
            job,
            schedule,
            lock: Arc::new(Mutex::new(())),
            last_run: Arc::new(RwLock::new(None)),
        });
    }

    /// Gives the scheduler what `Command::ReloadSources` needs: the same
    /// `Arc<RwLock<SourceRegistry>>` handle `FetchJob` reads, and the path
    /// to re-parse it from. Without this call, a reload request is logged
    /// and dropped (no catalog source to reload from).
    pub fn set_source_reload(&mut self, registry: Arc<RwLock<SourceRegistry>>, catalog_path: impl Into<PathBuf>) {
        self.source_reload = Some(SourceReloadHandle { registry, catalog_path: catalog_path.into() });
    }

    /// Runs the scheduling loop until `stop` is cancelled or a
    /// `Command::Shutdown` arrives on `control`. On exit, waits up to
    /// `shutdown_grace` for any in-flight job runs to finish (§4.8).
    pub async fn run(self, stop: CancelToken, mut control: mpsc::Receiver<Command>) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        let mut in_flight: Vec<tokio::task::JoinHandle<()>> = Vec::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if stop.is_cancelled() {
                        break;
                    }
                    let now = Utc::now();
                    for scheduled in &self.jobs {
                        let due = scheduled.schedule.is_due(*scheduled.last_run.read().await, now);
                        if due {
                            if let Some(handle) = self.try_spawn(scheduled, stop.clone()) {
                                in_flight.push(handle);
                            }
                        }
                    }
                    in_flight.retain(|h| !h.is_finished());
                }
                cmd = control.recv() => {
                    match cmd {
                        Some(Command::Shutdown) | None => break,
                        Some(other) => self.dispatch(other, &stop, &mut in_flight).await,
                    }
                }
            }
        }

        stop.cancel();
        info!(in_flight = in_flight.len(), "scheduler stopping, draining in-flight jobs");
        let deadline = tokio::time::Instant::now() + self.shutdown_grace;
        for handle in in_flight {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if tokio::time::timeout(remaining, handle).await.is_err() {
                warn!("job did not finish within the shutdown grace window");
            }
        }
    }

    /// Tries to acquire a job's mutex and, on success, spawns it and stamps
    /// its watermark immediately (so a slow run doesn't make the next tick
    /// re-trigger it). Returns `None` if the job was already running.
    fn try_spawn(&self, scheduled: &ScheduledJob, stop: CancelToken) -> Option<tokio::task::JoinHandle<()>> {
        let lock = scheduled.lock.clone();
        let guard = match lock.try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                info!(job = scheduled.job.name(), "job still running, skipping this window");
                return None;
            }
        };

        let job = scheduled.job.clone();
        let last_run = scheduled.last_run.clone();
        let now = Utc::now();

        Some(tokio::spawn(async move {
            *last_run.write().await = Some(now);
            let name = job.name().to_string();
            match job.run(stop).await {
                Ok(()) => info!(job = %name, "job run succeeded"),
                Err(e) => warn!(job = %name, error = %e, "job run failed"),
            }
            drop(guard);
        }))
    }

    async fn dispatch(&self, cmd: Command, stop: &CancelToken, in_flight: &mut Vec<tokio::task::JoinHandle<()>>) {
        if matches!(cmd, Command::ReloadSources) {
            self.reload_sources().await;
            return;
        }

        let target_name = match &cmd {
            Command::RunFetch(_) => "fetch",
            Command::RunEnrich => "enrich",
            Command::RunIntegrator(name) => name.as_str(),
            Command::RunConsolidate => "consolidate",
            Command::ReloadSources => unreachable!("handled above"),
            Command::Shutdown => return,
        };

        match self.jobs.iter().find(|j| j.job.name() == target_name) {
            Some(scheduled) => {
                if let Some(handle) = self.try_spawn(scheduled, stop.clone()) {
                    in_flight.push(handle);
                }
            }
            None => warn!(job = target_name, "control command named an unregistered job"),
        }
    }

    /// Re-parses the catalog file and atomically swaps it into the shared
    /// registry handle (§4.2: "disabling a source removes it from all
    /// projections" — a full rebuild, not an in-place edit, keeps that
    /// invariant trivially true on every reload). On any failure the
    /// previous registry is left in place; a bad file never leaves the
    /// fetch job without sources.
    async fn reload_sources(&self) {
        let Some(handle) = &self.source_reload else {
            warn!("reload_sources requested but no catalog path/registry handle was configured");
            return;
        };

        let contents = match tokio::fs::read_to_string(&handle.catalog_path).await {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %handle.catalog_path.display(), error = %e, "reload_sources: could not read catalog file, keeping previous registry");
                return;
            }
        };

        let sources = match geosignal_registry::parse_catalog(&contents) {
            Ok(sources) => sources,
            Err(e) => {
                warn!(error = %e, "reload_sources: catalog failed to parse, keeping previous registry");
                return;
            }
        };

        match SourceRegistry::new(sources) {
            Ok(registry) => {
                let count = registry.len();
                *handle.registry.write().await = registry;
                info!(sources = count, path = %handle.catalog_path.display(), "source registry reloaded");
            }
            Err(e) => warn!(error = %e, "reload_sources: catalog failed validation, keeping previous registry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use geosignal_common::GeoSignalError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        runs: Arc<AtomicUsize>,
        hold_millis: u64,
    }

    #[async_trait]
    impl Job for CountingJob {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self, _stop: CancelToken) -> Result<(), GeoSignalError> {
            tokio::time::sleep(Duration::from_millis(self.hold_millis)).await;
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn busy_job_is_skipped_not_queued() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new(Duration::from_millis(10), Duration::from_secs(1));
        scheduler.register(
            Arc::new(CountingJob { runs: runs.clone(), hold_millis: 200 }),
            Schedule::Interval(Duration::from_millis(1)),
        );

        let scheduled = &scheduler.jobs[0];
        let stop = CancelToken::new();

        let first = scheduler.try_spawn(scheduled, stop.clone());
        assert!(first.is_some());
        let second = scheduler.try_spawn(scheduled, stop.clone());
        assert!(second.is_none(), "second attempt should be skipped while the first is in flight");

        first.unwrap().await.unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    fn unique_temp_path(name: &str) -> PathBuf {
        let pid = std::process::id();
        let addr = name.as_ptr() as usize;
        std::env::temp_dir().join(format!("geosignal-reload-test-{pid}-{addr}.json"))
    }

    #[tokio::test]
    async fn reload_sources_swaps_in_the_newly_parsed_catalog() {
        let path = unique_temp_path("reload_sources_swaps_in_the_newly_parsed_catalog");
        let catalog = r#"[
            {"name":"Wire A","feed_url":"https://a.example/feed","protocol":"rss","language":"en","country":"US","region":"North America","priority":"standard"},
            {"name":"Wire B","feed_url":"https://b.example/feed","protocol":"rss","language":"en","country":"US","region":"North America","priority":"standard"}
        ]"#;
        tokio::fs::write(&path, catalog).await.unwrap();

        let registry = Arc::new(RwLock::new(SourceRegistry::new(Vec::new()).unwrap()));
        let mut scheduler = Scheduler::new(Duration::from_millis(10), Duration::from_secs(1));
        scheduler.set_source_reload(registry.clone(), path.clone());

        scheduler.reload_sources().await;

        assert_eq!(registry.read().await.len(), 2);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn reload_sources_without_a_handle_is_a_logged_noop() {
        let scheduler = Scheduler::new(Duration::from_millis(10), Duration::from_secs(1));
        // Must not panic: the absence of a configured reload handle is the
        // documented no-op path, not an error.
        scheduler.reload_sources().await;
    }

    #[tokio::test]
    async fn reload_sources_keeps_previous_registry_on_malformed_catalog() {
        let path = unique_temp_path("reload_sources_keeps_previous_registry_on_malformed_catalog");
        tokio::fs::write(&path, "not valid json").await.unwrap();

        let sources = vec![geosignal_common::Source {
            name: "Existing".to_string(),
            feed_url: "https://existing.example/feed".to_string(),
            protocol: geosignal_common::Protocol::Rss,
            language: "en".to_string(),
            country: "US".to_string(),
            region: "North America".to_string(),
            priority: geosignal_common::Priority::Standard,
            conflict_zone_tag: None,
            enabled: true,
        }];
        let registry = Arc::new(RwLock::new(SourceRegistry::new(sources).unwrap()));
        let mut scheduler = Scheduler::new(Duration::from_millis(10), Duration::from_secs(1));
        scheduler.set_source_reload(registry.clone(), path.clone());

        scheduler.reload_sources().await;

        assert_eq!(registry.read().await.len(), 1, "malformed catalog must not clear the existing registry");
        let _ = tokio::fs::remove_file(&path).await;
    }
}
