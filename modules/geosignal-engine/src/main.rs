use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, RwLock};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::{Claude, OpenAi, OpenRouter, TextProvider};
use geosignal_api::AppState;
use geosignal_common::{CancelToken, Config, HealthMonitor};
use geosignal_consolidator::{Consolidator, ConsolidatorConfig};
use geosignal_enrich::{EnricherConfig, EnricherPool, HttpGeocoder, NerExtractor};
use geosignal_fetch::{FetcherConfig, FetcherPool};
use geosignal_integrators::{EventsIntegrator, RiskIndexIntegrator, ToneIntegrator};
use geosignal_registry::SourceRegistry;
use geosignal_scheduler::jobs::{ConsolidateJob, EnrichJob, FetchJob};
use geosignal_scheduler::{Command, Schedule, Scheduler};
use geosignal_store::ArticleStore;
use geosignal_translate::{HttpTranslationProvider, LlmTranslationProvider, TranslationGateway, TranslationProvider};

const SOURCE_CATALOG: &str = include_str!("../data/sources.json");

/// Builds one named translation provider from the configured chain (§4.4).
/// `"self-hosted"` is a plain HTTP machine-translation endpoint (the
/// geocoder/translation sidecar an operator points at); the LLM-backed
/// names wrap whichever `ai-client` provider the matching API key permits.
fn build_provider(name: &str, config: &Config) -> Option<Arc<dyn TranslationProvider>> {
    match name {
        "self-hosted" => Some(Arc::new(HttpTranslationProvider::new(
            "self-hosted",
            config.geocoder_base_url.clone(),
            config.fetcher_timeout,
        ))),
        "openai" if !config.openai_api_key.is_empty() => {
            let client: Arc<dyn TextProvider> = Arc::new(OpenAi::new(config.openai_api_key.clone(), "gpt-4o-mini"));
            Some(Arc::new(LlmTranslationProvider::new("openai", client)))
        }
        "claude" if !config.anthropic_api_key.is_empty() => {
            let client: Arc<dyn TextProvider> = Arc::new(Claude::new(config.anthropic_api_key.clone(), "claude-3-5-sonnet-20241022"));
            Some(Arc::new(LlmTranslationProvider::new("claude", client)))
        }
        "openrouter" if !config.openrouter_api_key.is_empty() => {
            let client: Arc<dyn TextProvider> = Arc::new(OpenRouter::new(config.openrouter_api_key.clone(), "anthropic/claude-3.5-sonnet"));
            Some(Arc::new(LlmTranslationProvider::new("openrouter", client)))
        }
        other => {
            tracing::warn!(provider = other, "translation provider chain names an unconfigured provider, skipping");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("geosignal=info".parse()?))
        .init();

    info!("GeoSignal engine starting...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(e.exit_code());
        }
    };
    config.log_redacted();

    let store = match ArticleStore::connect(&config.database_url).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "could not connect to the article store");
            std::process::exit(2);
        }
    };
    if let Err(e) = store.migrate().await {
        tracing::error!(error = %e, "schema migration failed");
        std::process::exit(3);
    }

    let catalog_json = match tokio::fs::read_to_string(&config.source_catalog_path).await {
        Ok(contents) => contents,
        Err(_) => {
            info!(path = %config.source_catalog_path, "no catalog file on disk yet, starting from the bundled default");
            SOURCE_CATALOG.to_string()
        }
    };
    let sources = geosignal_registry::parse_catalog(&catalog_json)?;
    let registry = Arc::new(RwLock::new(SourceRegistry::new(sources)?));
    info!(sources = registry.read().await.len(), "source registry loaded");

    let health = HealthMonitor::new();

    // --- Translation Gateway (C4) ---
    let chain: Vec<(String, Arc<dyn TranslationProvider>)> = config
        .translation_provider_chain
        .iter()
        .filter_map(|name| build_provider(name, &config).map(|p| (name.clone(), p)))
        .collect();
    let translation_names: Vec<String> = chain.iter().map(|(name, _)| name.clone()).collect();
    let translation = if chain.is_empty() {
        None
    } else {
        Some(Arc::new(TranslationGateway::new(
            chain,
            config.circuit_breaker_threshold,
            config.circuit_breaker_cooldown,
            config.translation_cache_ttl,
            config.enricher_timeout,
        )))
    };

    // --- NLP Enricher (C5) ---
    let ner_client: Arc<dyn TextProvider> = if !config.anthropic_api_key.is_empty() {
        Arc::new(Claude::new(config.anthropic_api_key.clone(), "claude-3-5-sonnet-20241022"))
    } else {
        Arc::new(OpenAi::new(config.openai_api_key.clone(), "gpt-4o-mini"))
    };
    let ner = Arc::new(NerExtractor::new(ner_client.clone()));
    let geocoder = Arc::new(HttpGeocoder::new(config.geocoder_base_url.clone(), config.fetcher_timeout));

    let enrich_gateway = translation.clone().unwrap_or_else(|| {
        Arc::new(TranslationGateway::new(
            Vec::new(),
            config.circuit_breaker_threshold,
            config.circuit_breaker_cooldown,
            config.translation_cache_ttl,
            config.enricher_timeout,
        ))
    });

    let enricher_pool = EnricherPool::new(
        EnricherConfig {
            workers: config.enricher_workers,
            batch_size: 20,
            per_article_timeout: config.enricher_timeout,
            translate_char_cap: config.enricher_translate_char_cap,
            canonical_language: config.canonical_language.clone(),
            max_retries: 2,
            shutdown_grace: Duration::from_secs(10),
        },
        store.clone(),
        enrich_gateway,
        ner,
        geocoder,
    );

    // --- Fetcher Pool (C3) ---
    let fetcher_pool = FetcherPool::new(
        FetcherConfig {
            workers: config.fetcher_workers,
            qps_per_host: config.fetcher_qps_per_host,
            timeout: config.fetcher_timeout,
            retry: geosignal_fetch::retry::RetryPolicy { max_attempts: config.fetcher_max_retries, ..Default::default() },
            shutdown_grace: Duration::from_secs(10),
        },
        store.clone(),
    );

    // --- External Feed Integrators (C6) ---
    let events_integrator = EventsIntegrator::new(config.events_feed_url.clone(), store.clone(), config.events_window_days);
    let tone_integrator = ToneIntegrator::new(config.tone_feed_url.clone(), store.clone());
    let risk_index_integrator = RiskIndexIntegrator::new(config.risk_index_feed_url.clone(), store.clone());

    // --- Conflict Zone Consolidator (C7) ---
    let amplification_client: Option<Arc<dyn TextProvider>> = if config.ai_amplification_enabled {
        Some(ner_client.clone())
    } else {
        None
    };
    let consolidator = Consolidator::new(
        ConsolidatorConfig {
            lookback_days: config.events_window_days,
            proximity_radius_degrees: config.proximity_radius_degrees,
            news_risk_threshold: config.news_risk_threshold as f32,
            news_sentiment_threshold: config.news_sentiment_threshold as f32,
            tone_min_event_count: config.tone_event_min_count,
            ai_amplification_enabled: config.ai_amplification_enabled,
            predictions_enabled: config.predictions_enabled,
            ..Default::default()
        },
        store.clone(),
        amplification_client,
    );

    // --- Scheduler (C8) ---
    let mut scheduler = Scheduler::new(Duration::from_secs(5), Duration::from_secs(15));
    scheduler.register(
        Arc::new(FetchJob::new(fetcher_pool, registry.clone(), health.clone())),
        Schedule::Interval(Duration::from_secs(15 * 60)),
    );
    scheduler.register(Arc::new(EnrichJob::new(enricher_pool, health.clone())), Schedule::Interval(Duration::from_secs(30)));
    scheduler.register(Arc::new(events_integrator), Schedule::DailyAt { hour: 2, minute: 0 });
    scheduler.register(Arc::new(tone_integrator), Schedule::DailyAt { hour: 2, minute: 30 });
    scheduler.register(Arc::new(risk_index_integrator), Schedule::MonthlyOn { day: 1, hour: 3, minute: 0 });
    scheduler.register(Arc::new(ConsolidateJob::new(consolidator, health.clone())), Schedule::Interval(config.consolidation_interval));
    scheduler.set_source_reload(registry.clone(), config.source_catalog_path.clone());

    let stop = CancelToken::new();
    let (control_tx, control_rx) = mpsc::channel::<Command>(32);
    let scheduler_stop = stop.clone();
    let scheduler_handle = tokio::spawn(scheduler.run(scheduler_stop, control_rx));

    // --- Query API / Health-Metrics (C9, C10) ---
    let app_state = Arc::new(AppState {
        store: store.clone(),
        health: health.clone(),
        translation,
        translation_provider_names: translation_names,
        critical_zone_alert_ceiling: 25,
    });
    let router = geosignal_api::router(app_state);
    let listener = tokio::net::TcpListener::bind((config.api_host.as_str(), config.api_port)).await?;
    info!(host = %config.api_host, port = config.api_port, "query API listening");

    if let Err(e) = axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await {
        tracing::error!(error = %e, "query API server exited with an error");
    }

    info!("shutdown requested, draining scheduler");
    stop.cancel();
    let _ = control_tx.send(Command::Shutdown).await;
    let _ = scheduler_handle.await;

    info!("GeoSignal engine stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
