use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use chrono::Utc;
use geosignal_common::RiskLevel;
use geosignal_store::{ArticleFilter, AggregateBy, ZoneFilter};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::geojson::zones_to_geojson;
use crate::state::SharedState;

fn parse_risk_level(s: &str) -> Option<RiskLevel> {
    s.parse().ok()
}

// --- /articles ---

#[derive(Deserialize)]
pub struct ArticlesQuery {
    language: Option<String>,
    country: Option<String>,
    risk_level: Option<String>,
    since: Option<chrono::DateTime<Utc>>,
    until: Option<chrono::DateTime<Utc>>,
    limit: Option<i64>,
}

/// `GET /articles` — `list_articles(filter)` (§4.9).
pub async fn list_articles(State(state): State<SharedState>, Query(params): Query<ArticlesQuery>) -> impl IntoResponse {
    let filter = ArticleFilter {
        language: params.language,
        country: params.country,
        risk_level: params.risk_level.as_deref().and_then(parse_risk_level),
        since: params.since,
        until: params.until,
        limit: Some(params.limit.unwrap_or(50).min(500)),
    };

    match state.store.query_articles(&filter).await {
        Ok(articles) => Json(serde_json::json!({ "articles": articles })).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to list articles");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /articles/:id` — `get_article(id)` (§4.9).
pub async fn get_article(State(state): State<SharedState>, Path(id): Path<String>) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state.store.get_article(uuid).await {
        Ok(Some(article)) => Json(serde_json::json!({ "article": article })).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!(error = %e, "failed to load article");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// --- /zones ---

#[derive(Deserialize)]
pub struct ZonesQuery {
    risk_level: Option<String>,
    since: Option<chrono::DateTime<Utc>>,
    priority: Option<String>,
    limit: Option<i64>,
}

/// `GET /zones` — `list_zones(filter)` (§4.9).
pub async fn list_zones(State(state): State<SharedState>, Query(params): Query<ZonesQuery>) -> impl IntoResponse {
    let filter = ZoneFilter {
        risk_level: params.risk_level.as_deref().and_then(parse_risk_level),
        since: params.since,
        priority: params.priority.as_deref().and_then(parse_risk_level),
        limit: Some(params.limit.unwrap_or(50).min(500)),
    };

    match state.store.query_zones(&filter).await {
        Ok(zones) => Json(serde_json::json!({ "zones": zones })).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to list zones");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /zones.geojson` (§6). Cold start (no consolidator run has ever
/// published a zone collection) is reported as `metadata.status =
/// "warming_up"` per §7, distinguished from a legitimate empty pass via the
/// health snapshot's `last_consolidate_at`.
pub async fn zones_geojson(State(state): State<SharedState>) -> impl IntoResponse {
    let filter = ZoneFilter::default();
    match state.store.query_zones(&filter).await {
        Ok(zones) => {
            let has_run_ever = state.health.snapshot().await.last_consolidate_at.is_some();
            Json(zones_to_geojson(&zones, has_run_ever)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "failed to build zones.geojson");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// --- /aggregate/counts, /risk/by-country ---

#[derive(Deserialize)]
pub struct AggregateQuery {
    by: String,
    window_days: Option<i64>,
}

/// `GET /aggregate/counts` — `aggregate_counts(by, window)` (§4.9).
pub async fn aggregate_counts(State(state): State<SharedState>, Query(params): Query<AggregateQuery>) -> impl IntoResponse {
    let by = match params.by.as_str() {
        "country" => AggregateBy::Country,
        "category" => AggregateBy::Category,
        "language" => AggregateBy::Language,
        other => {
            warn!(by = other, "aggregate_counts: unknown grouping dimension");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    let since = Utc::now() - chrono::Duration::days(params.window_days.unwrap_or(7));

    match state.store.aggregate_counts(by, since).await {
        Ok(counts) => Json(serde_json::json!({ "counts": counts })).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to aggregate counts");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct RiskByCountryQuery {
    window_days: Option<i64>,
}

/// `GET /risk/by-country` — `get_risk_by_country(window)` (§4.9).
pub async fn risk_by_country(State(state): State<SharedState>, Query(params): Query<RiskByCountryQuery>) -> impl IntoResponse {
    let since = Utc::now() - chrono::Duration::days(params.window_days.unwrap_or(7));
    match state.store.risk_by_country(since).await {
        Ok(scores) => Json(serde_json::json!({ "risk_by_country": scores })).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to compute risk by country");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// --- /metrics, /health ---

/// `GET /metrics` (§4.10): queue depth, per-source fetch success, per-provider
/// translation circuit state, integrator last-success timestamps,
/// consolidator last-run duration/zone count.
pub async fn metrics(State(state): State<SharedState>) -> impl IntoResponse {
    let queue_depth = match state.store.raw_queue_depth().await {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "failed to read raw queue depth");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let zone_counts = state.store.zone_count_by_risk_level().await.unwrap_or_default();
    let feed_runs = state.store.latest_feed_runs().await.unwrap_or_default();
    let snapshot = state.health.snapshot().await;

    let translation_providers: Vec<serde_json::Value> = match &state.translation {
        Some(gateway) => state
            .translation_provider_names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "provider": name,
                    "circuit_open": gateway.is_provider_open(name),
                    "consecutive_failures": gateway.provider_failure_count(name),
                })
            })
            .collect(),
        None => Vec::new(),
    };

    Json(serde_json::json!({
        "raw_queue_depth": queue_depth,
        "zone_counts_by_risk_level": zone_counts,
        "fetch": {
            "last_run_at": snapshot.last_fetch_at,
            "per_source": snapshot.last_fetch_sources,
        },
        "enrich": {
            "last_run_at": snapshot.last_enrich_at,
            "claimed": snapshot.last_enrich_claimed,
            "enriched": snapshot.last_enrich_enriched,
            "failed": snapshot.last_enrich_failed,
        },
        "consolidate": {
            "last_run_at": snapshot.last_consolidate_at,
            "duration_ms": snapshot.last_consolidate_duration_ms,
            "zones_published": snapshot.last_consolidate_zones,
        },
        "translation_providers": translation_providers,
        "integrators": feed_runs,
    }))
    .into_response()
}

/// `GET /health` (§4.10 supplement): liveness plus any active alerts raised
/// by the threshold checks (critical zone ceiling, stale integrator).
pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    let snapshot = state.health.snapshot().await;
    let status = if snapshot.alerts.iter().any(|a| a.severity == RiskLevel::Critical) {
        "degraded"
    } else {
        "ok"
    };
    Json(serde_json::json!({
        "status": status,
        "alerts": snapshot.alerts,
    }))
    .into_response()
}
