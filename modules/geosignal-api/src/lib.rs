pub mod geojson;
pub mod handlers;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub use state::{AppState, SharedState};

/// Builds the Query API / Health-Metrics router (C9, C10). A thin wrapper
/// over the store's read projections (§4.9's "Ambient addition —
/// transport"); compression and request tracing are applied uniformly here
/// rather than per-handler.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/articles", get(handlers::list_articles))
        .route("/articles/{id}", get(handlers::get_article))
        .route("/zones", get(handlers::list_zones))
        .route("/zones.geojson", get(handlers::zones_geojson))
        .route("/aggregate/counts", get(handlers::aggregate_counts))
        .route("/risk/by-country", get(handlers::risk_by_country))
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
