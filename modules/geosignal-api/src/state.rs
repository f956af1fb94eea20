use std::sync::Arc;

use geosignal_common::HealthMonitor;
use geosignal_store::ArticleStore;
use geosignal_translate::TranslationGateway;

/// Shared application state for the Query API / Health-Metrics router
/// (C9, C10). Holds only read handles — the API never writes to the store
/// except through the control channel wired up by the supervisor binary.
#[derive(Clone)]
pub struct AppState {
    pub store: ArticleStore,
    pub health: HealthMonitor,
    /// `None` when no translation providers are configured (canonical
    /// language only, nothing to translate) — `/metrics` then reports an
    /// empty provider list rather than failing.
    pub translation: Option<Arc<TranslationGateway>>,
    /// Provider names in chain order, for iterating breaker state without
    /// the gateway exposing its internal chain.
    pub translation_provider_names: Vec<String>,
    pub critical_zone_alert_ceiling: i64,
}

pub type SharedState = Arc<AppState>;
