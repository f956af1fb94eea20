use std::env;
use std::time::Duration;

use crate::error::GeoSignalError;

/// Process-wide configuration, loaded once from the environment at startup.
/// Kept as one flat struct rather than a nested settings-file schema — the
/// core does not own config-file parsing (§1), only typed env lookup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub canonical_language: String,

    pub fetcher_workers: usize,
    pub fetcher_qps_per_host: u32,
    pub fetcher_timeout: Duration,
    pub fetcher_max_retries: u32,

    pub enricher_workers: usize,
    pub enricher_timeout: Duration,
    pub enricher_translate_char_cap: usize,

    /// Ordered provider names, e.g. `["self-hosted", "openai", "claude", "openrouter"]`.
    pub translation_provider_chain: Vec<String>,
    pub translation_cache_ttl: Duration,
    pub circuit_breaker_threshold: u32,
    pub circuit_breaker_cooldown: Duration,

    pub events_window_days: i64,
    pub tone_event_min_count: u32,
    pub events_feed_url: String,
    pub tone_feed_url: String,
    pub risk_index_feed_url: String,

    pub consolidation_interval: Duration,
    pub proximity_radius_degrees: f64,
    pub ai_amplification_enabled: bool,
    pub predictions_enabled: bool,
    pub news_risk_threshold: f64,
    pub news_sentiment_threshold: f64,

    pub api_host: String,
    pub api_port: u16,

    pub anthropic_api_key: String,
    pub openai_api_key: String,
    pub openrouter_api_key: String,
    pub geocoder_base_url: String,

    /// Path `reload_sources` (§6) re-reads the source catalog from. Also
    /// the path consulted at startup before falling back to the bundled
    /// default catalog, so an operator-edited file takes effect without a
    /// rebuild.
    pub source_catalog_path: String,
}

impl Config {
    /// Load configuration from environment variables. Returns `ConfigError`
    /// (propagated as `GeoSignalError::Config`) rather than panicking, so the
    /// supervisor can exit with code 1 per §6 instead of unwinding.
    pub fn from_env() -> Result<Self, GeoSignalError> {
        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            canonical_language: env_or("CANONICAL_LANGUAGE", "en"),

            fetcher_workers: env_parsed_or("FETCHER_WORKERS", 8)?,
            fetcher_qps_per_host: env_parsed_or("FETCHER_QPS_PER_HOST", 2)?,
            fetcher_timeout: Duration::from_secs(env_parsed_or("FETCHER_TIMEOUT_SECS", 30)?),
            fetcher_max_retries: env_parsed_or("FETCHER_MAX_RETRIES", 3)?,

            enricher_workers: env_parsed_or("ENRICHER_WORKERS", 4)?,
            enricher_timeout: Duration::from_secs(env_parsed_or("ENRICHER_TIMEOUT_SECS", 60)?),
            enricher_translate_char_cap: env_parsed_or("ENRICHER_TRANSLATE_CHAR_CAP", 4000)?,

            translation_provider_chain: env::var("TRANSLATION_PROVIDER_CHAIN")
                .unwrap_or_else(|_| "self-hosted,openai,claude,openrouter".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            translation_cache_ttl: Duration::from_secs(env_parsed_or("TRANSLATION_CACHE_TTL_SECS", 3600)?),
            circuit_breaker_threshold: env_parsed_or("CIRCUIT_BREAKER_THRESHOLD", 5)?,
            circuit_breaker_cooldown: Duration::from_secs(env_parsed_or("CIRCUIT_BREAKER_COOLDOWN_SECS", 120)?),

            events_window_days: env_parsed_or("EVENTS_WINDOW_DAYS", 7)?,
            tone_event_min_count: env_parsed_or("TONE_EVENT_MIN_COUNT", 3)?,
            events_feed_url: env_or("EVENTS_FEED_URL", "https://api.gdeltproject.org/api/v2/events/export"),
            tone_feed_url: env_or("TONE_FEED_URL", "https://api.gdeltproject.org/api/v2/gkg/export"),
            risk_index_feed_url: env_or(
                "RISK_INDEX_FEED_URL",
                "https://www.matteoiacoviello.com/gpr_files/data_gpr_export.csv",
            ),

            consolidation_interval: Duration::from_secs(env_parsed_or("CONSOLIDATION_INTERVAL_SECS", 1800)?),
            proximity_radius_degrees: env_parsed_or("PROXIMITY_RADIUS_DEGREES", 0.5)?,
            ai_amplification_enabled: env_parsed_or("AI_AMPLIFICATION_ENABLED", true)?,
            predictions_enabled: env_parsed_or("PREDICTIONS_ENABLED", true)?,
            news_risk_threshold: env_parsed_or("NEWS_RISK_THRESHOLD", 0.5)?,
            news_sentiment_threshold: env_parsed_or("NEWS_SENTIMENT_THRESHOLD", -0.3)?,

            api_host: env_or("API_HOST", "0.0.0.0"),
            api_port: env_parsed_or("API_PORT", 8080)?,

            anthropic_api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            geocoder_base_url: env_or("GEOCODER_BASE_URL", "https://nominatim.openstreetmap.org"),

            source_catalog_path: env_or("SOURCE_CATALOG_PATH", "data/sources.json"),
        })
    }

    /// Log non-secret config and the presence (not value) of API keys.
    pub fn log_redacted(&self) {
        tracing::info!(
            canonical_language = %self.canonical_language,
            fetcher_workers = self.fetcher_workers,
            enricher_workers = self.enricher_workers,
            consolidation_interval_secs = self.consolidation_interval.as_secs(),
            "loaded configuration"
        );
        for (name, value) in [
            ("ANTHROPIC_API_KEY", &self.anthropic_api_key),
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("OPENROUTER_API_KEY", &self.openrouter_api_key),
        ] {
            if value.is_empty() {
                tracing::info!("{name} = (empty)");
            } else {
                tracing::info!("{name} = ({} chars)", value.len());
            }
        }
    }
}

fn required_env(key: &str) -> Result<String, GeoSignalError> {
    env::var(key).map_err(|_| GeoSignalError::Config(format!("{key} environment variable is required")))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, GeoSignalError> {
    match env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|_| GeoSignalError::Config(format!("{key} must be a valid value, got {val:?}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parsed_or_falls_back_to_default() {
        env::remove_var("GEOSIGNAL_TEST_UNSET_KEY");
        let value: u32 = env_parsed_or("GEOSIGNAL_TEST_UNSET_KEY", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn env_parsed_or_rejects_garbage() {
        env::set_var("GEOSIGNAL_TEST_GARBAGE_KEY", "not-a-number");
        let result = env_parsed_or::<u32>("GEOSIGNAL_TEST_GARBAGE_KEY", 0);
        assert!(result.is_err());
        env::remove_var("GEOSIGNAL_TEST_GARBAGE_KEY");
    }
}
