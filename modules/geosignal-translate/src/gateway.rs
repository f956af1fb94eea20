use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::TranslationCache;
use crate::circuit_breaker::CircuitBreaker;
use crate::error::TranslateError;
use crate::provider::TranslationProvider;

/// Successful translation result. `provider` records which link in the
/// chain actually answered, for per-provider success metrics (§4.10).
#[derive(Debug, Clone)]
pub struct TranslatedText {
    pub text: String,
    pub provider: String,
    pub cached: bool,
}

/// The Translation Gateway (C4): tries providers in a fixed order, skipping
/// any whose circuit breaker is open, and returns the first non-empty
/// result within its timeout (§4.4). Pure function of `(text, src, dst)`
/// modulo caching, so repeated calls within the cache TTL never hit a
/// provider at all.
pub struct TranslationGateway {
    chain: Vec<(String, Arc<dyn TranslationProvider>)>,
    breakers: HashMap<String, CircuitBreaker>,
    cache: TranslationCache,
    per_provider_timeout: Duration,
}

impl TranslationGateway {
    pub fn new(
        chain: Vec<(String, Arc<dyn TranslationProvider>)>,
        circuit_breaker_threshold: u32,
        circuit_breaker_cooldown: Duration,
        cache_ttl: Duration,
        per_provider_timeout: Duration,
    ) -> Self {
        let breakers = chain
            .iter()
            .map(|(name, _)| (name.clone(), CircuitBreaker::new(circuit_breaker_threshold, circuit_breaker_cooldown)))
            .collect();
        Self { chain, breakers, cache: TranslationCache::new(cache_ttl), per_provider_timeout }
    }

    /// `translate(text, src_lang, dst_lang) → TranslatedText | AllProvidersFailed` (§4.4).
    pub async fn translate(
        &self,
        text: &str,
        src_lang: &str,
        dst_lang: &str,
    ) -> Result<TranslatedText, TranslateError> {
        if src_lang == dst_lang {
            return Ok(TranslatedText { text: text.to_string(), provider: "identity".to_string(), cached: false });
        }

        if let Some(cached) = self.cache.get(text, src_lang, dst_lang) {
            return Ok(TranslatedText { text: cached, provider: "cache".to_string(), cached: true });
        }

        for (name, provider) in &self.chain {
            let breaker = self.breakers.get(name).expect("breaker exists for every chain entry");
            if breaker.is_open() {
                continue;
            }

            let attempt = tokio::time::timeout(self.per_provider_timeout, provider.translate(text, src_lang, dst_lang)).await;
            match attempt {
                Ok(Ok(translated)) if !translated.trim().is_empty() => {
                    breaker.record_success();
                    self.cache.put(text, src_lang, dst_lang, translated.clone());
                    return Ok(TranslatedText { text: translated, provider: name.clone(), cached: false });
                }
                Ok(Ok(_empty)) => {
                    breaker.record_failure();
                    warn!(provider = %name, "translation provider returned an empty result");
                }
                Ok(Err(e)) => {
                    breaker.record_failure();
                    warn!(provider = %name, error = %e, "translation provider failed");
                }
                Err(_elapsed) => {
                    breaker.record_failure();
                    warn!(provider = %name, "translation provider timed out");
                }
            }
        }

        info!(src_lang, dst_lang, "all translation providers failed or were skipped");
        Err(TranslateError::AllProvidersFailed)
    }

    /// Whether `name` is currently being skipped by its circuit breaker.
    pub fn is_provider_open(&self, name: &str) -> bool {
        self.breakers.get(name).map(CircuitBreaker::is_open).unwrap_or(false)
    }

    pub fn provider_failure_count(&self, name: &str) -> u32 {
        self.breakers.get(name).map(CircuitBreaker::consecutive_failures).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyProvider {
        name: &'static str,
        calls: AtomicUsize,
        fail_first_n: usize,
    }

    #[async_trait]
    impl TranslationProvider for FlakyProvider {
        fn name(&self) -> &str {
            self.name
        }
        async fn translate(&self, text: &str, _src: &str, _dst: &str) -> Result<String, TranslateError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first_n {
                Err(TranslateError::Provider { provider: self.name.to_string(), cause: "injected".to_string() })
            } else {
                Ok(format!("[{}] {}", self.name, text))
            }
        }
    }

    #[tokio::test]
    async fn falls_back_to_second_provider_on_first_failure() {
        let a = Arc::new(FlakyProvider { name: "a", calls: AtomicUsize::new(0), fail_first_n: 100 });
        let b = Arc::new(FlakyProvider { name: "b", calls: AtomicUsize::new(0), fail_first_n: 0 });
        let gateway = TranslationGateway::new(
            vec![("a".to_string(), a.clone()), ("b".to_string(), b.clone())],
            5,
            Duration::from_secs(60),
            Duration::from_secs(60),
            Duration::from_secs(5),
        );

        let result = gateway.translate("hello", "en", "fr").await.unwrap();
        assert_eq!(result.provider, "b");
        assert_eq!(gateway.provider_failure_count("a"), 1);
    }

    #[tokio::test]
    async fn provider_is_skipped_after_threshold_failures() {
        let a = Arc::new(FlakyProvider { name: "a", calls: AtomicUsize::new(0), fail_first_n: 100 });
        let b = Arc::new(FlakyProvider { name: "b", calls: AtomicUsize::new(0), fail_first_n: 0 });
        let gateway = TranslationGateway::new(
            vec![("a".to_string(), a.clone()), ("b".to_string(), b.clone())],
            2,
            Duration::from_secs(60),
            Duration::from_secs(60),
            Duration::from_secs(5),
        );

        gateway.translate("one", "en", "fr").await.unwrap();
        gateway.translate("two", "en", "fr").await.unwrap();
        assert!(gateway.is_provider_open("a"));

        gateway.translate("three", "en", "fr").await.unwrap();
        // "a" was skipped entirely on the third call, so its call count stayed at 2.
        assert_eq!(a.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn same_language_pair_is_a_no_op() {
        let a = Arc::new(FlakyProvider { name: "a", calls: AtomicUsize::new(0), fail_first_n: 0 });
        let gateway = TranslationGateway::new(
            vec![("a".to_string(), a)],
            5,
            Duration::from_secs(60),
            Duration::from_secs(60),
            Duration::from_secs(5),
        );
        let result = gateway.translate("hello", "en", "en").await.unwrap();
        assert_eq!(result.provider, "identity");
        assert_eq!(result.text, "hello");
    }

    #[tokio::test]
    async fn cached_result_is_returned_without_calling_the_provider_again() {
        let a = Arc::new(FlakyProvider { name: "a", calls: AtomicUsize::new(0), fail_first_n: 0 });
        let gateway = TranslationGateway::new(
            vec![("a".to_string(), a.clone())],
            5,
            Duration::from_secs(60),
            Duration::from_secs(60),
            Duration::from_secs(5),
        );
        gateway.translate("hello", "en", "fr").await.unwrap();
        let second = gateway.translate("hello", "en", "fr").await.unwrap();
        assert!(second.cached);
        assert_eq!(a.calls.load(Ordering::SeqCst), 1);
    }
}
