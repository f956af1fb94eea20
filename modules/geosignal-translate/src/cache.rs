use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

fn cache_key(text: &str, src: &str, dst: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    text.hash(&mut hasher);
    src.hash(&mut hasher);
    dst.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Bounded-TTL translation cache (§4.4: "results may be cached by a content
/// hash for a bounded TTL"). Translation is a pure function of
/// `(text, src, dst)` so the cache key never needs provider identity.
pub struct TranslationCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl TranslationCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    pub fn get(&self, text: &str, src: &str, dst: &str) -> Option<String> {
        let key = cache_key(text, src, dst);
        let mut entries = self.entries.lock().expect("translation cache mutex poisoned");
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, text: &str, src: &str, dst: &str, value: String) {
        let key = cache_key(text, src, dst);
        let mut entries = self.entries.lock().expect("translation cache mutex poisoned");
        entries.insert(key, Entry { value, expires_at: Instant::now() + self.ttl });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_returns_the_same_value() {
        let cache = TranslationCache::new(Duration::from_secs(60));
        cache.put("hello", "en", "fr", "bonjour".to_string());
        assert_eq!(cache.get("hello", "en", "fr"), Some("bonjour".to_string()));
    }

    #[test]
    fn expired_entry_is_evicted() {
        let cache = TranslationCache::new(Duration::from_millis(0));
        cache.put("hello", "en", "fr", "bonjour".to_string());
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("hello", "en", "fr"), None);
    }

    #[test]
    fn distinct_language_pairs_do_not_collide() {
        let cache = TranslationCache::new(Duration::from_secs(60));
        cache.put("hello", "en", "fr", "bonjour".to_string());
        assert_eq!(cache.get("hello", "en", "de"), None);
    }
}
