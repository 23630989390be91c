//! Embedding response caching to reduce API calls

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

/// Cache entry with TTL
#[derive(Clone)]
struct CacheEntry {
    value: Vec<f32>,
    expires_at: SystemTime,
}

/// In-memory cache for embeddings.
///
/// The same combined text is embedded repeatedly during a curation
/// session; caching keeps repeat analyses from re-billing the provider.
pub struct EmbeddingCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl EmbeddingCache {
    /// Create new cache with default TTL of 1 hour
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(3600),
        }
    }

    /// Create cache with custom TTL
    #[allow(dead_code)]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: ttl,
        }
    }

    /// Get cached embedding if present and not expired
    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;

        if SystemTime::now() < entry.expires_at {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Cache an embedding with the default TTL
    pub fn set(&self, key: String, value: Vec<f32>) {
        let entry = CacheEntry {
            value,
            expires_at: SystemTime::now() + self.default_ttl,
        };
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, entry);
        }
    }

    /// Clear expired entries
    #[allow(dead_code)]
    pub fn cleanup(&self) {
        if let Ok(mut entries) = self.entries.write() {
            let now = SystemTime::now();
            entries.retain(|_, entry| now < entry.expires_at);
        }
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate cache key for embeddings
pub fn embedding_cache_key(model: &str, text: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    model.hash(&mut hasher);
    text.hash(&mut hasher);
    format!("embed:{}:{:x}", model, hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let cache = EmbeddingCache::new();
        let key = embedding_cache_key("model", "some text");
        assert!(cache.get(&key).is_none());

        cache.set(key.clone(), vec![1.0, 2.0]);
        assert_eq!(cache.get(&key), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn expired_entries_invisible() {
        let cache = EmbeddingCache::with_ttl(Duration::from_secs(0));
        let key = embedding_cache_key("model", "text");
        cache.set(key.clone(), vec![0.5]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn keys_distinguish_model_and_text() {
        let a = embedding_cache_key("m1", "t");
        let b = embedding_cache_key("m2", "t");
        let c = embedding_cache_key("m1", "u");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
