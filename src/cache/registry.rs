//! Cache registry - Central management for all caches.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::{CacheConfig, TypedCache};

/// Central registry for managing multiple typed caches.
///
/// Repositories ask for their cache by name; asking twice with the same
/// key/value types returns the same shared cache.
#[derive(Clone)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

/// Internal cache entry storing type-erased cache.
struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self {
            caches: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get an existing cache or create a new one if it doesn't exist.
    ///
    /// A name already registered with different types gets a fresh,
    /// unregistered cache so callers never share mismatched storage.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let mut caches = self.caches.write();

        if let Some(existing) = caches.get(name) {
            if let Some(cache) = existing.cache.downcast_ref::<TypedCache<K, V>>() {
                return cache.clone();
            }
            warn!(
                "Cache '{}' already registered as {}, requested {}",
                name,
                existing.type_name,
                std::any::type_name::<TypedCache<K, V>>()
            );
            return TypedCache::new(name, config);
        }

        debug!("Creating cache: {}", name);
        let cache = TypedCache::new(name, config);

        caches.insert(
            name.to_string(),
            CacheEntry {
                cache: Box::new(cache.clone()),
                type_name: std::any::type_name::<TypedCache<K, V>>(),
            },
        );

        cache
    }

    /// Registered (type-erased) cache names.
    pub fn cache_names(&self) -> Vec<String> {
        self.caches.read().keys().cloned().collect()
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_shares_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<i64, String> = registry.get_or_create("names", CacheConfig::default());
        let b: TypedCache<i64, String> = registry.get_or_create("names", CacheConfig::default());

        a.insert(1, "one".to_string());
        assert_eq!(b.get(&1).as_deref(), Some("one"));
        assert_eq!(registry.cache_names(), vec!["names".to_string()]);
    }

    #[test]
    fn test_type_mismatch_gets_private_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<i64, String> = registry.get_or_create("shared", CacheConfig::default());
        let b: TypedCache<i64, u8> = registry.get_or_create("shared", CacheConfig::default());

        a.insert(1, "one".to_string());
        b.insert(1, 1);
        assert_eq!(a.get(&1).as_deref(), Some("one"));
        assert_eq!(registry.cache_names(), vec!["shared".to_string()]);
    }
}
