//! Named Moka cache with a load-through helper for repository reads.

use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use super::CacheConfig;

/// A named cache of `K -> V`. Clones share storage.
///
/// Repositories keep either keyed lookups (chat settings, uploader levels)
/// or a single snapshot under the unit key (catalogue, locked ids, active
/// event). The snapshot form has its own small API below.
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
    name: Arc<str>,
}

impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        // moka caches are internally reference counted
        Self {
            inner: self.inner.clone(),
            name: Arc::clone(&self.name),
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }
        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        Self {
            inner: builder.build(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }

    /// Return the cached value, or run `load` and cache what it returns.
    ///
    /// Errors are not cached. Two concurrent misses may both load.
    pub async fn get_or_load<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = load().await?;
        debug!("{}: cached fresh value", self.name);
        self.inner.insert(key, value.clone());
        Ok(value)
    }
}

/// Snapshot form: one value under the unit key.
impl<V> TypedCache<(), V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn current(&self) -> Option<V> {
        self.inner.get(&())
    }

    pub fn replace(&self, value: V) {
        self.inner.insert((), value);
    }

    pub fn clear(&self) {
        self.inner.invalidate(&());
    }

    pub async fn current_or_load<F, Fut, E>(&self, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.get_or_load((), load).await
    }
}

impl<K, V> fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_load_caches_success_only() {
        let cache: TypedCache<i64, u8> = TypedCache::new("levels", CacheConfig::default());

        let failed: Result<u8, &str> = cache.get_or_load(7, || async { Err("db down") }).await;
        assert!(failed.is_err());
        assert!(cache.get(&7).is_none());

        let level: Result<u8, &str> = cache.get_or_load(7, || async { Ok(2) }).await;
        assert_eq!(level, Ok(2));

        // Second load is never called
        let again: Result<u8, &str> = cache.get_or_load(7, || async { Ok(3) }).await;
        assert_eq!(again, Ok(2));
    }

    #[tokio::test]
    async fn test_snapshot_replace_and_clear() {
        let snapshot: TypedCache<(), Arc<Vec<String>>> =
            TypedCache::new("catalogue", CacheConfig::default());
        assert!(snapshot.current().is_none());

        snapshot.replace(Arc::new(vec!["1".to_string()]));
        assert_eq!(snapshot.current().map(|v| v.len()), Some(1));

        snapshot.clear();
        let loaded: Result<_, ()> = snapshot
            .current_or_load(|| async { Ok(Arc::new(Vec::new())) })
            .await;
        assert_eq!(loaded.map(|v| v.len()), Ok(0));
    }
}
