//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)),
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle for cache entries.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Per-chat spawn settings, read on every counted message.
    pub fn chat_settings() -> Self {
        Self::with_capacity(10_000).ttl(Duration::from_secs(600))
    }

    /// Uploader levels; changed only by owner commands.
    pub fn permissions() -> Self {
        Self::with_capacity(5_000)
            .ttl(Duration::from_secs(300))
            .tti(Duration::from_secs(120))
    }

    /// Single-key snapshots (catalogue, active event, locked ids).
    /// Short TTL so other processes' writes show up quickly.
    pub fn global_lookup() -> Self {
        Self::with_capacity(16).ttl(Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let chat = CacheConfig::chat_settings();
        assert_eq!(chat.ttl, Some(Duration::from_secs(600)));
        assert!(chat.tti.is_none());

        let levels = CacheConfig::permissions();
        assert_eq!(levels.max_capacity, 5_000);
        assert_eq!(levels.tti, Some(Duration::from_secs(120)));

        assert_eq!(CacheConfig::global_lookup().max_capacity, 16);
    }
}
