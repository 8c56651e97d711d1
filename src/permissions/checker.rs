//! Permission checker with caching.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::config::Config;
use crate::database::UploaderRepository;

/// Highest uploader level; sudo users always have it.
pub const MAX_UPLOADER_LEVEL: u8 = 3;

/// Roles configured through the environment.
#[derive(Debug, Clone, Default)]
pub struct Roles {
    owner_ids: Vec<u64>,
    sudo_ids: Vec<u64>,
    uploader_ids: Vec<u64>,
}

impl Roles {
    pub fn new(owner_ids: Vec<u64>, sudo_ids: Vec<u64>, uploader_ids: Vec<u64>) -> Self {
        Self {
            owner_ids,
            sudo_ids,
            uploader_ids,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.owner_ids.clone(),
            config.sudo_ids.clone(),
            config.uploader_ids.clone(),
        )
    }

    #[inline]
    pub fn is_owner(&self, user_id: i64) -> bool {
        u64::try_from(user_id).is_ok_and(|id| self.owner_ids.contains(&id))
    }

    /// Owners are always sudo.
    pub fn is_sudo(&self, user_id: i64) -> bool {
        self.is_owner(user_id)
            || u64::try_from(user_id).is_ok_and(|id| self.sudo_ids.contains(&id))
    }

    /// Level granted without looking at the database, if any.
    pub fn static_level(&self, user_id: i64) -> Option<u8> {
        if self.is_sudo(user_id) {
            return Some(MAX_UPLOADER_LEVEL);
        }
        None
    }

    /// Level for users only listed in `UPLOADING_USERS`.
    pub fn env_uploader_level(&self, user_id: i64) -> u8 {
        match u64::try_from(user_id) {
            Ok(id) if self.uploader_ids.contains(&id) => 1,
            _ => 0,
        }
    }
}

/// Permission checker.
///
/// Uploader levels come from the sudo list, the `dynamic_uploading_users`
/// collection, then `UPLOADING_USERS`, in that order.
#[derive(Clone)]
pub struct Permissions {
    roles: Roles,
    uploaders: Arc<UploaderRepository>,
    levels: TypedCache<i64, u8>,
}

impl Permissions {
    pub fn new(roles: Roles, uploaders: Arc<UploaderRepository>, cache: &CacheRegistry) -> Self {
        Self {
            roles,
            uploaders,
            levels: cache.get_or_create("uploader_levels", CacheConfig::permissions()),
        }
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        self.roles.is_owner(user_id)
    }

    pub fn is_sudo(&self, user_id: i64) -> bool {
        self.roles.is_sudo(user_id)
    }

    /// Uploader level 0..=3. Zero means no upload rights.
    pub async fn uploader_level(&self, user_id: i64) -> anyhow::Result<u8> {
        if let Some(level) = self.roles.static_level(user_id) {
            return Ok(level);
        }
        self.levels
            .get_or_load(user_id, || async {
                let level = match self.uploaders.get(user_id).await? {
                    Some(uploader) => uploader.level.min(MAX_UPLOADER_LEVEL),
                    None => self.roles.env_uploader_level(user_id),
                };
                debug!("Uploader level of {} is {}", user_id, level);
                Ok::<_, anyhow::Error>(level)
            })
            .await
    }

    /// Drop a cached level after `/adduploader`, `/removeuploader` or `/promote`.
    pub fn invalidate_level(&self, user_id: i64) {
        self.levels.invalidate(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> Roles {
        Roles::new(vec![1], vec![2], vec![3])
    }

    #[test]
    fn test_owner_is_sudo() {
        let r = roles();
        assert!(r.is_owner(1));
        assert!(r.is_sudo(1));
        assert!(!r.is_owner(2));
        assert!(r.is_sudo(2));
        assert!(!r.is_sudo(3));
        assert!(!r.is_sudo(-1));
    }

    #[test]
    fn test_levels_without_database() {
        let r = roles();
        assert_eq!(r.static_level(1), Some(MAX_UPLOADER_LEVEL));
        assert_eq!(r.static_level(2), Some(MAX_UPLOADER_LEVEL));
        assert_eq!(r.static_level(3), None);
        assert_eq!(r.env_uploader_level(3), 1);
        assert_eq!(r.env_uploader_level(4), 0);
    }
}
