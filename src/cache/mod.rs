//! Cache module - Modular caching system using Moka.
//!
//! Repositories and the permission checker keep their hot lookups here
//! (chat spawn settings, uploader levels, active event, locked spawn ids)
//! so the message counter does not hit MongoDB on every message.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let settings = registry.get_or_create::<i64, ChatSettings>("chat_settings", CacheConfig::chat_settings());
//! settings.insert(chat_id, value);
//! let value = settings.get(&chat_id);
//! ```

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
