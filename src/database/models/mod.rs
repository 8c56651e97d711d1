//! Document types stored in MongoDB.

pub mod ban;
pub mod character;
pub mod chat_settings;
pub mod collector;
pub mod event;
pub mod leaderboard;
pub mod pm_user;
pub mod rarity;
pub mod spawn_lock;
pub mod uploader;

pub use ban::BannedUser;
pub use character::Character;
pub use chat_settings::ChatSettings;
pub use collector::{utc_day_key, Collector, HaremSort};
pub use event::EventSettings;
pub use leaderboard::{GroupTotal, GroupUserTotal};
pub use pm_user::PmUser;
pub use rarity::Rarity;
pub use spawn_lock::LockedSpawn;
pub use uploader::Uploader;
