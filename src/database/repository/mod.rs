//! Repository module - decentralized data access layer.

mod ban_repository;
mod character_repository;
mod chat_settings_repository;
mod collector_repository;
mod event_repository;
mod leaderboard_repository;
mod pm_user_repository;
mod spawn_lock_repository;
mod uploader_repository;

pub use ban_repository::BanRepository;
pub use character_repository::CharacterRepository;
pub use chat_settings_repository::ChatSettingsRepository;
pub use collector_repository::CollectorRepository;
pub use event_repository::EventRepository;
pub use leaderboard_repository::LeaderboardRepository;
pub use pm_user_repository::PmUserRepository;
pub use spawn_lock_repository::SpawnLockRepository;
pub use uploader_repository::UploaderRepository;

/// Escape user input for a `$regex` match.
pub(crate) fn regex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\^$.|?*+()[]{}/-".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_escape() {
        assert_eq!(regex_escape("Re:Zero"), "Re:Zero");
        assert_eq!(regex_escape("a.b(c)"), "a\\.b\\(c\\)");
        assert_eq!(regex_escape("🎄"), "🎄");
    }
}
