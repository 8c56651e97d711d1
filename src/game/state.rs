//! In-memory spawn and claim state.
//!
//! Every chat has one [`ChatGame`] behind an async mutex. The message
//! counter and `/marry` both hold that lock while they read and change
//! the chat's spawn, so exactly one correct guess wins an automatic spawn.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::matcher::{has_forbidden_chars, name_matches};
use super::spawn::RecentlySent;
use crate::database::Character;

/// Result of a `/marry` attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// Nothing has spawned in this chat yet.
    NoSpawn,
    /// Someone already won this automatic spawn.
    AlreadyClaimed,
    /// The guess contains forbidden characters.
    Rejected,
    WrongName,
    Claimed(Character),
}

/// Spawn state of one chat.
#[derive(Debug, Default)]
pub struct ChatGame {
    pub message_count: u32,
    pub star_count: u32,
    pub current: Option<Character>,
    /// Winner of the current automatic spawn.
    pub first_claimer: Option<i64>,
    /// Set for `/summon` spawns, which stay claimable by anyone.
    pub manual: bool,
}

impl ChatGame {
    /// Count a message. Returns true when a spawn is due and resets the
    /// counter.
    pub fn count_message(&mut self, frequency: u32) -> bool {
        self.message_count += 1;
        if self.message_count % frequency.max(1) == 0 {
            self.message_count = 0;
            return true;
        }
        false
    }

    /// Same as [`Self::count_message`] for the star chat's second counter.
    pub fn count_star(&mut self, frequency: u32) -> bool {
        self.star_count += 1;
        if self.star_count % frequency.max(1) == 0 {
            self.star_count = 0;
            return true;
        }
        false
    }

    /// Replace the current spawn and reopen claiming.
    pub fn set_spawn(&mut self, character: Character, manual: bool) {
        self.current = Some(character);
        self.first_claimer = None;
        self.manual = manual;
    }

    /// Arbitrate a guess. Must be called with the chat lock held.
    pub fn try_claim(&mut self, user_id: i64, guess: &str) -> ClaimOutcome {
        let Some(current) = &self.current else {
            return ClaimOutcome::NoSpawn;
        };

        if !self.manual && self.first_claimer.is_some() {
            return ClaimOutcome::AlreadyClaimed;
        }

        if has_forbidden_chars(guess) {
            return ClaimOutcome::Rejected;
        }
        if !name_matches(guess, &current.name) {
            return ClaimOutcome::WrongName;
        }

        let won = current.clone();
        if !self.manual {
            self.first_claimer = Some(user_id);
        }
        ClaimOutcome::Claimed(won)
    }
}

/// Shared game state, cloned into every handler.
#[derive(Clone, Default)]
pub struct GameState {
    chats: Arc<DashMap<i64, Arc<Mutex<ChatGame>>>>,
    recent: Arc<parking_lot::Mutex<RecentlySent>>,
    star_sent: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a chat's lock, creating its state on first use.
    pub async fn lock(&self, chat_id: i64) -> OwnedMutexGuard<ChatGame> {
        let game = self.chats.entry(chat_id).or_default().clone();
        game.lock_owned().await
    }

    pub async fn try_claim(&self, chat_id: i64, user_id: i64, guess: &str) -> ClaimOutcome {
        self.lock(chat_id).await.try_claim(user_id, guess)
    }

    /// Snapshot of a chat's recently spawned ids.
    pub fn recent(&self, chat_id: i64) -> VecDeque<String> {
        self.recent.lock().get(chat_id).cloned().unwrap_or_default()
    }

    pub fn remember_spawn(&self, chat_id: i64, character_id: &str) {
        self.recent.lock().push(chat_id, character_id);
    }

    /// Run `f` with the star chat's sent list.
    pub fn with_star_sent<T>(&self, f: impl FnOnce(&mut Vec<String>) -> T) -> T {
        f(&mut self.star_sent.lock())
    }

    /// Number of chats with in-memory state.
    pub fn tracked_chats(&self) -> usize {
        self.chats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Rarity;

    fn rem() -> Character {
        Character::new("7", "Rem", "Re Zero", Rarity::Rare, "https://x.io/rem.jpg")
    }

    #[test]
    fn test_count_fires_on_frequency_and_resets() {
        let mut game = ChatGame::default();
        assert!(!game.count_message(3));
        assert!(!game.count_message(3));
        assert!(game.count_message(3));
        assert_eq!(game.message_count, 0);
        assert!(!game.count_message(3));
    }

    #[test]
    fn test_frequency_one_fires_every_message() {
        let mut game = ChatGame::default();
        assert!(game.count_message(1));
        assert!(game.count_message(0));
    }

    #[test]
    fn test_claim_without_spawn() {
        let mut game = ChatGame::default();
        assert_eq!(game.try_claim(1, "rem"), ClaimOutcome::NoSpawn);
    }

    #[test]
    fn test_first_correct_guess_wins() {
        let mut game = ChatGame::default();
        game.set_spawn(rem(), false);

        assert_eq!(game.try_claim(1, "ram"), ClaimOutcome::WrongName);
        assert_eq!(game.try_claim(1, "rem&"), ClaimOutcome::Rejected);
        assert!(matches!(game.try_claim(2, "rem"), ClaimOutcome::Claimed(c) if c.id == "7"));
        assert_eq!(game.try_claim(3, "rem"), ClaimOutcome::AlreadyClaimed);
        assert_eq!(game.first_claimer, Some(2));
    }

    #[test]
    fn test_manual_summon_stays_claimable() {
        let mut game = ChatGame::default();
        game.set_spawn(rem(), true);

        assert!(matches!(game.try_claim(1, "rem"), ClaimOutcome::Claimed(_)));
        assert!(matches!(game.try_claim(2, "Rem"), ClaimOutcome::Claimed(_)));
        // The same user may claim a summon again
        assert!(matches!(game.try_claim(1, "rem"), ClaimOutcome::Claimed(_)));
        assert_eq!(game.try_claim(3, "ram"), ClaimOutcome::WrongName);
    }

    #[test]
    fn test_new_spawn_reopens_claiming() {
        let mut game = ChatGame::default();
        game.set_spawn(rem(), false);
        assert!(matches!(game.try_claim(1, "rem"), ClaimOutcome::Claimed(_)));
        game.set_spawn(rem(), false);
        assert!(matches!(game.try_claim(2, "rem"), ClaimOutcome::Claimed(_)));
    }

    #[tokio::test]
    async fn test_concurrent_claims_have_one_winner() {
        let state = GameState::new();
        state.lock(-1).await.set_spawn(rem(), false);

        let mut handles = Vec::new();
        for user in 0..16 {
            let state = state.clone();
            handles.push(tokio::spawn(async move { state.try_claim(-1, user, "rem").await }));
        }

        let mut winners = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), ClaimOutcome::Claimed(_)) {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(state.tracked_chats(), 1);
    }

    #[tokio::test]
    async fn test_counters_are_per_chat() {
        let state = GameState::new();
        assert!(!state.lock(-1).await.count_message(2));
        assert!(!state.lock(-2).await.count_message(2));
        assert!(state.lock(-1).await.count_message(2));
    }

    #[test]
    fn test_recent_snapshot() {
        let state = GameState::new();
        state.remember_spawn(-1, "3");
        assert_eq!(state.recent(-1), VecDeque::from(vec!["3".to_string()]));
        assert!(state.recent(-2).is_empty());
        assert_eq!(state.with_star_sent(|s| s.len()), 0);
    }
}
