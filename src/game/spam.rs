//! Per-user message rate guard.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Messages allowed inside [`WINDOW`] before a block.
pub const MAX_MESSAGES: usize = 7;
pub const WINDOW: Duration = Duration::from_secs(10);
pub const BLOCK_DURATION: Duration = Duration::from_secs(720);

/// What happened to a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamCheck {
    Allowed,
    /// This message tripped the guard.
    JustBlocked,
    /// The user was already blocked; the message is ignored.
    Blocked,
}

/// Tracks message timestamps per user (in-memory, lock-free).
#[derive(Clone, Default)]
pub struct SpamGuard {
    history: Arc<DashMap<i64, VecDeque<Instant>>>,
    blocked_until: Arc<DashMap<i64, Instant>>,
}

impl SpamGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, user_id: i64) -> SpamCheck {
        self.record_at(user_id, Instant::now())
    }

    /// Record a message sent at `now`.
    ///
    /// The burst check runs before the block check, so a blocked user who
    /// keeps flooding is blocked again for the full duration.
    pub fn record_at(&self, user_id: i64, now: Instant) -> SpamCheck {
        let mut times = self.history.entry(user_id).or_default();
        times.push_back(now);
        while times
            .front()
            .is_some_and(|t| now.duration_since(*t) > WINDOW)
        {
            times.pop_front();
        }

        if times.len() > MAX_MESSAGES {
            times.clear();
            drop(times);
            self.blocked_until.insert(user_id, now + BLOCK_DURATION);
            return SpamCheck::JustBlocked;
        }
        drop(times);

        if self.is_blocked_at(user_id, now) {
            return SpamCheck::Blocked;
        }
        SpamCheck::Allowed
    }

    /// Expired blocks are removed on lookup.
    pub fn is_blocked_at(&self, user_id: i64, now: Instant) -> bool {
        self.remaining_at(user_id, now).is_some()
    }

    pub fn remaining(&self, user_id: i64) -> Option<Duration> {
        self.remaining_at(user_id, Instant::now())
    }

    pub fn remaining_at(&self, user_id: i64, now: Instant) -> Option<Duration> {
        let until = *self.blocked_until.get(&user_id)?;
        if now >= until {
            self.blocked_until.remove(&user_id);
            return None;
        }
        Some(until - now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eighth_message_in_window_blocks() {
        let guard = SpamGuard::new();
        let start = Instant::now();

        for i in 0..MAX_MESSAGES {
            let at = start + Duration::from_millis(i as u64 * 100);
            assert_eq!(guard.record_at(1, at), SpamCheck::Allowed);
        }
        let at = start + Duration::from_secs(1);
        assert_eq!(guard.record_at(1, at), SpamCheck::JustBlocked);
        assert_eq!(guard.record_at(1, at), SpamCheck::Blocked);
        assert!(!guard.is_blocked_at(2, at));
    }

    #[test]
    fn test_slow_messages_never_block() {
        let guard = SpamGuard::new();
        let start = Instant::now();
        for i in 0..30 {
            let at = start + Duration::from_secs(i * 2);
            assert_eq!(guard.record_at(1, at), SpamCheck::Allowed);
        }
    }

    #[test]
    fn test_block_expires_lazily() {
        let guard = SpamGuard::new();
        let start = Instant::now();
        for _ in 0..=MAX_MESSAGES {
            guard.record_at(1, start);
        }

        let later = start + Duration::from_secs(60);
        assert_eq!(guard.remaining_at(1, later), Some(BLOCK_DURATION - Duration::from_secs(60)));

        let after = start + BLOCK_DURATION;
        assert!(!guard.is_blocked_at(1, after));
        assert_eq!(guard.record_at(1, after), SpamCheck::Allowed);
    }

    #[test]
    fn test_flooding_while_blocked_renews_block() {
        let guard = SpamGuard::new();
        let start = Instant::now();
        for _ in 0..=MAX_MESSAGES {
            guard.record_at(1, start);
        }

        let later = start + Duration::from_secs(600);
        for _ in 0..MAX_MESSAGES {
            assert_eq!(guard.record_at(1, later), SpamCheck::Blocked);
        }
        assert_eq!(guard.record_at(1, later), SpamCheck::JustBlocked);
        assert_eq!(guard.remaining_at(1, later), Some(BLOCK_DURATION));
    }
}
