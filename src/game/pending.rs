//! Trades and gifts waiting for a button press.

use std::sync::Arc;

use dashmap::DashMap;

use crate::database::Character;

/// Proposed swap: the sender's card for the receiver's card.
#[derive(Debug, Clone)]
pub struct PendingTrade {
    pub sender_card: Character,
    pub receiver_card: Character,
}

#[derive(Debug, Clone)]
pub struct PendingGift {
    pub character: Character,
    pub receiver_username: Option<String>,
    pub receiver_first_name: String,
}

/// Pending offers keyed by `(sender, receiver)`. A new offer between the
/// same pair replaces the old one.
#[derive(Debug)]
pub struct PendingStore<T> {
    inner: Arc<DashMap<(i64, i64), T>>,
}

impl<T> Clone for PendingStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for PendingStore<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }
}

impl<T> PendingStore<T> {
    pub fn insert(&self, sender: i64, receiver: i64, offer: T) {
        self.inner.insert((sender, receiver), offer);
    }

    /// Remove and return an offer.
    pub fn take(&self, sender: i64, receiver: i64) -> Option<T> {
        self.inner.remove(&(sender, receiver)).map(|(_, offer)| offer)
    }
}

pub type PendingTrades = PendingStore<PendingTrade>;
pub type PendingGifts = PendingStore<PendingGift>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Rarity;

    fn gift(id: &str) -> PendingGift {
        PendingGift {
            character: Character::new(id, "Rem", "Re Zero", Rarity::Rare, "u"),
            receiver_username: None,
            receiver_first_name: "Bob".into(),
        }
    }

    #[test]
    fn test_insert_replaces_and_take_removes() {
        let gifts = PendingGifts::default();
        gifts.insert(1, 2, gift("1"));
        gifts.insert(1, 2, gift("2"));
        assert!(gifts.take(2, 1).is_none());

        assert_eq!(gifts.take(1, 2).map(|g| g.character.id), Some("2".to_string()));
        assert!(gifts.take(1, 2).is_none());
    }

    #[test]
    fn test_clones_share_offers() {
        let trades = PendingTrades::default();
        let other = trades.clone();
        let card = Character::new("1", "Rem", "Re Zero", Rarity::Rare, "u");
        trades.insert(1, 2, PendingTrade {
            sender_card: card.clone(),
            receiver_card: card,
        });
        assert!(other.take(1, 2).is_some());
    }
}
