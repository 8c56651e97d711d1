//! Weighted character selection.

use std::collections::{HashMap, VecDeque};

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::database::{Character, Rarity};

/// Maximum remembered spawns per chat.
pub const RECENTLY_SENT_CAP: usize = 50;

/// Draw a rarity among those that have at least one candidate and a
/// positive weight.
pub fn pick_rarity<R: Rng + ?Sized>(
    candidates: &[Character],
    weight: impl Fn(Rarity) -> f64,
    rng: &mut R,
) -> Option<Rarity> {
    let mut present: Vec<Rarity> = candidates.iter().map(|c| c.rarity).collect();
    present.sort_unstable();
    present.dedup();

    let (rarities, weights): (Vec<Rarity>, Vec<f64>) = present
        .into_iter()
        .map(|r| (r, weight(r)))
        .filter(|(_, w)| *w > 0.0)
        .unzip();

    let dist = WeightedIndex::new(&weights).ok()?;
    Some(rarities[dist.sample(rng)])
}

/// Pick a character, preferring ones not in `recent`. Falls back to the
/// whole pool once every character was sent.
pub fn pick_character<'a, R: Rng + ?Sized>(
    pool: &[&'a Character],
    recent: &VecDeque<String>,
    rng: &mut R,
) -> Option<&'a Character> {
    let fresh: Vec<&Character> = pool
        .iter()
        .copied()
        .filter(|c| !recent.contains(&c.id))
        .collect();

    if fresh.is_empty() {
        pool.choose(rng).copied()
    } else {
        fresh.choose(rng).copied()
    }
}

/// Weighted rarity draw followed by a character draw within that rarity.
pub fn pick_spawn<'a, R: Rng + ?Sized>(
    candidates: &'a [Character],
    weight: impl Fn(Rarity) -> f64,
    recent: &VecDeque<String>,
    rng: &mut R,
) -> Option<&'a Character> {
    let rarity = pick_rarity(candidates, weight, rng)?;
    let pool: Vec<&Character> = candidates.iter().filter(|c| c.rarity == rarity).collect();
    pick_character(&pool, recent, rng)
}

/// Recently spawned character ids, per key (chat id or the star key).
#[derive(Debug, Default)]
pub struct RecentlySent {
    lists: HashMap<i64, VecDeque<String>>,
}

impl RecentlySent {
    pub fn get(&self, key: i64) -> Option<&VecDeque<String>> {
        self.lists.get(&key)
    }

    /// Remember a spawn, dropping the oldest entry past the cap.
    pub fn push(&mut self, key: i64, character_id: &str) {
        let list = self.lists.entry(key).or_default();
        list.push_back(character_id.to_string());
        while list.len() > RECENTLY_SENT_CAP {
            list.pop_front();
        }
    }
}

/// Pick the next Star character for the star chat. Every Star is shown
/// once before any repeats.
pub fn pick_star<'a, R: Rng + ?Sized>(
    stars: &'a [Character],
    sent: &mut Vec<String>,
    rng: &mut R,
) -> Option<&'a Character> {
    if stars.is_empty() {
        return None;
    }

    let mut fresh: Vec<&Character> = stars.iter().filter(|c| !sent.contains(&c.id)).collect();
    if fresh.is_empty() {
        sent.clear();
        fresh = stars.iter().collect();
    }

    let picked = fresh.choose(rng).copied()?;
    sent.push(picked.id.clone());
    Some(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn character(id: &str, rarity: Rarity) -> Character {
        Character::new(id, format!("Name {id}"), "Show", rarity, "https://x.io/a.jpg")
    }

    #[test]
    fn test_pick_rarity_skips_zero_weight_and_missing() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = vec![character("1", Rarity::Star), character("2", Rarity::Epic)];

        for _ in 0..50 {
            let picked = pick_rarity(&pool, Rarity::spawn_weight, &mut rng);
            assert_eq!(picked, Some(Rarity::Epic));
        }
    }

    #[test]
    fn test_pick_rarity_none_when_nothing_spawnable() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = vec![character("1", Rarity::Star), character("2", Rarity::Custom)];
        assert_eq!(pick_rarity(&pool, Rarity::spawn_weight, &mut rng), None);
        assert_eq!(pick_rarity(&[], Rarity::spawn_weight, &mut rng), None);
    }

    #[test]
    fn test_pick_character_avoids_recent() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = character("1", Rarity::Common);
        let b = character("2", Rarity::Common);
        let pool = vec![&a, &b];
        let recent: VecDeque<String> = VecDeque::from(vec!["1".to_string()]);

        for _ in 0..20 {
            assert_eq!(pick_character(&pool, &recent, &mut rng).map(|c| c.id.as_str()), Some("2"));
        }
    }

    #[test]
    fn test_pick_character_falls_back_when_all_sent() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = character("1", Rarity::Common);
        let pool = vec![&a];
        let recent: VecDeque<String> = VecDeque::from(vec!["1".to_string()]);
        assert!(pick_character(&pool, &recent, &mut rng).is_some());
        assert!(pick_character(&[], &recent, &mut rng).is_none());
    }

    #[test]
    fn test_recently_sent_cap() {
        let mut recent = RecentlySent::default();
        for i in 0..(RECENTLY_SENT_CAP + 5) {
            recent.push(-100, &i.to_string());
        }
        let list = recent.get(-100).unwrap();
        assert_eq!(list.len(), RECENTLY_SENT_CAP);
        assert_eq!(list.front().map(String::as_str), Some("5"));
        assert!(recent.get(-200).is_none());
    }

    #[test]
    fn test_pick_star_cycles_before_repeating() {
        let mut rng = StdRng::seed_from_u64(3);
        let stars = vec![character("1", Rarity::Star), character("2", Rarity::Star)];
        let mut sent = Vec::new();

        let first = pick_star(&stars, &mut sent, &mut rng).unwrap().id.clone();
        let second = pick_star(&stars, &mut sent, &mut rng).unwrap().id.clone();
        assert_ne!(first, second);

        // both sent: the list resets
        pick_star(&stars, &mut sent, &mut rng).unwrap();
        assert_eq!(sent.len(), 1);
        assert!(pick_star(&[], &mut sent, &mut rng).is_none());
    }
}
