//! Loot drops

use crate::config::LootEntry;
use glam::Vec3;
use outpost_core::LootId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A stack of one item kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LootItem {
    pub kind: String,
    pub quantity: u32,
}

/// Items left behind where an agent died
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LootDrop {
    pub id: LootId,
    pub position: Vec3,
    pub items: Vec<LootItem>,
    /// Simulation time of the drop
    pub spawn_time: f64,
}

impl LootDrop {
    /// Whether the drop has outlived `lifetime` at time `now`
    pub fn is_expired(&self, now: f64, lifetime: f64) -> bool {
        now - self.spawn_time > lifetime
    }

    /// Total number of items
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Roll every entry independently.
///
/// Entries with a zero quantity roll are left out.
pub fn roll_items<R: Rng + ?Sized>(table: &[LootEntry], rng: &mut R) -> Vec<LootItem> {
    let mut items = Vec::new();
    for entry in table {
        let chance = if entry.chance.is_finite() {
            entry.chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if !rng.random_bool(chance) {
            continue;
        }

        let lo = entry.min_quantity.min(entry.max_quantity);
        let hi = entry.min_quantity.max(entry.max_quantity);
        let quantity = rng.random_range(lo..=hi);
        if quantity > 0 {
            items.push(LootItem {
                kind: entry.item.clone(),
                quantity,
            });
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_guaranteed_entry_always_drops() {
        let table = vec![LootEntry::new("scrap", 1.0, 1, 3)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let items = roll_items(&table, &mut rng);
            assert_eq!(items.len(), 1);
            assert!((1..=3).contains(&items[0].quantity));
        }
    }

    #[test]
    fn test_zero_chance_never_drops() {
        let table = vec![LootEntry::new("relic", 0.0, 1, 1), LootEntry::new("bad", f64::NAN, 1, 1)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(roll_items(&table, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_inverted_quantity_range() {
        let table = vec![LootEntry::new("ammo", 1.0, 9, 4)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let items = roll_items(&table, &mut rng);
        assert!((4..=9).contains(&items[0].quantity));
    }

    #[test]
    fn test_expiry() {
        let drop = LootDrop {
            id: LootId(1),
            position: Vec3::ZERO,
            items: vec![LootItem {
                kind: "scrap".into(),
                quantity: 2,
            }],
            spawn_time: 10.0,
        };
        assert!(!drop.is_expired(70.0, 60.0));
        assert!(drop.is_expired(70.5, 60.0));
        assert_eq!(drop.item_count(), 2);
    }
}
