//! Loot templates and bundle generation.
//!
//! Each entry is rolled independently against its drop chance (percent);
//! a successful roll yields a uniformly random count in
//! `min_count..=max_count`. Money is rolled uniformly in
//! `money_min..=money_max` copper.

use gather_types::{ItemEntry, ItemStack, LootBundle, LootTableId};
use rand::Rng;
use serde::Deserialize;

use crate::error::DataError;
use crate::store::StaticData;

/// One possible drop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LootEntry {
    /// Item dropped.
    pub item: ItemEntry,
    /// Drop chance in percent (100 or more always drops).
    pub chance: f32,
    /// Minimum count when dropped.
    #[serde(default = "default_count")]
    pub min_count: u32,
    /// Maximum count when dropped.
    #[serde(default = "default_count")]
    pub max_count: u32,
}

/// A loot table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LootTemplate {
    /// Table identifier.
    pub id: LootTableId,
    /// Possible drops in declared order.
    #[serde(default)]
    pub entries: Vec<LootEntry>,
    /// Minimum copper.
    #[serde(default)]
    pub money_min: u32,
    /// Maximum copper.
    #[serde(default)]
    pub money_max: u32,
}

impl LootTemplate {
    /// Reject inverted ranges and nonsensical chances.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.money_min > self.money_max {
            return Err(self.malformed(format!(
                "money range {}..={} is inverted",
                self.money_min, self.money_max
            )));
        }
        for entry in &self.entries {
            if entry.min_count > entry.max_count {
                return Err(self.malformed(format!(
                    "item {} count range {}..={} is inverted",
                    entry.item, entry.min_count, entry.max_count
                )));
            }
            if !entry.chance.is_finite() || entry.chance < 0.0 {
                return Err(self.malformed(format!(
                    "item {} has invalid chance {}",
                    entry.item, entry.chance
                )));
            }
        }
        Ok(())
    }

    /// Roll this table into a bundle.
    pub fn generate(&self, rng: &mut impl Rng) -> LootBundle {
        let mut bundle = LootBundle::empty();
        for entry in &self.entries {
            let dropped = entry.chance >= 100.0 || rng.random::<f32>() * 100.0 < entry.chance;
            if !dropped || entry.max_count == 0 {
                continue;
            }
            let count = rng.random_range(entry.min_count.clamp(1, entry.max_count)..=entry.max_count);
            bundle.items.push(ItemStack::new(entry.item, count));
        }
        if self.money_max > 0 {
            bundle.money = rng.random_range(self.money_min.min(self.money_max)..=self.money_max);
        }
        bundle
    }

    fn malformed(&self, reason: String) -> DataError {
        DataError::MalformedLoot {
            table: self.id,
            reason,
        }
    }
}

/// Generate the bundle for an optional loot reference.
///
/// A missing reference, or one that resolves to no template, yields an
/// empty bundle.
pub fn fill_loot<D: StaticData + ?Sized>(
    data: &D,
    table: Option<LootTableId>,
    rng: &mut impl Rng,
) -> LootBundle {
    table
        .and_then(|id| data.loot_template(id))
        .map_or_else(LootBundle::empty, |template| template.generate(rng))
}

const fn default_count() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn template(entries: Vec<LootEntry>, money_min: u32, money_max: u32) -> LootTemplate {
        LootTemplate {
            id: LootTableId(1),
            entries,
            money_min,
            money_max,
        }
    }

    #[test]
    fn guaranteed_entries_always_drop() {
        let t = template(
            vec![LootEntry {
                item: ItemEntry(2770),
                chance: 100.0,
                min_count: 2,
                max_count: 4,
            }],
            0,
            0,
        );
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let bundle = t.generate(&mut rng);
            assert_eq!(bundle.items.len(), 1);
            let count = bundle.items.first().map_or(0, |s| s.count);
            assert!((2..=4).contains(&count));
            assert_eq!(bundle.money, 0);
        }
    }

    #[test]
    fn zero_chance_never_drops() {
        let t = template(
            vec![LootEntry {
                item: ItemEntry(7909),
                chance: 0.0,
                min_count: 1,
                max_count: 1,
            }],
            0,
            0,
        );
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(t.generate(&mut rng).is_empty());
        }
    }

    #[test]
    fn money_rolls_in_range() {
        let t = template(Vec::new(), 10, 20);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            let money = t.generate(&mut rng).money;
            assert!((10..=20).contains(&money));
        }
    }

    #[test]
    fn inverted_ranges_rejected() {
        assert!(template(Vec::new(), 5, 1).validate().is_err());
        let t = template(
            vec![LootEntry {
                item: ItemEntry(1),
                chance: 50.0,
                min_count: 3,
                max_count: 1,
            }],
            0,
            0,
        );
        assert!(t.validate().is_err());
    }
}
