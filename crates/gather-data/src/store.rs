//! The static data seam and its in-memory implementation.
//!
//! The scan engine never reads game tables directly; it asks a
//! [`StaticData`] implementation. [`StaticDataStore`] is the bundled
//! implementation, loaded from one YAML document:
//!
//! ```yaml
//! items:
//!   - { entry: 2447, name: Peacebloom, max_stack: 20 }
//! locks:
//!   - id: 29
//!     cases:
//!       - { key_type: skill, lock_type: herbalism, skill: 1 }
//! spells:
//!   - { id: 2383, name: Find Herbs, effects: [ { misc_value: 2 } ] }
//! creatures:
//!   - { entry: 2956, name: Adult Plainstrider, skin_loot: 2956 }
//! loot:
//!   - id: 1414
//!     entries:
//!       - { item: 2447, chance: 100.0, min_count: 1, max_count: 3 }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use gather_types::{CreatureEntry, ItemEntry, LockId, LootTableId, SpellId};
use serde::Deserialize;

use crate::creature::CreatureTemplate;
use crate::error::DataError;
use crate::lock::{LockEntry, MAX_LOCK_CASE};
use crate::loot::LootTemplate;

/// Read access to the static game data tables.
///
/// Implementations must be deterministic for a given data revision: the
/// scan engine may call any lookup several times within one pass.
pub trait StaticData {
    /// Look up a lock/requirement descriptor.
    fn lock_entry(&self, id: LockId) -> Option<&LockEntry>;

    /// Look up a loot template.
    fn loot_template(&self, id: LootTableId) -> Option<&LootTemplate>;

    /// Look up an item template.
    fn item_template(&self, entry: ItemEntry) -> Option<&ItemTemplate>;

    /// Look up a spell's effect metadata.
    fn spell(&self, id: SpellId) -> Option<&SpellEntry>;

    /// Look up a creature template.
    fn creature_template(&self, entry: CreatureEntry) -> Option<&CreatureTemplate>;
}

/// An item template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemTemplate {
    /// Item entry.
    pub entry: ItemEntry,
    /// Display name.
    pub name: String,
    /// Maximum stack size in one bag slot.
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

/// One spell effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct SpellEffect {
    /// Effect-specific value; for tracking spells, the 1-based bit index.
    #[serde(default)]
    pub misc_value: i32,
}

/// Spell metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpellEntry {
    /// Spell identifier.
    pub id: SpellId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Effects in slot order.
    #[serde(default)]
    pub effects: Vec<SpellEffect>,
}

impl SpellEntry {
    /// The effect in slot 0, if the spell has any.
    pub fn first_effect(&self) -> Option<&SpellEffect> {
        self.effects.first()
    }
}

/// On-disk layout of the static data document.
#[derive(Debug, Default, Deserialize)]
struct RawStaticData {
    #[serde(default)]
    items: Vec<ItemTemplate>,
    #[serde(default)]
    locks: Vec<LockEntry>,
    #[serde(default)]
    spells: Vec<SpellEntry>,
    #[serde(default)]
    creatures: Vec<CreatureTemplate>,
    #[serde(default)]
    loot: Vec<LootTemplate>,
}

/// In-memory static data tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticDataStore {
    items: BTreeMap<ItemEntry, ItemTemplate>,
    locks: BTreeMap<LockId, LockEntry>,
    spells: BTreeMap<SpellId, SpellEntry>,
    creatures: BTreeMap<CreatureEntry, CreatureTemplate>,
    loot: BTreeMap<LootTableId, LootTemplate>,
}

impl StaticDataStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            locks: BTreeMap::new(),
            spells: BTreeMap::new(),
            creatures: BTreeMap::new(),
            loot: BTreeMap::new(),
        }
    }

    /// Load and validate a YAML data file.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Io`] if the file cannot be read, [`DataError::Yaml`]
    /// if it does not parse, or a validation error for malformed records.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a YAML data document.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Yaml`] if the string is not valid, or a
    /// validation error for malformed records.
    pub fn parse(yaml: &str) -> Result<Self, DataError> {
        let raw: RawStaticData = if yaml.trim().is_empty() {
            RawStaticData::default()
        } else {
            serde_yml::from_str(yaml)?
        };

        let mut store = Self::new();
        for item in raw.items {
            store.insert_item(item);
        }
        for lock in raw.locks {
            store.insert_lock(lock)?;
        }
        for spell in raw.spells {
            store.insert_spell(spell);
        }
        for creature in raw.creatures {
            store.insert_creature(creature);
        }
        for template in raw.loot {
            store.insert_loot(template)?;
        }
        Ok(store)
    }

    /// Add or replace an item template.
    pub fn insert_item(&mut self, item: ItemTemplate) {
        self.items.insert(item.entry, item);
    }

    /// Add or replace a lock.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::TooManyLockCases`] if the lock has more than
    /// [`MAX_LOCK_CASE`] cases.
    pub fn insert_lock(&mut self, lock: LockEntry) -> Result<(), DataError> {
        if lock.cases.len() > MAX_LOCK_CASE {
            return Err(DataError::TooManyLockCases {
                lock: lock.id,
                count: lock.cases.len(),
                max: MAX_LOCK_CASE,
            });
        }
        self.locks.insert(lock.id, lock);
        Ok(())
    }

    /// Add or replace a spell.
    pub fn insert_spell(&mut self, spell: SpellEntry) {
        self.spells.insert(spell.id, spell);
    }

    /// Remove a spell, returning it if present.
    pub fn remove_spell(&mut self, id: SpellId) -> Option<SpellEntry> {
        self.spells.remove(&id)
    }

    /// Add or replace a creature template.
    pub fn insert_creature(&mut self, creature: CreatureTemplate) {
        self.creatures.insert(creature.entry, creature);
    }

    /// Add or replace a loot template.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MalformedLoot`] if the template fails validation.
    pub fn insert_loot(&mut self, template: LootTemplate) -> Result<(), DataError> {
        template.validate()?;
        self.loot.insert(template.id, template);
        Ok(())
    }

    /// Number of records per table: items, locks, spells, creatures, loot.
    pub fn counts(&self) -> [usize; 5] {
        [
            self.items.len(),
            self.locks.len(),
            self.spells.len(),
            self.creatures.len(),
            self.loot.len(),
        ]
    }
}

impl StaticData for StaticDataStore {
    fn lock_entry(&self, id: LockId) -> Option<&LockEntry> {
        self.locks.get(&id)
    }

    fn loot_template(&self, id: LootTableId) -> Option<&LootTemplate> {
        self.loot.get(&id)
    }

    fn item_template(&self, entry: ItemEntry) -> Option<&ItemTemplate> {
        self.items.get(&entry)
    }

    fn spell(&self, id: SpellId) -> Option<&SpellEntry> {
        self.spells.get(&id)
    }

    fn creature_template(&self, entry: CreatureEntry) -> Option<&CreatureTemplate> {
        self.creatures.get(&entry)
    }
}

const fn default_max_stack() -> u32 {
    1
}
