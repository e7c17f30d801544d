//! Creature templates: the static half of a corpse.

use std::collections::BTreeSet;

use gather_types::{
    Corpse, CorpseId, CorpseState, CreatureEntry, CreatureRank, CreatureType, LootBundle,
    LootTableId, Position, SkillType,
};
use serde::Deserialize;

/// Type flags that change which skill skins a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct CreatureTypeFlags {
    /// Harvested with herbalism (plant creatures).
    #[serde(default)]
    pub skin_with_herbalism: bool,
    /// Harvested with mining (rock elementals).
    #[serde(default)]
    pub skin_with_mining: bool,
    /// Salvaged with engineering (mechanicals).
    #[serde(default)]
    pub skin_with_engineering: bool,
}

/// A creature template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatureTemplate {
    /// Template entry.
    pub entry: CreatureEntry,
    /// Display name.
    pub name: String,
    /// Family type.
    #[serde(default)]
    pub creature_type: CreatureType,
    /// Rank.
    #[serde(default)]
    pub rank: CreatureRank,
    /// Skinning loot template.
    #[serde(default)]
    pub skin_loot: Option<LootTableId>,
    /// Skill-selection flags.
    #[serde(default)]
    pub type_flags: CreatureTypeFlags,
}

impl CreatureTemplate {
    /// The skill needed to skin this creature.
    pub const fn required_loot_skill(&self) -> SkillType {
        if self.type_flags.skin_with_herbalism {
            SkillType::Herbalism
        } else if self.type_flags.skin_with_mining {
            SkillType::Mining
        } else if self.type_flags.skin_with_engineering {
            SkillType::Engineering
        } else {
            SkillType::Skinning
        }
    }

    /// Instantiate a living creature of this template.
    pub fn spawn(&self, position: Position, phase_mask: u32, level: u32) -> Corpse {
        Corpse {
            id: CorpseId::new(),
            entry: self.entry,
            position,
            phase_mask,
            level,
            state: CorpseState::Alive,
            rank: self.rank,
            creature_type: self.creature_type,
            required_skill: self.required_loot_skill(),
            skin_loot: self.skin_loot,
            regular_loot: LootBundle::empty(),
            skillup_credited: BTreeSet::new(),
            decay_remaining_ms: None,
        }
    }
}
