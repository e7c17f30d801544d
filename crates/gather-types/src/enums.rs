//! Enumeration types shared across the auto-gather workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Skills and resource categories
// ---------------------------------------------------------------------------

/// A profession skill that the scan engine knows how to exercise.
///
/// Engineering is only listed because some mechanical creatures are
/// salvaged with it instead of skinning; the engine never scans for it
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    /// Picking herbs from herb nodes.
    Herbalism,
    /// Extracting ore and stone from mineral veins.
    Mining,
    /// Harvesting hides and scales from creature corpses.
    Skinning,
    /// Salvaging parts from mechanical corpses.
    Engineering,
}

impl SkillType {
    /// The three gathering professions that enable a scan pass.
    pub const GATHERING: [Self; 3] = [Self::Herbalism, Self::Mining, Self::Skinning];

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Herbalism => "Herbalism",
            Self::Mining => "Mining",
            Self::Skinning => "Skinning",
            Self::Engineering => "Engineering",
        }
    }
}

impl core::fmt::Display for SkillType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A resource category that has a minimap tracking bit.
///
/// Skinning has no tracking spell, so it has no category here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    /// Herb nodes, tracked by Find Herbs.
    Herb,
    /// Mineral veins, tracked by Find Minerals.
    Mineral,
}

impl ResourceCategory {
    /// Every category, in resolution order.
    pub const ALL: [Self; 2] = [Self::Herb, Self::Mineral];

    /// The skill whose possession enables tracking of this category.
    pub const fn tracking_skill(self) -> SkillType {
        match self {
            Self::Herb => SkillType::Herbalism,
            Self::Mineral => SkillType::Mining,
        }
    }
}

// ---------------------------------------------------------------------------
// Lock data
// ---------------------------------------------------------------------------

/// What kind of key a lock case expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockKeyType {
    /// Unused case slot.
    #[default]
    None,
    /// Opened by carrying a specific item.
    Item,
    /// Opened by a skill at or above a threshold.
    Skill,
}

/// The lock type referenced by a skill-keyed lock case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockType {
    /// Picked with lockpicking.
    Lockpicking,
    /// Gathered with herbalism.
    Herbalism,
    /// Gathered with mining.
    Mining,
    /// Disarmed traps.
    DisarmTrap,
    /// Plain "open" interaction.
    Open,
    /// Fishing pools.
    Fishing,
    /// Inscription materials.
    Inscription,
}

impl LockType {
    /// The gathering skill this lock type is opened with, if any.
    ///
    /// Only herbalism and mining locks are harvestable by the scan engine.
    pub const fn gather_skill(self) -> Option<SkillType> {
        match self {
            Self::Herbalism => Some(SkillType::Herbalism),
            Self::Mining => Some(SkillType::Mining),
            Self::Lockpicking | Self::DisarmTrap | Self::Open | Self::Fishing | Self::Inscription => {
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// World entities
// ---------------------------------------------------------------------------

/// Game object type of a world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameObjectType {
    /// Lootable container; herbs and ore veins are chests.
    Chest,
    /// Doors and gates.
    Door,
    /// Buttons and levers.
    Button,
    /// Fishing pools.
    FishingHole,
    /// Anything else.
    Generic,
}

/// Loot lifecycle of a resource node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Harvestable.
    #[default]
    Ready,
    /// Harvested, waiting for the host to respawn it.
    Deactivated,
}

/// Lifecycle of a creature as seen by the skinning path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpseState {
    /// Still alive.
    #[default]
    Alive,
    /// Dead with regular loot still present.
    DeadLootable,
    /// Dead with the skinnable flag set.
    DeadSkinnable,
    /// Skinned; the corpse is decaying.
    Skinned,
}

/// Creature classification rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureRank {
    /// Ordinary creature.
    #[default]
    Normal,
    /// Elite creature.
    Elite,
    /// Rare elite creature.
    RareElite,
    /// Dungeon or raid boss.
    Boss,
    /// Rare (non-elite) creature.
    Rare,
}

impl CreatureRank {
    /// Whether the rank counts as elite for skill-up multipliers.
    pub const fn is_elite(self) -> bool {
        matches!(self, Self::Elite | Self::RareElite | Self::Boss)
    }
}

/// Creature family type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureType {
    /// Animals.
    #[default]
    Beast,
    /// Dragons and whelps.
    Dragonkin,
    /// Humanoids.
    Humanoid,
    /// Elementals.
    Elemental,
    /// Giants.
    Giant,
    /// Undead.
    Undead,
    /// Mechanical constructs.
    Mechanical,
    /// Harmless ambient wildlife; exempt from the regular-loot rule.
    Critter,
}

// ---------------------------------------------------------------------------
// Transaction results
// ---------------------------------------------------------------------------

/// Result of one loot transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionOutcome {
    /// Loot committed, skill credited if due, entity transitioned.
    Success,
    /// At least one stack did not fit; nothing changed.
    BagFull,
    /// The entity or avatar no longer qualifies; nothing changed.
    StaleState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_gather_locks_map_to_skills() {
        assert_eq!(LockType::Herbalism.gather_skill(), Some(SkillType::Herbalism));
        assert_eq!(LockType::Mining.gather_skill(), Some(SkillType::Mining));
        assert_eq!(LockType::Lockpicking.gather_skill(), None);
        assert_eq!(LockType::Fishing.gather_skill(), None);
    }

    #[test]
    fn elite_ranks() {
        assert!(CreatureRank::Elite.is_elite());
        assert!(CreatureRank::Boss.is_elite());
        assert!(!CreatureRank::Rare.is_elite());
        assert!(!CreatureRank::Normal.is_elite());
    }

    #[test]
    fn categories_track_gather_skills() {
        assert_eq!(ResourceCategory::Herb.tracking_skill(), SkillType::Herbalism);
        assert_eq!(ResourceCategory::Mineral.tracking_skill(), SkillType::Mining);
    }

    #[test]
    fn enums_use_snake_case_yaml() {
        let parsed: Result<CreatureType, _> = serde_yml::from_str("critter");
        assert_eq!(parsed.ok(), Some(CreatureType::Critter));
        let parsed: Result<LockType, _> = serde_yml::from_str("disarm_trap");
        assert_eq!(parsed.ok(), Some(LockType::DisarmTrap));
    }
}
