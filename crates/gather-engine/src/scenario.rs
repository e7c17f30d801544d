//! Scripted region for the harness.
//!
//! The harness has no host server, so it builds a [`Region`] from the
//! `scenario:` section of `autogather-config.yaml`: avatars with their
//! skills, gathering nodes, and creatures that are already dead. A creature
//! can carry regular loot that a scripted player takes at a given tick,
//! which is what makes it skinnable.

use std::collections::BTreeSet;
use std::path::Path;

use gather_agents::Avatar;
use gather_core::Region;
use gather_data::{StaticData, fill_loot};
use gather_types::{
    AvatarId, CorpseId, CreatureEntry, GameObjectType, LockId, LootTableId, MapId, NodeId,
    NodeState, Position, ResourceNode, SkillType,
};
use rand::Rng;
use serde::Deserialize;
use tracing::info;

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// The `scenario:` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    /// Players to log in.
    #[serde(default = "default_avatars")]
    pub avatars: Vec<AvatarSpec>,

    /// Gathering nodes.
    #[serde(default = "default_nodes")]
    pub nodes: Vec<NodeSpec>,

    /// Creatures, spawned dead.
    #[serde(default = "default_creatures")]
    pub creatures: Vec<CreatureSpec>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            avatars: default_avatars(),
            nodes: default_nodes(),
            creatures: default_creatures(),
        }
    }
}

/// One player.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AvatarSpec {
    /// Character name.
    pub name: String,
    /// Where the player stands.
    #[serde(default = "origin")]
    pub position: Position,
    /// Number of bag slots.
    #[serde(default = "default_bag_slots")]
    pub bag_slots: usize,
    /// Learned skills.
    #[serde(default)]
    pub skills: Vec<SkillSpec>,
}

/// One learned skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SkillSpec {
    /// Which skill.
    pub skill: SkillType,
    /// Pure value.
    pub value: u32,
    /// Cap.
    #[serde(default = "default_skill_max")]
    pub max: u32,
    /// Bonus on top of the pure value.
    #[serde(default)]
    pub bonus: u32,
}

/// One gathering node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeSpec {
    /// Display name.
    pub name: String,
    /// Lock descriptor.
    pub lock: LockId,
    /// Loot template.
    #[serde(default)]
    pub loot: Option<LootTableId>,
    /// Where the node stands.
    pub position: Position,
    /// Respawn delay after harvest.
    #[serde(default = "default_respawn_delay_ms")]
    pub respawn_delay_ms: u32,
    /// Phase bits.
    #[serde(default = "default_phase_mask")]
    pub phase_mask: u32,
}

/// One dead creature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatureSpec {
    /// Creature template.
    pub entry: CreatureEntry,
    /// Level.
    pub level: u32,
    /// Where the corpse lies.
    pub position: Position,
    /// Regular loot rolled on death.
    #[serde(default)]
    pub kill_loot: Option<LootTableId>,
    /// Tick at which a player loots the corpse by hand.
    #[serde(default)]
    pub loot_at_tick: Option<u64>,
}

// -----------------------------------------------------------------------
// Built scenario
// -----------------------------------------------------------------------

/// A region ready to run.
#[derive(Debug)]
pub struct Scenario {
    /// The region.
    pub region: Region,
    /// Logged-in players in login order.
    pub avatars: Vec<AvatarId>,
    /// Corpses a player loots by hand, with the tick it happens.
    pub manual_loots: Vec<(CorpseId, u64)>,
}

impl Scenario {
    /// Perform any manual loots scheduled for `tick`.
    pub fn apply_manual_loots(&mut self, tick: u64) -> usize {
        let mut looted = 0_usize;
        for &(corpse_id, at) in &self.manual_loots {
            if at != tick {
                continue;
            }
            if let Some(corpse) = self.region.corpse_mut(corpse_id) {
                let taken = corpse.take_regular_loot();
                info!(corpse = %corpse_id, stacks = taken.items.len(), "corpse looted by hand");
                looted = looted.saturating_add(1);
            }
        }
        looted
    }
}

/// Build the region described by `config`.
///
/// # Errors
///
/// Returns [`EngineError::Scenario`] if a creature entry has no template.
pub fn build<D: StaticData + ?Sized>(
    config: &ScenarioConfig,
    data: &D,
    rng: &mut impl Rng,
) -> Result<Scenario, EngineError> {
    let mut region = Region::new();
    let mut avatars = Vec::with_capacity(config.avatars.len());
    let mut manual_loots = Vec::new();

    for spec in &config.avatars {
        let mut avatar = Avatar::new(spec.name.clone(), spec.position, spec.bag_slots);
        for skill in &spec.skills {
            avatar.skills.learn(skill.skill, skill.value, skill.max);
            if skill.bonus > 0 {
                avatar
                    .skills
                    .set_bonus(skill.skill, skill.bonus)
                    .map_err(|e| EngineError::Scenario {
                        message: format!("avatar {}: {e}", spec.name),
                    })?;
            }
        }
        avatars.push(region.add_avatar(avatar));
    }

    for spec in &config.nodes {
        region.add_node(ResourceNode {
            id: NodeId::new(),
            name: spec.name.clone(),
            kind: GameObjectType::Chest,
            position: spec.position,
            phase_mask: spec.phase_mask,
            spawned: true,
            state: NodeState::Ready,
            lock: Some(spec.lock),
            loot: spec.loot,
            respawn_delay_ms: spec.respawn_delay_ms,
            respawn_remaining_ms: 0,
            skillup_credited: BTreeSet::new(),
        });
    }

    for spec in &config.creatures {
        let template = data
            .creature_template(spec.entry)
            .ok_or_else(|| EngineError::Scenario {
                message: format!("no creature template for entry {}", spec.entry),
            })?;
        let mut corpse = template.spawn(spec.position, default_phase_mask(), spec.level);
        corpse.die(fill_loot(data, spec.kill_loot, rng));
        if let Some(at) = spec.loot_at_tick {
            manual_loots.push((corpse.id, at));
        }
        region.add_corpse(corpse);
    }

    info!(
        avatars = avatars.len(),
        nodes = config.nodes.len(),
        creatures = config.creatures.len(),
        "scenario region built"
    );
    Ok(Scenario {
        region,
        avatars,
        manual_loots,
    })
}

/// Read the `scenario:` section of the config file.
///
/// A missing file or section yields the default scenario.
///
/// # Errors
///
/// Returns [`EngineError::Scenario`] if the file exists but the section
/// does not parse.
pub fn load_scenario(config_path: &Path) -> Result<ScenarioConfig, EngineError> {
    if !config_path.exists() {
        return Ok(ScenarioConfig::default());
    }
    let contents = std::fs::read_to_string(config_path).map_err(|e| EngineError::Scenario {
        message: format!("failed to read config file: {e}"),
    })?;
    parse_scenario(&contents)
}

/// Extract and parse the `scenario:` section from a config document.
///
/// # Errors
///
/// Returns [`EngineError::Scenario`] if the document or section does not
/// parse.
pub fn parse_scenario(contents: &str) -> Result<ScenarioConfig, EngineError> {
    if contents.trim().is_empty() {
        return Ok(ScenarioConfig::default());
    }
    let raw: serde_yml::Value = serde_yml::from_str(contents).map_err(|e| EngineError::Scenario {
        message: format!("failed to parse config YAML: {e}"),
    })?;
    raw.get("scenario").map_or_else(
        || Ok(ScenarioConfig::default()),
        |section| {
            serde_yml::from_value(section.clone()).map_err(|e| EngineError::Scenario {
                message: format!("failed to parse scenario section: {e}"),
            })
        },
    )
}

const fn origin() -> Position {
    Position::new(MapId(0), 0.0, 0.0, 0.0)
}

const fn default_bag_slots() -> usize {
    16
}

const fn default_skill_max() -> u32 {
    75
}

const fn default_respawn_delay_ms() -> u32 {
    30_000
}

const fn default_phase_mask() -> u32 {
    1
}

fn default_avatars() -> Vec<AvatarSpec> {
    let skill = |skill| SkillSpec {
        skill,
        value: 1,
        max: default_skill_max(),
        bonus: 0,
    };
    vec![AvatarSpec {
        name: String::from("Fernwise"),
        position: origin(),
        bag_slots: default_bag_slots(),
        skills: vec![
            skill(SkillType::Herbalism),
            skill(SkillType::Mining),
            skill(SkillType::Skinning),
        ],
    }]
}

fn default_nodes() -> Vec<NodeSpec> {
    let node = |name: &str, lock, loot, x| NodeSpec {
        name: String::from(name),
        lock: LockId(lock),
        loot: Some(LootTableId(loot)),
        position: Position::new(MapId(0), x, 1.0, 0.0),
        respawn_delay_ms: default_respawn_delay_ms(),
        phase_mask: default_phase_mask(),
    };
    vec![
        node("Peacebloom", 29, 1414, 3.0),
        node("Copper Vein", 38, 1505, 6.0),
        node("Silverleaf", 29, 1415, 40.0),
    ]
}

fn default_creatures() -> Vec<CreatureSpec> {
    vec![
        CreatureSpec {
            entry: CreatureEntry(2956),
            level: 5,
            position: Position::new(MapId(0), 2.0, -1.0, 0.0),
            kill_loot: Some(LootTableId(5001)),
            loot_at_tick: Some(20),
        },
        CreatureSpec {
            entry: CreatureEntry(721),
            level: 1,
            position: Position::new(MapId(0), -2.0, 0.0, 0.0),
            kill_loot: Some(LootTableId(5001)),
            loot_at_tick: None,
        },
    ]
}
