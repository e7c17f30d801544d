//! Eligibility predicates for nodes and corpses.
//!
//! Both evaluators are pure: they read the entity, the avatar, and static
//! data, and never mutate anything. The scan pass calls them on a snapshot;
//! [`LootTransaction`](crate::transaction::LootTransaction) calls them again
//! at execution time to catch state that changed in between.

use gather_agents::Avatar;
use gather_data::StaticData;
use gather_types::{Corpse, GameObjectType, ResourceNode, SkillRequirement};

/// Resolve the skill an avatar would use to harvest `node`.
///
/// The node must be a spawned, ready chest-type object within `range`. The
/// lock's cases are walked in declared order and the first skill case the
/// avatar meets is returned. Returns `None` when the node has no lock, the
/// lock is unknown, or no case matches.
pub fn evaluate_node<D: StaticData + ?Sized>(
    data: &D,
    node: &ResourceNode,
    avatar: &Avatar,
    range: f32,
) -> Option<SkillRequirement> {
    if node.kind != GameObjectType::Chest || !node.is_ready() {
        return None;
    }
    if !avatar.position.is_within(&node.position, range) {
        return None;
    }
    let lock = data.lock_entry(node.lock?)?;
    lock.gather_requirements()
        .find(|&(skill, required)| {
            let value = avatar.skills.value(skill);
            value > 0 && value >= required
        })
        .map(|(skill, required)| SkillRequirement { skill, required })
}

/// Skill needed to skin a creature of `level`.
pub const fn corpse_skill_threshold(level: u32) -> u32 {
    if level < 10 {
        0
    } else if level < 20 {
        level.saturating_sub(10).saturating_mul(10)
    } else {
        level.saturating_mul(5)
    }
}

/// The skill pairing used when skinning `corpse`.
pub const fn corpse_requirement(corpse: &Corpse) -> SkillRequirement {
    SkillRequirement {
        skill: corpse.required_skill,
        required: corpse_skill_threshold(corpse.level),
    }
}

/// Whether `avatar` can skin `corpse` right now.
///
/// The creature must be dead, flagged skinnable, within `range`, and have a
/// skin loot template. The avatar must hold the required skill at or above
/// the level threshold. Regular loot must be gone unless the creature is a
/// critter.
pub fn evaluate_corpse(corpse: &Corpse, avatar: &Avatar, range: f32) -> bool {
    if !corpse.is_dead() || !corpse.is_skinnable() || corpse.skin_loot.is_none() {
        return false;
    }
    if !avatar.position.is_within(&corpse.position, range) {
        return false;
    }
    let requirement = corpse_requirement(corpse);
    let value = avatar.skills.value(requirement.skill);
    if value == 0 || value < requirement.required {
        return false;
    }
    corpse.is_exempt_from_loot_rule() || corpse.regular_loot_emptied()
}
