//! Atomic harvest and skin transactions.
//!
//! A transaction runs in four steps, all on the region thread:
//!
//! 1. **Re-validate.** The target and avatar are checked again; anything
//!    that changed since the scan snapshot yields
//!    [`TransactionOutcome::StaleState`] with no mutation.
//! 2. **Plan.** The loot bundle is generated and every stack (and the
//!    coins) is placed on a scratch copy of the bags. If anything does not
//!    fit the result is [`TransactionOutcome::BagFull`] and nothing changes.
//! 3. **Commit.** The planned bags and coins are applied, the client is
//!    notified, and the skill-up is rolled once per avatar per target.
//! 4. **Transition.** Nodes deactivate; corpses are marked skinned and
//!    start to decay.

use gather_agents::{AgentError, Avatar, SkillGainRates, update_gather_skill};
use gather_data::{StaticData, fill_loot};
use gather_types::{
    AvatarId, CorpseId, LootBundle, NodeId, NotificationKind, SkillRequirement, TransactionOutcome,
};
use rand::Rng;
use tracing::{debug, info};

use crate::eligibility::{corpse_requirement, evaluate_corpse, evaluate_node};
use crate::error::GatherError;
use crate::world::World;

/// Skill-up chance multiplier for elite skinning targets.
pub const ELITE_SKILLUP_MULTIPLIER: u32 = 2;

/// Executes loot transactions against one configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LootTransaction<'a, D: StaticData + ?Sized> {
    data: &'a D,
    rates: &'a SkillGainRates,
    range: f32,
    corpse_decay_ms: u32,
}

impl<'a, D: StaticData + ?Sized> LootTransaction<'a, D> {
    /// Bind static data and the settings in effect for this pass.
    pub const fn new(
        data: &'a D,
        rates: &'a SkillGainRates,
        range: f32,
        corpse_decay_ms: u32,
    ) -> Self {
        Self {
            data,
            rates,
            range,
            corpse_decay_ms,
        }
    }

    /// Harvest `node` for `avatar` using the requirement found at scan time.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::Agent`] only if committing an accepted plan
    /// fails, which means an internal invariant broke.
    pub fn harvest_node<W: World + ?Sized>(
        &self,
        world: &mut W,
        avatar_id: AvatarId,
        node_id: NodeId,
        requirement: SkillRequirement,
        rng: &mut impl Rng,
    ) -> Result<TransactionOutcome, GatherError> {
        let Some((node, avatar)) = world.node_and_avatar_mut(node_id, avatar_id) else {
            debug!(avatar = %avatar_id, node = %node_id, "harvest target vanished");
            return Ok(TransactionOutcome::StaleState);
        };

        let still_valid = can_act(avatar)
            && avatar.shares_phase(node.phase_mask)
            && evaluate_node(self.data, node, avatar, self.range) == Some(requirement);
        if !still_valid {
            debug!(avatar = %avatar_id, node = %node_id, "harvest target changed since scan");
            return Ok(TransactionOutcome::StaleState);
        }

        let bundle = fill_loot(self.data, node.loot, rng);
        if !self.deliver(avatar, &bundle)? {
            debug!(avatar = %avatar_id, node = %node_id, "harvest aborted, bags full");
            return Ok(TransactionOutcome::BagFull);
        }

        if node.record_credit(avatar.id) {
            self.grant_skill(avatar, requirement, 1, rng)?;
        }
        node.deactivate();

        info!(
            avatar = %avatar_id,
            node = %node_id,
            name = %node.name,
            skill = %requirement.skill,
            stacks = bundle.items.len(),
            money = bundle.money,
            "node harvested"
        );
        Ok(TransactionOutcome::Success)
    }

    /// Skin `corpse` for `avatar`.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::Agent`] only if committing an accepted plan
    /// fails, which means an internal invariant broke.
    pub fn skin_corpse<W: World + ?Sized>(
        &self,
        world: &mut W,
        avatar_id: AvatarId,
        corpse_id: CorpseId,
        rng: &mut impl Rng,
    ) -> Result<TransactionOutcome, GatherError> {
        let Some((corpse, avatar)) = world.corpse_and_avatar_mut(corpse_id, avatar_id) else {
            debug!(avatar = %avatar_id, corpse = %corpse_id, "skin target vanished");
            return Ok(TransactionOutcome::StaleState);
        };

        let still_valid = can_act(avatar)
            && avatar.shares_phase(corpse.phase_mask)
            && evaluate_corpse(corpse, avatar, self.range);
        if !still_valid {
            debug!(avatar = %avatar_id, corpse = %corpse_id, "skin target changed since scan");
            return Ok(TransactionOutcome::StaleState);
        }

        let requirement = corpse_requirement(corpse);
        let bundle = fill_loot(self.data, corpse.skin_loot, rng);
        if !self.deliver(avatar, &bundle)? {
            debug!(avatar = %avatar_id, corpse = %corpse_id, "skin aborted, bags full");
            return Ok(TransactionOutcome::BagFull);
        }

        if corpse.record_credit(avatar.id) {
            let multiplier = if corpse.rank.is_elite() {
                ELITE_SKILLUP_MULTIPLIER
            } else {
                1
            };
            self.grant_skill(avatar, requirement, multiplier, rng)?;
        }
        corpse.mark_skinned(self.corpse_decay_ms);

        info!(
            avatar = %avatar_id,
            corpse = %corpse_id,
            entry = %corpse.entry,
            skill = %requirement.skill,
            stacks = bundle.items.len(),
            "corpse skinned"
        );
        Ok(TransactionOutcome::Success)
    }

    /// Plan and commit `bundle`. Returns `false` if it does not fit.
    fn deliver(&self, avatar: &mut Avatar, bundle: &LootBundle) -> Result<bool, GatherError> {
        let data = self.data;
        let plan = match avatar.plan_loot(bundle, |item| data.item_template(item).map(|t| t.max_stack)) {
            Ok(plan) => plan,
            Err(
                AgentError::BagFull { .. }
                | AgentError::UnknownItem(_)
                | AgentError::MoneyCapExceeded { .. },
            ) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        avatar.commit_loot(plan, bundle)?;
        Ok(true)
    }

    fn grant_skill(
        &self,
        avatar: &mut Avatar,
        requirement: SkillRequirement,
        multiplier: u32,
        rng: &mut impl Rng,
    ) -> Result<(), GatherError> {
        let pure = avatar.skills.pure_value(requirement.skill);
        if pure == 0 {
            return Ok(());
        }
        let raised = update_gather_skill(
            &mut avatar.skills,
            self.rates,
            requirement.skill,
            pure,
            requirement.required,
            multiplier,
            rng,
        )?;
        if let Some(value) = raised {
            avatar.notify(NotificationKind::SkillRaised {
                skill: requirement.skill,
                value,
            });
            info!(avatar = %avatar.id, skill = %requirement.skill, value, "skill raised");
        }
        Ok(())
    }
}

/// Whether the avatar can still receive loot.
const fn can_act(avatar: &Avatar) -> bool {
    avatar.in_world && avatar.conditions.alive
}
