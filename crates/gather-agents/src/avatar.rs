//! Avatar session state as seen by the scan engine.
//!
//! An [`Avatar`] bundles everything the scan engine reads or writes for one
//! logged-in player: position and phase, gating conditions, skills, bags,
//! wallet, tracking flags, the lazily created scan countdown, and an outbox
//! of client notifications.
//!
//! Loot delivery is two-phase. [`Avatar::plan_loot`] checks that a whole
//! bundle fits (bags and wallet) without touching anything;
//! [`Avatar::commit_loot`] applies it and queues the notifications.

use gather_types::{
    AvatarId, ItemEntry, LootBundle, Notification, NotificationKind, PlayerScanState, Position,
    TrackingFlags,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AgentError;
use crate::inventory::{Bags, StorePlan, add_money, can_add_money, MAX_MONEY};
use crate::skills::SkillBook;

/// How the avatar's current cast completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastKind {
    /// Completes immediately.
    Instant,
    /// Has a cast bar.
    Timed,
}

/// Transient state that can block an auto-gather pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    /// Alive (not dead or a ghost).
    pub alive: bool,
    /// In combat.
    #[serde(default)]
    pub in_combat: bool,
    /// Flying.
    #[serde(default)]
    pub flying: bool,
    /// On a taxi flight.
    #[serde(default)]
    pub in_taxi_flight: bool,
    /// Riding a vehicle.
    #[serde(default)]
    pub on_vehicle: bool,
    /// Mounted.
    #[serde(default)]
    pub mounted: bool,
    /// Spell currently being cast.
    #[serde(default)]
    pub casting: Option<CastKind>,
    /// Stunned.
    #[serde(default)]
    pub stunned: bool,
    /// Confused.
    #[serde(default)]
    pub confused: bool,
    /// Fleeing.
    #[serde(default)]
    pub fleeing: bool,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            alive: true,
            in_combat: false,
            flying: false,
            in_taxi_flight: false,
            on_vehicle: false,
            mounted: false,
            casting: None,
            stunned: false,
            confused: false,
            fleeing: false,
        }
    }
}

/// A loot bundle that has been checked against an avatar's bags and wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootPlan {
    store: StorePlan,
    money: u32,
}

/// One player's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Session identifier.
    pub id: AvatarId,
    /// Character name.
    pub name: String,
    /// Current position.
    pub position: Position,
    /// Phase bits the avatar sees.
    pub phase_mask: u32,
    /// Whether the avatar is in the world (not loading or logging out).
    pub in_world: bool,
    /// Gating conditions.
    #[serde(default)]
    pub conditions: Conditions,
    /// Profession skills.
    #[serde(default)]
    pub skills: SkillBook,
    /// Bag storage.
    pub bags: Bags,
    /// Copper held.
    #[serde(default)]
    pub money: u32,
    /// Minimap tracking mask.
    #[serde(default)]
    pub tracking: TrackingFlags,
    /// Scan countdown, created on the first tick.
    #[serde(default)]
    pub scan_state: Option<PlayerScanState>,
    /// Notifications waiting to be sent to the client.
    #[serde(skip)]
    pub outbox: Vec<Notification>,
}

impl Avatar {
    /// A living, in-world avatar with no skills and `bag_slots` empty slots.
    pub fn new(name: impl Into<String>, position: Position, bag_slots: usize) -> Self {
        Self {
            id: AvatarId::new(),
            name: name.into(),
            position,
            phase_mask: 1,
            in_world: true,
            conditions: Conditions::default(),
            skills: SkillBook::new(),
            bags: Bags::with_slots(bag_slots),
            money: 0,
            tracking: TrackingFlags::default(),
            scan_state: None,
            outbox: Vec::new(),
        }
    }

    /// Whether the avatar shares at least one phase bit with `phase_mask`.
    pub const fn shares_phase(&self, phase_mask: u32) -> bool {
        self.phase_mask & phase_mask != 0
    }

    /// Whether a spell with a cast bar is in progress.
    pub fn is_casting_non_instant(&self) -> bool {
        self.conditions.casting == Some(CastKind::Timed)
    }

    /// Whether the avatar is stunned, confused, or fleeing.
    pub const fn is_incapacitated(&self) -> bool {
        self.conditions.stunned || self.conditions.confused || self.conditions.fleeing
    }

    /// Queue a notification for the client.
    pub fn notify(&mut self, kind: NotificationKind) {
        self.outbox.push(Notification::now(kind));
    }

    /// Take every queued notification.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        core::mem::take(&mut self.outbox)
    }

    /// Check that the whole bundle fits.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::BagFull`] or [`AgentError::UnknownItem`] if the
    /// items cannot all be placed, and [`AgentError::MoneyCapExceeded`] if
    /// the coins would pass the wallet cap.
    pub fn plan_loot<F>(&self, bundle: &LootBundle, max_stack: F) -> Result<LootPlan, AgentError>
    where
        F: Fn(ItemEntry) -> Option<u32>,
    {
        let store = self.bags.plan_store(&bundle.items, max_stack)?;
        if !can_add_money(self.money, bundle.money) {
            return Err(AgentError::MoneyCapExceeded {
                current: self.money,
                amount: bundle.money,
                cap: MAX_MONEY,
            });
        }
        Ok(LootPlan {
            store,
            money: bundle.money,
        })
    }

    /// Apply a plan from [`plan_loot`](Self::plan_loot) and notify the client.
    ///
    /// `bundle` must be the bundle the plan was made for; it is only used to
    /// word the notifications.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::StalePlan`] if the bags changed since planning.
    /// Nothing is applied in that case.
    pub fn commit_loot(&mut self, plan: LootPlan, bundle: &LootBundle) -> Result<(), AgentError> {
        if !can_add_money(self.money, plan.money) {
            return Err(AgentError::MoneyCapExceeded {
                current: self.money,
                amount: plan.money,
                cap: MAX_MONEY,
            });
        }
        self.bags.apply(plan.store)?;
        add_money(&mut self.money, plan.money)?;

        for stack in bundle.items.iter().filter(|s| s.count > 0) {
            self.notify(NotificationKind::ItemReceived {
                item: stack.item,
                count: stack.count,
            });
        }
        if plan.money > 0 {
            self.notify(NotificationKind::MoneyLooted { amount: plan.money });
        }
        debug!(
            avatar = %self.id,
            stacks = bundle.items.len(),
            money = plan.money,
            "loot delivered"
        );
        Ok(())
    }
}
