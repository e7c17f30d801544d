//! Core entity structs: positions, loot, resource nodes, corpses, and the
//! small per-avatar records the scan engine owns.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{
    CorpseState, CreatureRank, CreatureType, GameObjectType, NodeState, SkillType,
};
use crate::ids::{AvatarId, CorpseId, CreatureEntry, ItemEntry, LockId, LootTableId, MapId, NodeId};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Map the point lies on.
    pub map: MapId,
    /// East-west coordinate.
    pub x: f32,
    /// North-south coordinate.
    pub y: f32,
    /// Height.
    pub z: f32,
}

impl Position {
    /// Build a position on the given map.
    pub const fn new(map: MapId, x: f32, y: f32, z: f32) -> Self {
        Self { map, x, y, z }
    }

    /// 3D distance to `other`, or `None` if they are on different maps.
    pub fn distance(&self, other: &Self) -> Option<f32> {
        if self.map != other.map {
            return None;
        }
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        Some(dz.mul_add(dz, dx.mul_add(dx, dy * dy)).sqrt())
    }

    /// Whether `other` lies on the same map within `range` (inclusive).
    pub fn is_within(&self, other: &Self, range: f32) -> bool {
        self.distance(other).is_some_and(|d| d <= range)
    }
}

// ---------------------------------------------------------------------------
// Loot
// ---------------------------------------------------------------------------

/// A quantity of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item template entry.
    pub item: ItemEntry,
    /// Number of items.
    pub count: u32,
}

impl ItemStack {
    /// Build a stack.
    pub const fn new(item: ItemEntry, count: u32) -> Self {
        Self { item, count }
    }
}

/// The loot produced by one harvest or skin, or a corpse's regular loot.
///
/// A bundle handed to a transaction is applied completely or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootBundle {
    /// Item stacks in generation order.
    #[serde(default)]
    pub items: Vec<ItemStack>,
    /// Copper coins.
    #[serde(default)]
    pub money: u32,
}

impl LootBundle {
    /// An empty bundle.
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            money: 0,
        }
    }

    /// Whether the bundle contains neither items nor money.
    pub fn is_empty(&self) -> bool {
        self.money == 0 && self.items.iter().all(|s| s.count == 0)
    }
}

// ---------------------------------------------------------------------------
// Resource node
// ---------------------------------------------------------------------------

/// A harvestable world object (herb, ore vein).
///
/// Owned by the host world. The scan engine reads it during evaluation and
/// mutates it only inside a successful loot transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Spawn identifier.
    pub id: NodeId,
    /// Display name from the game object template.
    pub name: String,
    /// Game object type.
    pub kind: GameObjectType,
    /// Where the node stands.
    pub position: Position,
    /// Phase bits the node is visible in.
    pub phase_mask: u32,
    /// Whether the node is currently spawned.
    pub spawned: bool,
    /// Loot lifecycle state.
    pub state: NodeState,
    /// Lock/requirement descriptor.
    pub lock: Option<LockId>,
    /// Loot template the node drops.
    pub loot: Option<LootTableId>,
    /// Delay between deactivation and respawn, in milliseconds.
    pub respawn_delay_ms: u32,
    /// Time left until respawn while deactivated.
    #[serde(default)]
    pub respawn_remaining_ms: u32,
    /// Avatars already credited with a skill-up in this spawn cycle.
    #[serde(default)]
    pub skillup_credited: BTreeSet<AvatarId>,
}

impl ResourceNode {
    /// Whether the node is spawned and ready to be harvested.
    pub fn is_ready(&self) -> bool {
        self.spawned && self.state == NodeState::Ready
    }

    /// Whether `avatar` has already been credited by this node.
    pub fn has_credited(&self, avatar: AvatarId) -> bool {
        self.skillup_credited.contains(&avatar)
    }

    /// Record a skill-up credit. Returns `false` if already credited.
    pub fn record_credit(&mut self, avatar: AvatarId) -> bool {
        self.skillup_credited.insert(avatar)
    }

    /// Move the node to [`NodeState::Deactivated`] and arm its respawn timer.
    pub const fn deactivate(&mut self) {
        self.state = NodeState::Deactivated;
        self.respawn_remaining_ms = self.respawn_delay_ms;
    }

    /// Start a fresh spawn cycle: ready again, credits forgotten.
    pub fn respawn(&mut self) {
        self.state = NodeState::Ready;
        self.spawned = true;
        self.respawn_remaining_ms = 0;
        self.skillup_credited.clear();
    }
}

// ---------------------------------------------------------------------------
// Corpse
// ---------------------------------------------------------------------------

/// A creature as seen by the skinning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpse {
    /// Creature identifier.
    pub id: CorpseId,
    /// Creature template entry.
    pub entry: CreatureEntry,
    /// Where the creature lies.
    pub position: Position,
    /// Phase bits the creature is visible in.
    pub phase_mask: u32,
    /// Creature level.
    pub level: u32,
    /// Lifecycle state.
    pub state: CorpseState,
    /// Rank, used for the elite skill-up multiplier.
    pub rank: CreatureRank,
    /// Family type; critters are exempt from the regular-loot rule.
    pub creature_type: CreatureType,
    /// Skill needed to skin this creature.
    pub required_skill: SkillType,
    /// Skinning loot template.
    pub skin_loot: Option<LootTableId>,
    /// Regular (kill) loot still on the corpse.
    #[serde(default)]
    pub regular_loot: LootBundle,
    /// Avatars already credited with a skill-up from this corpse.
    #[serde(default)]
    pub skillup_credited: BTreeSet<AvatarId>,
    /// Decay countdown, started once the corpse is skinned.
    #[serde(default)]
    pub decay_remaining_ms: Option<u32>,
}

impl Corpse {
    /// Whether the creature is dead.
    pub fn is_dead(&self) -> bool {
        self.state != CorpseState::Alive
    }

    /// Whether the skinnable flag is set.
    pub fn is_skinnable(&self) -> bool {
        self.state == CorpseState::DeadSkinnable
    }

    /// Whether the creature belongs to the category exempt from the
    /// regular-loot rule.
    pub fn is_exempt_from_loot_rule(&self) -> bool {
        self.creature_type == CreatureType::Critter
    }

    /// Whether the regular loot has been fully taken.
    pub fn regular_loot_emptied(&self) -> bool {
        self.regular_loot.is_empty()
    }

    /// Kill the creature, leaving `loot` on the corpse.
    ///
    /// The skinnable flag is raised right away when there is nothing to loot
    /// (or the creature is exempt) and a skin loot template exists.
    pub fn die(&mut self, loot: LootBundle) {
        if self.state != CorpseState::Alive {
            return;
        }
        self.regular_loot = loot;
        self.state = if self.skin_loot.is_some()
            && (self.regular_loot_emptied() || self.is_exempt_from_loot_rule())
        {
            CorpseState::DeadSkinnable
        } else {
            CorpseState::DeadLootable
        };
    }

    /// Take every remaining regular loot stack (a manual loot by a player).
    ///
    /// A lootable corpse with a skin template becomes skinnable.
    pub fn take_regular_loot(&mut self) -> LootBundle {
        let taken = core::mem::take(&mut self.regular_loot);
        if self.state == CorpseState::DeadLootable && self.skin_loot.is_some() {
            self.state = CorpseState::DeadSkinnable;
        }
        taken
    }

    /// Clear the skinnable flag, mark skinned, and start decay.
    pub fn mark_skinned(&mut self, decay_ms: u32) {
        self.state = CorpseState::Skinned;
        self.regular_loot = LootBundle::empty();
        self.decay_remaining_ms = Some(decay_ms);
    }

    /// Record a skill-up credit. Returns `false` if already credited.
    pub fn record_credit(&mut self, avatar: AvatarId) -> bool {
        self.skillup_credited.insert(avatar)
    }
}

// ---------------------------------------------------------------------------
// Per-avatar records
// ---------------------------------------------------------------------------

/// Skill pairing resolved by the node evaluator (or computed for a corpse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRequirement {
    /// Skill being exercised.
    pub skill: SkillType,
    /// Threshold the skill had to meet.
    pub required: u32,
}

/// Countdown until an avatar's next scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerScanState {
    /// Milliseconds left before the next pass.
    pub remaining_ms: u32,
}

/// Minimap resource tracking bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingFlags(pub u32);

impl TrackingFlags {
    /// Whether every bit in `bit` is set. A zero bit is never "set".
    pub const fn has(self, bit: u32) -> bool {
        bit != 0 && self.0 & bit == bit
    }

    /// Set `bit`.
    pub const fn set(&mut self, bit: u32) {
        self.0 |= bit;
    }

    /// Clear `bit`.
    pub const fn clear(&mut self, bit: u32) {
        self.0 &= !bit;
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// What a notification says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    /// System chat line.
    System {
        /// Message text.
        text: String,
    },
    /// An item was pushed into the bags.
    ItemReceived {
        /// Item template entry.
        item: ItemEntry,
        /// Number received.
        count: u32,
    },
    /// Coins were looted.
    MoneyLooted {
        /// Copper received.
        amount: u32,
    },
    /// A skill value went up.
    SkillRaised {
        /// Skill that increased.
        skill: SkillType,
        /// New pure value.
        value: u32,
    },
}

/// A message queued for delivery to an avatar's client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// When the notification was produced.
    pub sent_at: DateTime<Utc>,
    /// Payload.
    pub kind: NotificationKind,
}

impl Notification {
    /// Stamp `kind` with the current time.
    pub fn now(kind: NotificationKind) -> Self {
        Self {
            sent_at: Utc::now(),
            kind,
        }
    }
}
