//! Shared type definitions for the auto-gather scan engine.
//!
//! This crate is the single source of truth for the data model that flows
//! between the static data layer, avatar sessions, and the scan engine.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers for live entities and static data entries
//! - [`enums`] -- Skills, resource categories, lock types, entity lifecycles
//! - [`structs`] -- Positions, loot bundles, resource nodes, corpses,
//!   tracking flags, scan state, and notifications

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{
    CorpseState, CreatureRank, CreatureType, GameObjectType, LockKeyType, LockType, NodeState,
    ResourceCategory, SkillType, TransactionOutcome,
};
pub use ids::{AvatarId, CorpseId, CreatureEntry, ItemEntry, LockId, LootTableId, MapId, NodeId, SpellId};
pub use structs::{
    Corpse, ItemStack, LootBundle, Notification, NotificationKind, PlayerScanState, Position,
    ResourceNode, SkillRequirement, TrackingFlags,
};
