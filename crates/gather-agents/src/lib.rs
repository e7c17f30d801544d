//! Avatar session state for the auto-gather scan engine.
//!
//! This crate holds everything the engine reads from or writes to a player:
//! skills, bags, wallet, gating conditions, and the notification outbox. It
//! performs no I/O and knows nothing about nodes or corpses.
//!
//! # Modules
//!
//! - [`avatar`] -- The [`Avatar`] session record and two-phase loot delivery
//! - [`error`] -- Error types for avatar operations ([`AgentError`])
//! - [`inventory`] -- Slot-based bags with stack merging, and the wallet cap
//! - [`skills`] -- Skill book and the gathering skill-up roll

pub mod avatar;
pub mod error;
pub mod inventory;
pub mod skills;

pub use avatar::{Avatar, CastKind, Conditions, LootPlan};
pub use error::AgentError;
pub use inventory::{Bags, MAX_MONEY, StorePlan, add_money, can_add_money};
pub use skills::{SkillBook, SkillEntry, SkillGainRates, update_gather_skill};
