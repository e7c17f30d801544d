//! Scan scheduling, eligibility, and loot transactions for auto-gather.
//!
//! This crate is the decision engine: on every simulation step it counts
//! each avatar's scan countdown down, and when the countdown runs out it
//! gates, synchronizes minimap tracking, picks at most one node and one
//! corpse, and harvests them atomically. The host supplies entities
//! through the [`World`] trait and drives the engine through
//! [`SessionHooks`].
//!
//! # Modules
//!
//! - [`config`] -- Configuration snapshot and YAML loader ([`GatherSettings`])
//! - [`eligibility`] -- Node and corpse eligibility predicates
//! - [`error`] -- Error types for engine operations ([`GatherError`])
//! - [`hooks`] -- Lifecycle callbacks the host drives ([`SessionHooks`])
//! - [`region`] -- In-memory [`World`] with respawn and decay ([`Region`])
//! - [`scheduler`] -- Per-avatar countdown and scan pass ([`AutoGather`])
//! - [`tracking`] -- Minimap tracking flag synchronization
//! - [`transaction`] -- Atomic harvest and skin ([`LootTransaction`])
//! - [`world`] -- The host access seam ([`World`])

pub mod config;
pub mod eligibility;
pub mod error;
pub mod hooks;
pub mod region;
pub mod scheduler;
pub mod tracking;
pub mod transaction;
pub mod world;

pub use config::{
    ConfigError, CorpseConfig, GatherConfig, GatherSettings, LoggingConfig, SimulationConfig,
};
pub use eligibility::{corpse_requirement, corpse_skill_threshold, evaluate_corpse, evaluate_node};
pub use error::GatherError;
pub use hooks::SessionHooks;
pub use region::{Region, RegionEvents};
pub use scheduler::{ANNOUNCE_MESSAGE, AutoGather, ScanReport, ScanSkip};
pub use tracking::{TrackingChange, sync_tracking};
pub use transaction::{ELITE_SKILLUP_MULTIPLIER, LootTransaction};
pub use world::World;
