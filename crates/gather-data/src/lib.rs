//! Static game data for the auto-gather scan engine.
//!
//! The scan engine treats game tables as an external collaborator reached
//! through the [`StaticData`] trait. This crate defines that seam, the
//! records it serves, a YAML-backed [`StaticDataStore`], loot generation,
//! and the tracking bit resolver.
//!
//! # Modules
//!
//! - [`creature`] -- Creature templates and the skill needed to skin them
//! - [`error`] -- Error types ([`DataError`])
//! - [`lock`] -- Lock/requirement descriptors
//! - [`loot`] -- Loot templates and bundle generation
//! - [`store`] -- The [`StaticData`] trait and [`StaticDataStore`]
//! - [`tracking`] -- Minimap tracking bit resolution ([`TrackingBits`])

pub mod creature;
pub mod error;
pub mod lock;
pub mod loot;
pub mod store;
pub mod tracking;

pub use creature::{CreatureTemplate, CreatureTypeFlags};
pub use error::DataError;
pub use lock::{LockCase, LockEntry, MAX_LOCK_CASE};
pub use loot::{LootEntry, LootTemplate, fill_loot};
pub use store::{ItemTemplate, SpellEffect, SpellEntry, StaticData, StaticDataStore};
pub use tracking::{
    FIND_HERBS, FIND_MINERALS, TrackingBits, resolve_category_bit, resolve_tracking_bits,
    tracking_spell,
};
