//! Type-safe identifier wrappers.
//!
//! Live world entities (avatars, resource nodes, corpses) carry UUID v7
//! identifiers so that the compiler refuses to mix them up. Static game data
//! records (locks, loot tables, spells, items, creature templates) are keyed
//! by the numeric entry codes used in the data files, wrapped the same way.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around a numeric static data entry code.
macro_rules! define_entry {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Return the raw entry code.
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(code: u32) -> Self {
                Self(code)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player-controlled avatar.
    AvatarId
}

define_id! {
    /// Unique identifier for a spawned resource node (herb, ore vein).
    NodeId
}

define_id! {
    /// Unique identifier for a creature (alive or as a corpse).
    CorpseId
}

define_entry! {
    /// Key into the lock/requirement table.
    LockId
}

define_entry! {
    /// Key into the loot template tables.
    LootTableId
}

define_entry! {
    /// Key into the spell table (effect metadata).
    SpellId
}

define_entry! {
    /// Item template entry.
    ItemEntry
}

define_entry! {
    /// Creature template entry.
    CreatureEntry
}

define_entry! {
    /// Map (continent or instance) identifier.
    MapId
}
