//! Error types for the `gather-data` crate.

use gather_types::{LockId, LootTableId, SpellId};

/// Errors raised while loading or resolving static data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Failed to read a data file from disk.
    #[error("failed to read static data file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse static data YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A lock entry declares more cases than the lock format allows.
    #[error("lock {lock} has {count} cases (max {max})")]
    TooManyLockCases {
        /// Offending lock.
        lock: LockId,
        /// Number of declared cases.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },

    /// A loot entry has an inverted count or money range, or a negative chance.
    #[error("loot template {table} is malformed: {reason}")]
    MalformedLoot {
        /// Offending table.
        table: LootTableId,
        /// What is wrong with it.
        reason: String,
    },

    /// A tracking spell is absent from the spell table.
    #[error("spell {0} not found")]
    SpellNotFound(SpellId),

    /// A tracking spell's effect misc value cannot be turned into a bit.
    #[error("spell {spell} has unusable tracking misc value {misc_value}")]
    InvalidTrackingValue {
        /// The tracking spell.
        spell: SpellId,
        /// The offending misc value.
        misc_value: i32,
    },
}

impl From<serde_yml::Error> for DataError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
