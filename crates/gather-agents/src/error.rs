//! Error types for the gather-agents crate.
//!
//! Every bag, wallet, and skill operation that can fail returns a typed
//! error rather than panicking.

use gather_types::{ItemEntry, SkillType};

/// Errors that can occur during avatar state operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A stack cannot be placed in the bags.
    #[error("bags full: {remaining} of {count} x item {item} do not fit")]
    BagFull {
        /// Item that does not fit.
        item: ItemEntry,
        /// Size of the stack being placed.
        count: u32,
        /// Units left over after every slot was tried.
        remaining: u32,
    },

    /// The item has no template, so its stack size is unknown.
    #[error("unknown item {0}")]
    UnknownItem(ItemEntry),

    /// Adding coins would exceed the wallet cap.
    #[error("money cap exceeded: holding {current}, adding {amount}, cap {cap}")]
    MoneyCapExceeded {
        /// Coins currently held.
        current: u32,
        /// Coins being added.
        amount: u32,
        /// The cap.
        cap: u32,
    },

    /// A store plan was computed against bags that have since changed.
    #[error("store plan is stale (planned at revision {planned}, bags at {current})")]
    StalePlan {
        /// Revision the plan was computed against.
        planned: u64,
        /// Current bag revision.
        current: u64,
    },

    /// The avatar does not know the skill.
    #[error("skill {0} not learned")]
    SkillNotLearned(SkillType),

    /// An arithmetic overflow occurred.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
