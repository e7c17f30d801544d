//! Bag inventory and wallet for avatars.
//!
//! Bags are a fixed number of slots, each holding at most one stack of a
//! single item up to that item's maximum stack size. Storing is split into
//! two steps so that a whole loot bundle is accepted or rejected as a unit:
//!
//! 1. [`Bags::plan_store`] places every stack on a scratch copy of the slots
//!    (merging into partial stacks first, then free slots) and fails if any
//!    unit is left over. The live bags are not touched.
//! 2. [`Bags::apply`] swaps the planned slots in, provided the bags have not
//!    changed since the plan was made.
//!
//! All arithmetic is checked or saturating.

use gather_types::{ItemEntry, ItemStack};
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Maximum copper an avatar can hold.
pub const MAX_MONEY: u32 = 2_147_483_647;

/// Fixed-size bag storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bags {
    slots: Vec<Option<ItemStack>>,
    #[serde(default)]
    revision: u64,
}

/// The slot layout a successful [`Bags::plan_store`] would produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePlan {
    slots: Vec<Option<ItemStack>>,
    base_revision: u64,
}

impl Bags {
    /// Empty bags with `slot_count` slots.
    pub fn with_slots(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
            revision: 0,
        }
    }

    /// Total number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of empty slots.
    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Total units of `item` across all slots.
    pub fn count_of(&self, item: ItemEntry) -> u64 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item == item)
            .fold(0_u64, |acc, s| acc.saturating_add(u64::from(s.count)))
    }

    /// Compute where every stack in `stacks` would go.
    ///
    /// `max_stack` returns the stack size for an item, or `None` if the item
    /// is unknown. Stacks are placed in order against the cumulative result
    /// of the previous ones, so a bundle is only accepted if all of it fits.
    pub fn plan_store<F>(&self, stacks: &[ItemStack], max_stack: F) -> Result<StorePlan, AgentError>
    where
        F: Fn(ItemEntry) -> Option<u32>,
    {
        let mut scratch = self.slots.clone();
        for stack in stacks {
            if stack.count == 0 {
                continue;
            }
            let limit = max_stack(stack.item)
                .ok_or(AgentError::UnknownItem(stack.item))?
                .max(1);
            let remaining = place(&mut scratch, *stack, limit);
            if remaining > 0 {
                return Err(AgentError::BagFull {
                    item: stack.item,
                    count: stack.count,
                    remaining,
                });
            }
        }
        Ok(StorePlan {
            slots: scratch,
            base_revision: self.revision,
        })
    }

    /// Commit a plan produced by [`plan_store`](Self::plan_store).
    pub fn apply(&mut self, plan: StorePlan) -> Result<(), AgentError> {
        if plan.base_revision != self.revision {
            return Err(AgentError::StalePlan {
                planned: plan.base_revision,
                current: self.revision,
            });
        }
        self.slots = plan.slots;
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    /// Plan and apply in one step.
    pub fn store<F>(&mut self, stacks: &[ItemStack], max_stack: F) -> Result<(), AgentError>
    where
        F: Fn(ItemEntry) -> Option<u32>,
    {
        let plan = self.plan_store(stacks, max_stack)?;
        self.apply(plan)
    }
}

/// Place `stack` into `slots`, returning the units that did not fit.
fn place(slots: &mut [Option<ItemStack>], stack: ItemStack, limit: u32) -> u32 {
    let mut remaining = stack.count;

    for existing in slots.iter_mut().flatten() {
        if remaining == 0 {
            break;
        }
        if existing.item != stack.item || existing.count >= limit {
            continue;
        }
        let added = limit.saturating_sub(existing.count).min(remaining);
        existing.count = existing.count.saturating_add(added);
        remaining = remaining.saturating_sub(added);
    }

    for slot in slots.iter_mut() {
        if remaining == 0 {
            break;
        }
        if slot.is_some() {
            continue;
        }
        let added = limit.min(remaining);
        *slot = Some(ItemStack::new(stack.item, added));
        remaining = remaining.saturating_sub(added);
    }

    remaining
}

/// Whether `amount` copper can be added to `current` without passing [`MAX_MONEY`].
pub fn can_add_money(current: u32, amount: u32) -> bool {
    current.checked_add(amount).is_some_and(|total| total <= MAX_MONEY)
}

/// Add `amount` copper to `wallet`.
pub fn add_money(wallet: &mut u32, amount: u32) -> Result<(), AgentError> {
    if !can_add_money(*wallet, amount) {
        return Err(AgentError::MoneyCapExceeded {
            current: *wallet,
            amount,
            cap: MAX_MONEY,
        });
    }
    *wallet = wallet.checked_add(amount).ok_or_else(|| AgentError::ArithmeticOverflow {
        context: String::from("wallet overflow in add_money"),
    })?;
    Ok(())
}
