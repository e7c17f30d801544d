//! Lock/requirement descriptors for world objects.
//!
//! A lock carries up to [`MAX_LOCK_CASE`] cases. Gathering nodes use
//! skill-keyed cases whose lock type names the profession and whose
//! threshold is the minimum skill value required to open them.

use gather_types::{ItemEntry, LockId, LockKeyType, LockType, SkillType};
use serde::Deserialize;

/// Maximum number of cases in one lock entry.
pub const MAX_LOCK_CASE: usize = 8;

/// One way of opening a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LockCase {
    /// Key kind.
    #[serde(default)]
    pub key_type: LockKeyType,
    /// Lock type for skill-keyed cases.
    #[serde(default)]
    pub lock_type: Option<LockType>,
    /// Key item for item-keyed cases.
    #[serde(default)]
    pub item: Option<ItemEntry>,
    /// Skill threshold for skill-keyed cases.
    #[serde(default)]
    pub skill: u32,
}

impl LockCase {
    /// The gather skill and threshold this case requires, if it is a
    /// skill-keyed herbalism or mining case.
    pub fn gather_requirement(&self) -> Option<(SkillType, u32)> {
        if self.key_type != LockKeyType::Skill {
            return None;
        }
        let skill = self.lock_type?.gather_skill()?;
        Some((skill, self.skill))
    }
}

/// A lock/requirement descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockEntry {
    /// Lock identifier.
    pub id: LockId,
    /// Cases in declared order.
    #[serde(default)]
    pub cases: Vec<LockCase>,
}

impl LockEntry {
    /// Gather requirements in declared order, skipping non-gather cases.
    pub fn gather_requirements(&self) -> impl Iterator<Item = (SkillType, u32)> + '_ {
        self.cases.iter().filter_map(LockCase::gather_requirement)
    }
}
