//! Skill book and gathering skill-up rolls.
//!
//! Each learned skill has a pure value (trained points), a bonus (gear and
//! racial modifiers), and a cap. Eligibility checks use the modified value
//! (`value + bonus`); skill-up rolls use the pure value.
//!
//! # Skill-Up Formula
//!
//! Gathering uses the requirement threshold as the "red" level `R` and
//! derives three colour bands from it:
//!
//! | Band   | Pure value          | Chance (default) |
//! |--------|---------------------|------------------|
//! | Orange | `< R + 25`          | 100%             |
//! | Yellow | `R + 25 ..< R + 50` | 75%              |
//! | Green  | `R + 50 ..< R + 100`| 25%              |
//! | Grey   | `>= R + 100`        | 0%               |
//!
//! Chances are kept per mille and multiplied by the target multiplier (2
//! for elite skinning targets). Mining and skinning can additionally halve
//! the chance for every `steps` points of pure value. A roll in `1..=1000`
//! at or below the chance raises the pure value by the gathering step,
//! capped at the skill's maximum.

use std::collections::BTreeMap;

use gather_types::SkillType;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// One learned skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Pure (trained) value.
    pub value: u32,
    /// Maximum pure value at the current rank.
    pub max: u32,
    /// Temporary and permanent modifiers.
    #[serde(default)]
    pub bonus: u32,
}

/// Per-avatar skill values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBook {
    skills: BTreeMap<SkillType, SkillEntry>,
}

impl SkillBook {
    /// An empty skill book.
    pub const fn new() -> Self {
        Self {
            skills: BTreeMap::new(),
        }
    }

    /// Learn (or relearn) a skill at `value` with cap `max`.
    pub fn learn(&mut self, skill: SkillType, value: u32, max: u32) {
        let bonus = self.skills.get(&skill).map_or(0, |e| e.bonus);
        self.skills.insert(
            skill,
            SkillEntry {
                value: value.min(max),
                max,
                bonus,
            },
        );
    }

    /// Forget a skill entirely.
    pub fn unlearn(&mut self, skill: SkillType) -> Option<SkillEntry> {
        self.skills.remove(&skill)
    }

    /// Set the bonus applied on top of the pure value.
    pub fn set_bonus(&mut self, skill: SkillType, bonus: u32) -> Result<(), AgentError> {
        let entry = self
            .skills
            .get_mut(&skill)
            .ok_or(AgentError::SkillNotLearned(skill))?;
        entry.bonus = bonus;
        Ok(())
    }

    /// Modified value (`value + bonus`), or 0 if the skill is not learned.
    pub fn value(&self, skill: SkillType) -> u32 {
        self.skills
            .get(&skill)
            .filter(|e| e.value > 0)
            .map_or(0, |e| e.value.saturating_add(e.bonus))
    }

    /// Pure value, or 0 if the skill is not learned.
    pub fn pure_value(&self, skill: SkillType) -> u32 {
        self.skills.get(&skill).map_or(0, |e| e.value)
    }

    /// Whether the skill is held (modified value above zero).
    pub fn has(&self, skill: SkillType) -> bool {
        self.value(skill) > 0
    }

    /// Whether any gathering profession is held.
    pub fn has_any_gathering(&self) -> bool {
        SkillType::GATHERING.into_iter().any(|s| self.has(s))
    }

    /// Raise the pure value by `step`, capped at the skill's maximum.
    ///
    /// Returns the new value if it changed.
    pub fn raise(&mut self, skill: SkillType, step: u32) -> Result<Option<u32>, AgentError> {
        let entry = self
            .skills
            .get_mut(&skill)
            .ok_or(AgentError::SkillNotLearned(skill))?;
        if entry.value >= entry.max || step == 0 {
            return Ok(None);
        }
        let raised = entry.value.checked_add(step).ok_or_else(|| AgentError::ArithmeticOverflow {
            context: format!("skill value overflow for {skill}"),
        })?;
        entry.value = raised.min(entry.max);
        Ok(Some(entry.value))
    }
}

// ---------------------------------------------------------------------------
// Skill-up rates
// ---------------------------------------------------------------------------

/// Skill-up chance table and step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkillGainRates {
    /// Percent chance while the skill is orange.
    #[serde(default = "default_chance_orange")]
    pub chance_orange: u32,
    /// Percent chance while the skill is yellow.
    #[serde(default = "default_chance_yellow")]
    pub chance_yellow: u32,
    /// Percent chance while the skill is green.
    #[serde(default = "default_chance_green")]
    pub chance_green: u32,
    /// Percent chance while the skill is grey.
    #[serde(default)]
    pub chance_grey: u32,
    /// Points gained per successful roll.
    #[serde(default = "default_gathering_step")]
    pub gathering_step: u32,
    /// Mining halves its chance every this many points (0 disables).
    #[serde(default)]
    pub mining_steps: u32,
    /// Skinning halves its chance every this many points (0 disables).
    #[serde(default)]
    pub skinning_steps: u32,
}

impl Default for SkillGainRates {
    fn default() -> Self {
        Self {
            chance_orange: default_chance_orange(),
            chance_yellow: default_chance_yellow(),
            chance_green: default_chance_green(),
            chance_grey: 0,
            gathering_step: default_gathering_step(),
            mining_steps: 0,
            skinning_steps: 0,
        }
    }
}

impl SkillGainRates {
    /// Per-mille chance for `value` against the colour band thresholds.
    pub fn band_chance(&self, value: u32, grey: u32, green: u32, yellow: u32) -> u32 {
        let percent = if value >= grey {
            self.chance_grey
        } else if value >= green {
            self.chance_green
        } else if value >= yellow {
            self.chance_yellow
        } else {
            self.chance_orange
        };
        percent.saturating_mul(10)
    }

    /// Per-mille chance of a gathering skill-up.
    pub fn gather_chance(&self, skill: SkillType, value: u32, red_level: u32, multiplier: u32) -> u32 {
        let grey = red_level.saturating_add(100);
        let green = red_level.saturating_add(50);
        let yellow = red_level.saturating_add(25);
        let chance = self
            .band_chance(value, grey, green, yellow)
            .saturating_mul(multiplier);

        let steps = match skill {
            SkillType::Mining => self.mining_steps,
            SkillType::Skinning => self.skinning_steps,
            SkillType::Herbalism | SkillType::Engineering => 0,
        };
        match value.checked_div(steps) {
            Some(halvings) => chance.checked_shr(halvings).unwrap_or(0),
            None => chance,
        }
    }
}

/// Roll a gathering skill-up and apply it to `book`.
///
/// `pure_value` is the avatar's unmodified value at the time of the
/// harvest and `red_level` the requirement threshold that was met.
/// Returns the new value on a successful raise.
pub fn update_gather_skill(
    book: &mut SkillBook,
    rates: &SkillGainRates,
    skill: SkillType,
    pure_value: u32,
    red_level: u32,
    multiplier: u32,
    rng: &mut impl Rng,
) -> Result<Option<u32>, AgentError> {
    let chance = rates.gather_chance(skill, pure_value, red_level, multiplier);
    if chance == 0 {
        return Ok(None);
    }
    let roll: u32 = rng.random_range(1..=1000);
    if roll > chance {
        return Ok(None);
    }
    book.raise(skill, rates.gathering_step)
}

const fn default_chance_orange() -> u32 {
    100
}

const fn default_chance_yellow() -> u32 {
    75
}

const fn default_chance_green() -> u32 {
    25
}

const fn default_gathering_step() -> u32 {
    1
}
