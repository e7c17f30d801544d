//! Minimap tracking bit resolution.
//!
//! The bit that shows a resource category on the minimap is not a fixed
//! constant: it is derived from the first effect of the category's
//! tracking spell as `1 << (misc_value - 1)`. Resolution runs at startup
//! and again on every data reload. A category whose spell is missing or
//! malformed resolves to bit 0, which disables tracking for it.

use std::collections::BTreeMap;

use gather_types::{ResourceCategory, SpellId};
use tracing::{info, warn};

use crate::error::DataError;
use crate::store::StaticData;

/// Find Herbs.
pub const FIND_HERBS: SpellId = SpellId(2383);

/// Find Minerals.
pub const FIND_MINERALS: SpellId = SpellId(2580);

/// The tracking spell for a resource category.
pub const fn tracking_spell(category: ResourceCategory) -> SpellId {
    match category {
        ResourceCategory::Herb => FIND_HERBS,
        ResourceCategory::Mineral => FIND_MINERALS,
    }
}

/// Resolved tracking bits, one per category. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingBits {
    bits: BTreeMap<ResourceCategory, u32>,
}

impl TrackingBits {
    /// Build from explicit values (tests, restored state).
    pub fn from_bits(bits: impl IntoIterator<Item = (ResourceCategory, u32)>) -> Self {
        Self {
            bits: bits.into_iter().filter(|&(_, bit)| bit != 0).collect(),
        }
    }

    /// The bit for `category`, or 0 if it did not resolve.
    pub fn bit(&self, category: ResourceCategory) -> u32 {
        self.bits.get(&category).copied().unwrap_or(0)
    }

    /// Categories with a nonzero bit, with their bits.
    pub fn resolved(&self) -> impl Iterator<Item = (ResourceCategory, u32)> + '_ {
        self.bits.iter().map(|(&category, &bit)| (category, bit))
    }
}

/// Resolve the tracking bit for one category.
///
/// # Errors
///
/// Returns [`DataError::SpellNotFound`] if the tracking spell is absent, or
/// [`DataError::InvalidTrackingValue`] if its misc value is outside `1..=32`.
pub fn resolve_category_bit<D: StaticData + ?Sized>(
    data: &D,
    category: ResourceCategory,
) -> Result<u32, DataError> {
    let spell_id = tracking_spell(category);
    let spell = data.spell(spell_id).ok_or(DataError::SpellNotFound(spell_id))?;
    let misc_value = spell.first_effect().map_or(0, |e| e.misc_value);

    let invalid = || DataError::InvalidTrackingValue {
        spell: spell_id,
        misc_value,
    };
    let index = u32::try_from(misc_value)
        .ok()
        .and_then(|v| v.checked_sub(1))
        .ok_or_else(invalid)?;
    1_u32.checked_shl(index).ok_or_else(invalid)
}

/// Resolve every category's tracking bit.
///
/// Failures are logged and leave that category at bit 0; they are never
/// fatal.
pub fn resolve_tracking_bits<D: StaticData + ?Sized>(data: &D) -> TrackingBits {
    let mut bits = BTreeMap::new();
    for category in ResourceCategory::ALL {
        match resolve_category_bit(data, category) {
            Ok(bit) => {
                bits.insert(category, bit);
            }
            Err(e) => {
                warn!(
                    category = ?category,
                    error = %e,
                    "tracking bit unresolved, minimap tracking disabled for category"
                );
            }
        }
    }
    let resolved = TrackingBits { bits };
    info!(
        herb_bit = %format!("{:#010X}", resolved.bit(ResourceCategory::Herb)),
        mineral_bit = %format!("{:#010X}", resolved.bit(ResourceCategory::Mineral)),
        "tracking bits resolved"
    );
    resolved
}
