//! Keeps an avatar's minimap tracking flags in step with its skills.

use gather_agents::Avatar;
use gather_data::TrackingBits;
use tracing::debug;

/// Flags changed by one [`sync_tracking`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingChange {
    /// Bits that were set.
    pub set: u32,
    /// Bits that were cleared.
    pub cleared: u32,
}

impl TrackingChange {
    /// Whether nothing changed.
    pub const fn is_empty(self) -> bool {
        self.set == 0 && self.cleared == 0
    }
}

/// Set each resolved category bit the avatar has the skill for, and clear
/// each one it does not. Categories whose bit resolved to 0 are left alone.
pub fn sync_tracking(avatar: &mut Avatar, bits: &TrackingBits) -> TrackingChange {
    let mut change = TrackingChange::default();
    for (category, bit) in bits.resolved() {
        let holds = avatar.skills.has(category.tracking_skill());
        let flagged = avatar.tracking.has(bit);
        if holds && !flagged {
            avatar.tracking.set(bit);
            change.set |= bit;
        } else if !holds && flagged {
            avatar.tracking.clear(bit);
            change.cleared |= bit;
        }
    }
    if !change.is_empty() {
        debug!(
            avatar = %avatar.id,
            set = change.set,
            cleared = change.cleared,
            "tracking flags synchronized"
        );
    }
    change
}
