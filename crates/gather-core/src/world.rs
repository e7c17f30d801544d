//! The world access seam.
//!
//! The scan engine does not own avatars, nodes, or corpses. It reaches them
//! through a [`World`] implementation supplied by the host, which also
//! answers the range-bounded candidate queries. Candidate lists are returned
//! in the host's discovery order; the engine walks them in that order.

use gather_agents::Avatar;
use gather_types::{AvatarId, Corpse, CorpseId, NodeId, Position, ResourceNode};

/// Host access to entities in one region.
///
/// All calls happen on the region's logical thread, so implementations need
/// no interior locking.
pub trait World {
    /// Look up an avatar.
    fn avatar(&self, id: AvatarId) -> Option<&Avatar>;

    /// Look up an avatar for mutation.
    fn avatar_mut(&mut self, id: AvatarId) -> Option<&mut Avatar>;

    /// Look up a resource node.
    fn node(&self, id: NodeId) -> Option<&ResourceNode>;

    /// Look up a creature.
    fn corpse(&self, id: CorpseId) -> Option<&Corpse>;

    /// Nodes visible in `phase_mask` within `range` of `center`, in discovery
    /// order.
    fn nodes_near(&self, center: &Position, phase_mask: u32, range: f32) -> Vec<NodeId>;

    /// Creatures visible in `phase_mask` within `range` of `center`, in
    /// discovery order.
    fn corpses_near(&self, center: &Position, phase_mask: u32, range: f32) -> Vec<CorpseId>;

    /// Borrow a node and an avatar mutably at the same time.
    fn node_and_avatar_mut(
        &mut self,
        node: NodeId,
        avatar: AvatarId,
    ) -> Option<(&mut ResourceNode, &mut Avatar)>;

    /// Borrow a creature and an avatar mutably at the same time.
    fn corpse_and_avatar_mut(
        &mut self,
        corpse: CorpseId,
        avatar: AvatarId,
    ) -> Option<(&mut Corpse, &mut Avatar)>;
}
