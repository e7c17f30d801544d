//! An in-memory [`World`] for the harness and tests.
//!
//! [`Region`] keeps entities in insertion order and answers candidate
//! queries with a linear distance filter. It also runs the lifecycles the
//! host would normally own: node respawn and skinned-corpse decay.

use gather_agents::Avatar;
use gather_types::{AvatarId, Corpse, CorpseId, NodeId, NodeState, Position, ResourceNode};
use tracing::debug;

use crate::world::World;

/// What one [`Region::advance`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionEvents {
    /// Nodes that became ready again.
    pub respawned: Vec<NodeId>,
    /// Skinned corpses that decayed and were removed.
    pub decayed: Vec<CorpseId>,
}

/// Entities in one map region.
#[derive(Debug, Clone, Default)]
pub struct Region {
    avatars: Vec<Avatar>,
    nodes: Vec<ResourceNode>,
    corpses: Vec<Corpse>,
}

impl Region {
    /// An empty region.
    pub const fn new() -> Self {
        Self {
            avatars: Vec::new(),
            nodes: Vec::new(),
            corpses: Vec::new(),
        }
    }

    /// Add an avatar.
    pub fn add_avatar(&mut self, avatar: Avatar) -> AvatarId {
        let id = avatar.id;
        self.avatars.push(avatar);
        id
    }

    /// Remove an avatar (logout).
    pub fn remove_avatar(&mut self, id: AvatarId) -> Option<Avatar> {
        let index = self.avatars.iter().position(|a| a.id == id)?;
        Some(self.avatars.remove(index))
    }

    /// Add a resource node.
    pub fn add_node(&mut self, node: ResourceNode) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Add a creature.
    pub fn add_corpse(&mut self, corpse: Corpse) -> CorpseId {
        let id = corpse.id;
        self.corpses.push(corpse);
        id
    }

    /// Mutable access to a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ResourceNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Mutable access to a creature.
    pub fn corpse_mut(&mut self, id: CorpseId) -> Option<&mut Corpse> {
        self.corpses.iter_mut().find(|c| c.id == id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    /// Creatures in insertion order.
    pub fn corpses(&self) -> impl Iterator<Item = &Corpse> {
        self.corpses.iter()
    }

    /// Advance respawn and decay timers by `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u32) -> RegionEvents {
        let mut events = RegionEvents::default();

        for node in &mut self.nodes {
            if node.state != NodeState::Deactivated {
                continue;
            }
            if elapsed_ms >= node.respawn_remaining_ms {
                node.respawn();
                events.respawned.push(node.id);
            } else {
                node.respawn_remaining_ms = node.respawn_remaining_ms.saturating_sub(elapsed_ms);
            }
        }

        for corpse in &mut self.corpses {
            if let Some(remaining) = corpse.decay_remaining_ms.as_mut() {
                if elapsed_ms >= *remaining {
                    events.decayed.push(corpse.id);
                } else {
                    *remaining = remaining.saturating_sub(elapsed_ms);
                }
            }
        }
        self.corpses.retain(|c| !events.decayed.contains(&c.id));

        if !events.respawned.is_empty() || !events.decayed.is_empty() {
            debug!(
                respawned = events.respawned.len(),
                decayed = events.decayed.len(),
                "region lifecycles advanced"
            );
        }
        events
    }
}

fn visible(center: &Position, phase_mask: u32, range: f32, at: &Position, entity_phase: u32) -> bool {
    phase_mask & entity_phase != 0 && center.is_within(at, range)
}

impl World for Region {
    fn avatar(&self, id: AvatarId) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.id == id)
    }

    fn avatar_mut(&mut self, id: AvatarId) -> Option<&mut Avatar> {
        self.avatars.iter_mut().find(|a| a.id == id)
    }

    fn node(&self, id: NodeId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn corpse(&self, id: CorpseId) -> Option<&Corpse> {
        self.corpses.iter().find(|c| c.id == id)
    }

    fn nodes_near(&self, center: &Position, phase_mask: u32, range: f32) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| visible(center, phase_mask, range, &n.position, n.phase_mask))
            .map(|n| n.id)
            .collect()
    }

    fn corpses_near(&self, center: &Position, phase_mask: u32, range: f32) -> Vec<CorpseId> {
        self.corpses
            .iter()
            .filter(|c| visible(center, phase_mask, range, &c.position, c.phase_mask))
            .map(|c| c.id)
            .collect()
    }

    fn node_and_avatar_mut(
        &mut self,
        node: NodeId,
        avatar: AvatarId,
    ) -> Option<(&mut ResourceNode, &mut Avatar)> {
        let node = self.nodes.iter_mut().find(|n| n.id == node)?;
        let avatar = self.avatars.iter_mut().find(|a| a.id == avatar)?;
        Some((node, avatar))
    }

    fn corpse_and_avatar_mut(
        &mut self,
        corpse: CorpseId,
        avatar: AvatarId,
    ) -> Option<(&mut Corpse, &mut Avatar)> {
        let corpse = self.corpses.iter_mut().find(|c| c.id == corpse)?;
        let avatar = self.avatars.iter_mut().find(|a| a.id == avatar)?;
        Some((corpse, avatar))
    }
}
