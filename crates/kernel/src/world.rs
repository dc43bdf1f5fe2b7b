use crate::order::MemberOrder;
use multiworld_common::{RootPhase, SystemId, SystemKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key of an instance inside a world's arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    Phase(RootPhase),
    System(SystemId),
}

impl NodeId {
    pub fn label(&self) -> &str {
        match self {
            NodeId::Phase(p) => p.group_id(),
            NodeId::System(id) => id.as_str(),
        }
    }

    /// Node for a declared parent id, mapping root phase ids onto [`NodeId::Phase`].
    pub fn for_group(id: &SystemId) -> Self {
        match RootPhase::from_group_id(id) {
            Some(phase) => NodeId::Phase(phase),
            None => NodeId::System(id.clone()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<RootPhase> for NodeId {
    fn from(phase: RootPhase) -> Self {
        NodeId::Phase(phase)
    }
}

impl From<SystemId> for NodeId {
    fn from(id: SystemId) -> Self {
        NodeId::System(id)
    }
}

/// Reference from a group to a member, which may live in another world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberRef {
    pub world: String,
    pub node: NodeId,
}

impl MemberRef {
    pub fn new(world: impl Into<String>, node: impl Into<NodeId>) -> Self {
        Self {
            world: world.into(),
            node: node.into(),
        }
    }
}

/// Ordered member list of a group instance.
#[derive(Debug, Clone, Default)]
pub struct Group {
    members: Vec<MemberRef>,
    sort_count: u32,
}

impl Group {
    pub fn members(&self) -> &[MemberRef] {
        &self.members
    }

    /// How many times this group's member list has been re-sorted.
    pub fn sort_count(&self) -> u32 {
        self.sort_count
    }
}

#[derive(Debug, Clone)]
pub enum InstanceKind {
    System,
    Group(Group),
}

/// A live system or group inside one world.
#[derive(Debug, Clone)]
pub struct Instance {
    pub node: NodeId,
    pub kind: InstanceKind,
}

impl Instance {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, InstanceKind::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            InstanceKind::Group(g) => Some(g),
            InstanceKind::System => None,
        }
    }
}

/// An event record produced by every mutation of a world's graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Instance was created for the first time in this world.
    InstanceCreated { node: NodeId, group: bool },
    /// A member was appended to a group's update list.
    MemberAdded { group: NodeId, member: MemberRef },
    /// A group's update list was re-sorted.
    GroupSorted { group: NodeId },
}

/// Errors from world graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("{node} in world {world} is not a group")]
    NotAGroup { world: String, node: NodeId },
    #[error("{node} does not exist in world {world}")]
    MissingInstance { world: String, node: NodeId },
    #[error("world {0} does not exist")]
    UnknownWorld(String),
}

/// One isolated execution context: an arena of instances keyed by [`NodeId`].
///
/// Uses BTreeMap so iteration and [`World::state_hash`] are deterministic.
#[derive(Debug, Clone)]
pub struct World {
    name: String,
    instances: BTreeMap<NodeId, Instance>,
    event_log: Vec<WorldEvent>,
}

impl World {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instances: BTreeMap::new(),
            event_log: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &BTreeMap<NodeId, Instance> {
        &self.instances
    }

    /// Group instances in arena order.
    pub fn groups(&self) -> impl Iterator<Item = (&NodeId, &Group)> + '_ {
        self.instances
            .iter()
            .filter_map(|(node, inst)| inst.as_group().map(|g| (node, g)))
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Look up an instance without creating it.
    pub fn get_existing(&self, node: &NodeId) -> Option<&Instance> {
        self.instances.get(node)
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.instances.contains_key(node)
    }

    /// Member list of a group, `None` if the node is absent or not a group.
    pub fn members(&self, group: &NodeId) -> Option<&[MemberRef]> {
        self.instances
            .get(group)
            .and_then(Instance::as_group)
            .map(Group::members)
    }

    /// Create-or-get the instance of a registered system or group.
    ///
    /// Asking for a group where a plain system instance already exists fails.
    pub fn get_or_create_system(
        &mut self,
        id: &SystemId,
        kind: SystemKind,
    ) -> Result<&Instance, WorldError> {
        let node = NodeId::for_group(id);
        match kind {
            SystemKind::Group => self.get_or_create_group(&node),
            SystemKind::System => {
                if !self.instances.contains_key(&node) {
                    let is_group = matches!(node, NodeId::Phase(_));
                    self.insert(node.clone(), is_group);
                }
                Ok(&self.instances[&node])
            }
        }
    }

    /// Create-or-get a group instance. Root phases are always groups.
    pub fn get_or_create_group(&mut self, node: &NodeId) -> Result<&Instance, WorldError> {
        match self.instances.get(node) {
            Some(inst) if !inst.is_group() => {
                return Err(WorldError::NotAGroup {
                    world: self.name.clone(),
                    node: node.clone(),
                });
            }
            Some(_) => {}
            None => self.insert(node.clone(), true),
        }
        Ok(&self.instances[node])
    }

    fn insert(&mut self, node: NodeId, group: bool) {
        let kind = if group {
            InstanceKind::Group(Group::default())
        } else {
            InstanceKind::System
        };
        tracing::trace!(world = %self.name, %node, group, "instance created");
        self.instances.insert(
            node.clone(),
            Instance {
                node: node.clone(),
                kind,
            },
        );
        self.event_log
            .push(WorldEvent::InstanceCreated { node, group });
    }

    fn group_mut(&mut self, node: &NodeId) -> Result<&mut Group, WorldError> {
        match self.instances.get_mut(node) {
            Some(Instance {
                kind: InstanceKind::Group(g),
                ..
            }) => Ok(g),
            Some(_) => Err(WorldError::NotAGroup {
                world: self.name.clone(),
                node: node.clone(),
            }),
            None => Err(WorldError::MissingInstance {
                world: self.name.clone(),
                node: node.clone(),
            }),
        }
    }

    /// Append a member to an existing group. Returns `false` if it was already a member.
    pub fn add_member(&mut self, group: &NodeId, member: MemberRef) -> Result<bool, WorldError> {
        let g = self.group_mut(group)?;
        if g.members.contains(&member) {
            return Ok(false);
        }
        g.members.push(member.clone());
        tracing::trace!(world = %self.name, %group, member = %member.node, "member added");
        self.event_log.push(WorldEvent::MemberAdded {
            group: group.clone(),
            member,
        });
        Ok(true)
    }

    /// Re-sort a group's member list with the given ordering.
    pub fn sort_group(&mut self, group: &NodeId, order: &dyn MemberOrder) -> Result<(), WorldError> {
        let g = self.group_mut(group)?;
        order.sort(group, &mut g.members);
        g.sort_count += 1;
        self.event_log.push(WorldEvent::GroupSorted {
            group: group.clone(),
        });
        Ok(())
    }

    /// Deterministic hash of the graph in canonical (BTreeMap) order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, self.name.as_bytes());
        for (node, inst) in &self.instances {
            mix(&mut h, node.label().as_bytes());
            match &inst.kind {
                InstanceKind::System => mix(&mut h, &[0]),
                InstanceKind::Group(g) => {
                    mix(&mut h, &[1]);
                    for m in &g.members {
                        mix(&mut h, m.world.as_bytes());
                        mix(&mut h, m.node.label().as_bytes());
                    }
                }
            }
        }
        h
    }
}
