use crate::world::{MemberRef, NodeId, World, WorldError};
use multiworld_common::RootPhase;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Name of the default world when none is configured.
pub const DEFAULT_WORLD_NAME: &str = "Default World";

/// One instance visited by a root tick, in visit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    pub world: String,
    pub node: NodeId,
    pub depth: usize,
    pub is_group: bool,
}

/// All worlds of the process, keyed by name, with one distinguished default world.
///
/// The default world always exists. Custom worlds are created on demand and
/// reached from the default world's root phases once linked.
#[derive(Debug, Clone)]
pub struct Universe {
    default_world: String,
    worlds: BTreeMap<String, World>,
}

impl Universe {
    pub fn new(default_world: impl Into<String>) -> Self {
        let default_world = default_world.into();
        let mut worlds = BTreeMap::new();
        worlds.insert(default_world.clone(), World::new(default_world.clone()));
        Self {
            default_world,
            worlds,
        }
    }

    pub fn default_world_name(&self) -> &str {
        &self.default_world
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.default_world == name
    }

    pub fn default_world(&self) -> &World {
        &self.worlds[&self.default_world]
    }

    pub fn default_world_mut(&mut self) -> &mut World {
        self.worlds
            .entry(self.default_world.clone())
            .or_insert_with_key(|name| World::new(name.clone()))
    }

    pub fn world(&self, name: &str) -> Option<&World> {
        self.worlds.get(name)
    }

    pub fn world_mut(&mut self, name: &str) -> Option<&mut World> {
        self.worlds.get_mut(name)
    }

    /// Create-or-get a world by name.
    pub fn get_or_create_world(&mut self, name: &str) -> &mut World {
        self.worlds.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!(world = name, "world created");
            World::new(name)
        })
    }

    pub fn worlds(&self) -> impl Iterator<Item = &World> + '_ {
        self.worlds.values()
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Total number of pending events across all worlds.
    pub fn event_count(&self) -> usize {
        self.worlds.values().map(|w| w.events().len()).sum()
    }

    /// Make the default world's `phase` tick the same phase of `world`.
    ///
    /// Returns `false` for the default world itself, which never links to itself.
    pub fn link_phase(&mut self, world: &str, phase: RootPhase) -> Result<bool, WorldError> {
        if self.is_default(world) {
            return Ok(false);
        }
        let node = NodeId::Phase(phase);
        self.worlds
            .get_mut(world)
            .ok_or_else(|| WorldError::UnknownWorld(world.to_string()))?
            .get_or_create_group(&node)?;

        let default = self.default_world_mut();
        default.get_or_create_group(&node)?;
        let added = default.add_member(&node, MemberRef::new(world, node.clone()))?;
        if added {
            tracing::debug!(world, %phase, "phase linked into default world");
        }
        Ok(added)
    }

    /// Depth-first walk of what one tick of the default world visits.
    ///
    /// Follows member references into linked worlds. Each instance is visited once.
    pub fn execution_plan(&self) -> Vec<PlanStep> {
        let mut steps = Vec::new();
        let mut visited = BTreeSet::new();
        for phase in RootPhase::ALL {
            self.visit(
                &self.default_world,
                &NodeId::Phase(phase),
                0,
                &mut visited,
                &mut steps,
            );
        }
        steps
    }

    fn visit(
        &self,
        world: &str,
        node: &NodeId,
        depth: usize,
        visited: &mut BTreeSet<(String, NodeId)>,
        steps: &mut Vec<PlanStep>,
    ) {
        if !visited.insert((world.to_string(), node.clone())) {
            return;
        }
        let Some(inst) = self.world(world).and_then(|w| w.get_existing(node)) else {
            return;
        };
        steps.push(PlanStep {
            world: world.to_string(),
            node: node.clone(),
            depth,
            is_group: inst.is_group(),
        });
        if let Some(group) = inst.as_group() {
            for m in group.members() {
                self.visit(&m.world, &m.node, depth + 1, visited, steps);
            }
        }
    }

    /// Deterministic hash over every world, in name order.
    pub fn state_hash(&self) -> u64 {
        self.worlds
            .values()
            .fold(0u64, |acc, w| acc.rotate_left(5) ^ w.state_hash())
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_NAME)
    }
}
