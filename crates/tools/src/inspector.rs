use multiworld_common::RootPhase;
use multiworld_kernel::{NodeId, PlanStep, Universe, World};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// World inspector for developer tooling.
///
/// Provides read-only queries against built world graphs for debugging
/// bootstrap configurations.
pub struct UniverseInspector;

impl UniverseInspector {
    /// Produce a summary of one world.
    pub fn summary(world: &World) -> WorldSummary {
        let groups = world.groups().count();
        let members = world.groups().map(|(_, g)| g.members().len()).sum();
        WorldSummary {
            name: world.name().to_string(),
            instances: world.instance_count(),
            groups,
            members,
            pending_events: world.events().len(),
        }
    }

    /// Render a world's hierarchy as an indented tree, one root phase at a time.
    ///
    /// Members owned by another world are shown as links and not expanded.
    pub fn tree(world: &World) -> String {
        let mut out = String::new();
        let mut visited = BTreeSet::new();
        for phase in RootPhase::ALL {
            let node = NodeId::Phase(phase);
            if world.contains(&node) {
                Self::write_node(world, &node, 0, &mut visited, &mut out);
            }
        }
        out
    }

    fn write_node(
        world: &World,
        node: &NodeId,
        depth: usize,
        visited: &mut BTreeSet<NodeId>,
        out: &mut String,
    ) {
        let _ = writeln!(out, "{:indent$}{node}", "", indent = depth * 2);
        if !visited.insert(node.clone()) {
            return;
        }
        for m in world.members(node).unwrap_or_default() {
            if m.world == world.name() {
                Self::write_node(world, &m.node, depth + 1, visited, out);
            } else {
                let _ = writeln!(
                    out,
                    "{:indent$}-> {}/{}",
                    "",
                    m.world,
                    m.node,
                    indent = (depth + 1) * 2
                );
            }
        }
    }

    /// Format the universe's execution plan, one visited instance per line.
    pub fn plan_lines(plan: &[PlanStep]) -> Vec<String> {
        plan.iter()
            .map(|s| format!("{:indent$}{}/{}", "", s.world, s.node, indent = s.depth * 2))
            .collect()
    }

    /// Serializable snapshot of every world's group membership.
    pub fn report(universe: &Universe) -> UniverseReport {
        let worlds = universe
            .worlds()
            .map(|w| WorldReport {
                summary: Self::summary(w),
                groups: w
                    .groups()
                    .map(|(node, g)| {
                        let members = g
                            .members()
                            .iter()
                            .map(|m| {
                                if m.world == w.name() {
                                    m.node.to_string()
                                } else {
                                    format!("{}/{}", m.world, m.node)
                                }
                            })
                            .collect();
                        (node.to_string(), members)
                    })
                    .collect(),
            })
            .collect();
        tracing::trace!(worlds = universe.world_count(), "universe report built");
        UniverseReport {
            default_world: universe.default_world_name().to_string(),
            worlds,
        }
    }
}

/// Summary of one world for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub name: String,
    pub instances: usize,
    pub groups: usize,
    pub members: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: {} instances={} groups={} members={} pending_events={}",
            self.name, self.instances, self.groups, self.members, self.pending_events
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldReport {
    pub summary: WorldSummary,
    /// Group label to member labels; foreign members are `world/label`.
    pub groups: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniverseReport {
    pub default_world: String,
    pub worlds: Vec<WorldReport>,
}
