use crate::custom_world::CustomWorld;
use crate::error::BootstrapError;
use multiworld_common::{Registry, RootPhase, SystemDescriptor};
use multiworld_kernel::{MemberOrder, MemberRef, NodeId, Universe};

/// Group a descriptor attaches to inside `world`.
///
/// No declared parent, or a parent this world does not create, means the
/// simulation phase.
fn parent_node(system: &SystemDescriptor, world: &CustomWorld) -> NodeId {
    match &system.group {
        Some(group) => match RootPhase::from_group_id(group) {
            Some(phase) => NodeId::Phase(phase),
            None if world.creates(group) => NodeId::System(group.clone()),
            None => NodeId::Phase(RootPhase::Simulation),
        },
        None => NodeId::Phase(RootPhase::Simulation),
    }
}

/// Materialize one custom world in the universe.
///
/// Creates every system in the world's creation list, attaches each to its
/// parent group, sorts every touched group once, then links the world's root
/// phases under the default world's. Root phases of the default world itself
/// are left unsorted here; the bootstrap sorts them after every world is linked.
pub fn build_world(
    universe: &mut Universe,
    registry: &Registry,
    world: &CustomWorld,
    order: &dyn MemberOrder,
) -> Result<(), BootstrapError> {
    let _span = tracing::debug_span!("build_world", world = world.name()).entered();
    let is_default = universe.is_default(world.name());
    let target = universe.get_or_create_world(world.name());

    let mut touched: Vec<NodeId> = Vec::new();
    for id in world.systems_to_create() {
        let Some(system) = registry.get(id) else {
            continue;
        };
        let node = NodeId::System(id.clone());
        target.get_or_create_system(id, system.kind)?;

        let parent = parent_node(system, world);
        target.get_or_create_group(&parent)?;
        target.add_member(&parent, MemberRef::new(world.name(), node))?;
        if !touched.contains(&parent) {
            touched.push(parent);
        }
    }

    for group in &touched {
        if is_default && matches!(group, NodeId::Phase(_)) {
            continue;
        }
        target.sort_group(group, order)?;
    }
    tracing::debug!(
        instances = target.instance_count(),
        groups_sorted = touched.len(),
        "world built"
    );

    if !is_default {
        for phase in RootPhase::ALL {
            universe.link_phase(world.name(), phase)?;
        }
    }
    Ok(())
}
