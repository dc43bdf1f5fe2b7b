//! Group chain ascent.
//!
//! Every system a world creates must reach a root phase through groups that
//! the same world also creates. Ascent walks declared parents with an explicit
//! worklist: a per-chain set catches cycles, a per-world resolved set stops a
//! chain as soon as it joins one that is already known to terminate.

use crate::custom_world::{CustomWorld, CustomWorlds};
use crate::error::{BootstrapError, TargetFault};
use multiworld_common::{Registry, RootPhase, SystemId};
use std::collections::BTreeSet;

/// Discover intermediate groups for every world and validate every chain.
///
/// Must run after [`duplicate`](crate::duplicate) so duplicated systems are
/// ascended too. Fails on the first invalid target or cycle.
pub fn resolve_groups(registry: &Registry, worlds: &mut CustomWorlds) -> Result<(), BootstrapError> {
    for world in worlds.iter_mut() {
        resolve_world(registry, world)?;
    }
    Ok(())
}

/// The next group above `id`, or `None` once a root phase (or no parent) is reached.
fn parent_group(registry: &Registry, id: &SystemId) -> Result<Option<SystemId>, BootstrapError> {
    let Some(parent) = registry.get(id).and_then(|d| d.group.as_ref()) else {
        return Ok(None);
    };
    if RootPhase::from_group_id(parent).is_some() {
        return Ok(None);
    }
    let fault = match registry.get(parent) {
        Some(d) if d.is_group() => return Ok(Some(parent.clone())),
        Some(_) => TargetFault::NotAGroup,
        None => TargetFault::Unknown,
    };
    Err(BootstrapError::InvalidGroupTarget {
        system: id.clone(),
        target: parent.clone(),
        fault,
    })
}

fn resolve_world(registry: &Registry, world: &mut CustomWorld) -> Result<(), BootstrapError> {
    let _span = tracing::debug_span!("resolve_groups", world = world.name()).entered();

    let mut resolved: BTreeSet<SystemId> = BTreeSet::new();
    let mut discovered: Vec<SystemId> = Vec::new();

    for origin in world.systems_to_create().to_vec() {
        if resolved.contains(&origin) {
            continue;
        }
        let mut chain = vec![origin.clone()];
        let mut on_chain = BTreeSet::from([origin.clone()]);
        let mut current = origin;

        while let Some(parent) = parent_group(registry, &current)? {
            if !on_chain.insert(parent.clone()) {
                return Err(BootstrapError::GroupCycle {
                    world: world.name().to_string(),
                    group: parent,
                });
            }
            if resolved.contains(&parent) {
                break;
            }
            if !world.creates(&parent) && !discovered.contains(&parent) {
                tracing::debug!(group = %parent, via = %current, "group discovered");
                discovered.push(parent.clone());
            }
            chain.push(parent.clone());
            current = parent;
        }
        resolved.extend(chain);
    }

    // Explicit placement climbs the whole chain so the groups leave the default
    // world together with their tagged members.
    let tagged: Vec<SystemId> = world.explicit.iter().cloned().collect();
    for origin in tagged {
        let mut current = origin;
        while let Some(parent) = parent_group(registry, &current)? {
            if !world.explicit.insert(parent.clone()) {
                break;
            }
            tracing::trace!(group = %parent, "group inherits explicit placement");
            current = parent;
        }
    }

    for group in &discovered {
        world.push_to_create(group);
    }
    tracing::debug!(discovered = discovered.len(), total = world.systems_to_create().len(), "groups resolved");
    Ok(())
}
