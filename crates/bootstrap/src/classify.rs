use crate::custom_world::CustomWorlds;
use multiworld_common::Registry;

/// Assign systems to custom worlds by world tag, then by interface filter.
///
/// Tagged systems land in each named world's explicit set, creating worlds on
/// first reference. Worlds with an interface filter then pick up every other
/// system implementing at least one filtered interface.
pub fn classify(registry: &Registry, worlds: &mut CustomWorlds) {
    for system in registry.iter() {
        for tag in system.world_tags() {
            let world = worlds.get_or_insert(tag);
            if world.explicit.insert(system.id.clone()) {
                tracing::debug!(world = tag, system = %system.id, "system tagged into world");
            }
        }
    }

    for world in worlds.iter_mut() {
        if world.interfaces().is_empty() {
            continue;
        }
        for system in registry.iter() {
            if world.explicit.contains(&system.id) {
                continue;
            }
            let matches = system
                .interfaces
                .iter()
                .any(|i| world.interfaces().contains(i));
            if matches && world.filtered.insert(system.id.clone()) {
                tracing::debug!(world = world.name(), system = %system.id, "system matched interface filter");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_world::CustomWorld;
    use multiworld_common::{SystemDescriptor, SystemId};

    fn ids(set: &std::collections::BTreeSet<SystemId>) -> Vec<&str> {
        set.iter().map(SystemId::as_str).collect()
    }

    #[test]
    fn tags_create_worlds_and_place_systems() {
        let reg = Registry::new(vec![
            SystemDescriptor::new("A").in_world("Physics"),
            SystemDescriptor::new("B").in_world("Physics").in_world("Render"),
            SystemDescriptor::new("C"),
        ])
        .unwrap();
        let mut worlds = CustomWorlds::new();
        classify(&reg, &mut worlds);

        assert_eq!(worlds.len(), 2);
        assert_eq!(ids(worlds.get("Physics").unwrap().explicit()), vec!["A", "B"]);
        assert_eq!(ids(worlds.get("Render").unwrap().explicit()), vec!["B"]);
    }

    #[test]
    fn repeated_tag_is_a_no_op() {
        let reg = Registry::new(vec![SystemDescriptor::new("A")
            .in_world("Physics")
            .in_world("Physics")])
        .unwrap();
        let mut worlds = CustomWorlds::new();
        classify(&reg, &mut worlds);
        assert_eq!(worlds.get("Physics").unwrap().explicit().len(), 1);
    }

    #[test]
    fn tag_joins_pre_declared_world() {
        let reg = Registry::new(vec![SystemDescriptor::new("A").in_world("Render")]).unwrap();
        let mut worlds = CustomWorlds::new();
        worlds.declare(CustomWorld::new("Render").with_interface("IRenderOnly"));
        classify(&reg, &mut worlds);
        assert_eq!(worlds.len(), 1);
        assert_eq!(ids(worlds.get("Render").unwrap().explicit()), vec!["A"]);
    }

    #[test]
    fn interface_filter_matches_once() {
        let reg = Registry::new(vec![
            SystemDescriptor::new("A").implements("IRender").implements("IPresent"),
            SystemDescriptor::new("B").implements("IPhysics"),
            SystemDescriptor::new("C").implements("IRender").in_world("Render"),
        ])
        .unwrap();
        let mut worlds = CustomWorlds::new();
        worlds.declare(
            CustomWorld::new("Render")
                .with_interface("IRender")
                .with_interface("IPresent"),
        );
        classify(&reg, &mut worlds);

        let render = worlds.get("Render").unwrap();
        assert_eq!(ids(render.filtered()), vec!["A"]);
        // tagged systems are not counted again by the filter
        assert_eq!(ids(render.explicit()), vec!["C"]);
    }

    #[test]
    fn empty_metadata_contributes_nothing() {
        let reg = Registry::new(vec![SystemDescriptor::new("A").in_world("  ")]).unwrap();
        let mut worlds = CustomWorlds::new();
        worlds.declare(CustomWorld::new("Empty"));
        classify(&reg, &mut worlds);
        assert_eq!(worlds.len(), 1);
        assert!(worlds.get("Empty").unwrap().filtered().is_empty());
    }
}
