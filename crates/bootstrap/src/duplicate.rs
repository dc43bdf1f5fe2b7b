use crate::custom_world::CustomWorlds;
use multiworld_common::Registry;

/// Whether `path` lies inside the category `prefix`.
///
/// Matches whole dot-separated segments: `Foo` selects `Foo` and `Foo.Bar`
/// but not `Foobar`. A trailing `.` on the prefix is ignored and an empty
/// prefix selects nothing.
pub fn category_matches(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('.');
    if prefix.is_empty() {
        return false;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Seed each world's creation list and add systems selected by category prefix.
///
/// Seeding takes explicit then filter-matched systems, both in registry order.
/// Duplicated systems keep their place in the default world as well.
pub fn duplicate(registry: &Registry, worlds: &mut CustomWorlds) {
    for world in worlds.iter_mut() {
        for system in registry.iter() {
            if world.explicit.contains(&system.id) {
                world.push_to_create(&system.id);
            }
        }
        for system in registry.iter() {
            if world.filtered.contains(&system.id) {
                world.push_to_create(&system.id);
            }
        }

        let prefixes = world.duplicate_namespaces().to_vec();
        for prefix in &prefixes {
            if prefix.trim_end_matches('.').is_empty() {
                tracing::warn!(world = world.name(), "ignoring empty duplicate namespace");
                continue;
            }
            for system in registry.iter() {
                if !category_matches(&system.category, prefix) {
                    continue;
                }
                world.push_to_create(&system.id);
                if world.duplicated.insert(system.id.clone()) {
                    tracing::debug!(world = world.name(), system = %system.id, prefix = %prefix, "system duplicated into world");
                }
            }
        }
    }
}
