use crate::build::build_world;
use crate::classify::classify;
use crate::config::BootstrapConfig;
use crate::custom_world::{CustomWorld, CustomWorlds};
use crate::duplicate::duplicate;
use crate::error::BootstrapError;
use crate::resolve::resolve_groups;
use multiworld_common::{Registry, RootPhase, SystemId};
use multiworld_kernel::{InsertionOrder, MemberOrder, NodeId, Universe};
use std::collections::BTreeSet;

/// Systems the caller still has to create through its default-world path.
///
/// Kept in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultSystems(Vec<SystemId>);

impl DefaultSystems {
    pub fn contains(&self, id: &SystemId) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemId> + '_ {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SystemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Single-run bootstrap context.
///
/// Owns the custom world plans and remembers the outcome of the first
/// [`initialize`](Bootstrap::initialize) call; later calls replay it without
/// touching the universe again.
pub struct Bootstrap {
    worlds: CustomWorlds,
    order: Box<dyn MemberOrder>,
    outcome: Option<Result<DefaultSystems, BootstrapError>>,
}

impl Bootstrap {
    /// Context with pre-declared custom worlds. World names must be unique.
    pub fn new(worlds: impl IntoIterator<Item = CustomWorld>) -> Result<Self, BootstrapError> {
        let mut declared = CustomWorlds::new();
        for world in worlds {
            let name = world.name().to_string();
            if !declared.declare(world) {
                return Err(BootstrapError::DuplicateWorld(name));
            }
        }
        Ok(Self {
            worlds: declared,
            order: Box::new(InsertionOrder),
            outcome: None,
        })
    }

    pub fn from_config(config: &BootstrapConfig) -> Result<Self, BootstrapError> {
        let bootstrap = Self::new(config.worlds.iter().map(|w| w.to_custom_world()))?;
        Ok(bootstrap.with_order_boxed(config.ordering.strategy()))
    }

    /// Replace the ordering used whenever a group is re-sorted.
    pub fn with_order(self, order: impl MemberOrder + 'static) -> Self {
        self.with_order_boxed(Box::new(order))
    }

    fn with_order_boxed(mut self, order: Box<dyn MemberOrder>) -> Self {
        self.order = order;
        self
    }

    pub fn has_run(&self) -> bool {
        self.outcome.is_some()
    }

    /// Custom world plans, complete once [`initialize`](Bootstrap::initialize) has run.
    pub fn custom_worlds(&self) -> &CustomWorlds {
        &self.worlds
    }

    /// Assign systems, build every custom world and return the default systems.
    ///
    /// Runs at most once; a repeated call returns the first outcome, including
    /// the first error.
    pub fn initialize(
        &mut self,
        registry: &Registry,
        universe: &mut Universe,
    ) -> Result<&DefaultSystems, BootstrapError> {
        let Bootstrap {
            worlds,
            order,
            outcome,
        } = self;
        if outcome.is_some() {
            tracing::debug!("bootstrap already ran, returning previous result");
        }
        let outcome =
            outcome.get_or_insert_with(|| run(worlds, &**order, registry, universe));
        outcome.as_ref().map_err(Clone::clone)
    }
}

fn run(
    worlds: &mut CustomWorlds,
    order: &dyn MemberOrder,
    registry: &Registry,
    universe: &mut Universe,
) -> Result<DefaultSystems, BootstrapError> {
    let _span = tracing::info_span!("bootstrap", systems = registry.len()).entered();

    classify(registry, worlds);
    duplicate(registry, worlds);
    resolve_groups(registry, worlds)?;

    for world in worlds.iter() {
        build_world(universe, registry, world, order)?;
    }

    let default = universe.default_world_mut();
    for phase in RootPhase::ALL {
        let node = NodeId::Phase(phase);
        default.get_or_create_group(&node)?;
        default.sort_group(&node, order)?;
    }

    let explicit: BTreeSet<&SystemId> = worlds.iter().flat_map(|w| w.explicit()).collect();
    let defaults: Vec<SystemId> = registry
        .ids()
        .filter(|id| !explicit.contains(id))
        .cloned()
        .collect();

    tracing::info!(
        custom_worlds = worlds.len(),
        default_systems = defaults.len(),
        "bootstrap complete"
    );
    Ok(DefaultSystems(defaults))
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiworld_common::SystemDescriptor;
    use multiworld_kernel::{LexicalOrder, MemberRef, DEFAULT_WORLD_NAME};

    fn ids(defaults: &DefaultSystems) -> Vec<&str> {
        defaults.iter().map(SystemId::as_str).collect()
    }

    fn scenario() -> Registry {
        Registry::new(vec![
            SystemDescriptor::new("A").in_world("Physics"),
            SystemDescriptor::new("B").implements("IRenderOnly"),
            SystemDescriptor::new("C").with_category("Foo.Render"),
            SystemDescriptor::new("D").with_category("Game.Logic"),
        ])
        .unwrap()
    }

    fn render_world() -> CustomWorld {
        CustomWorld::new("Render")
            .with_interface("IRenderOnly")
            .with_duplicate_namespace("Foo.Render")
    }

    #[test]
    fn physics_and_render_scenario() {
        let reg = scenario();
        let mut universe = Universe::default();
        let mut bootstrap =
            Bootstrap::new([CustomWorld::new("Physics"), render_world()]).unwrap();
        let defaults = bootstrap.initialize(&reg, &mut universe).unwrap().clone();

        let worlds = bootstrap.custom_worlds();
        let created = |name: &str| -> Vec<String> {
            worlds
                .get(name)
                .unwrap()
                .systems_to_create()
                .iter()
                .map(|id| id.to_string())
                .collect()
        };
        assert_eq!(created("Physics"), vec!["A"]);
        assert_eq!(created("Render"), vec!["B", "C"]);
        assert_eq!(ids(&defaults), vec!["B", "C", "D"]);
    }

    #[test]
    fn repeated_initialize_is_a_no_op() {
        let reg = scenario();
        let mut universe = Universe::default();
        let mut bootstrap = Bootstrap::new([render_world()]).unwrap();

        let first = bootstrap.initialize(&reg, &mut universe).unwrap().clone();
        let events = universe.event_count();
        let hash = universe.state_hash();

        let second = bootstrap.initialize(&reg, &mut universe).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(universe.event_count(), events);
        assert_eq!(universe.state_hash(), hash);
        assert!(bootstrap.has_run());
    }

    #[test]
    fn failure_is_replayed_and_leaves_universe_untouched() {
        let reg = Registry::new(vec![
            SystemDescriptor::new("Ok").in_world("Good"),
            SystemDescriptor::new("Bad").in_world("Broken").in_group("Plain"),
            SystemDescriptor::new("Plain"),
        ])
        .unwrap();
        let mut universe = Universe::default();
        let mut bootstrap = Bootstrap::new([]).unwrap();

        let err = bootstrap.initialize(&reg, &mut universe).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidGroupTarget { .. }));
        assert_eq!(universe.world_count(), 1);
        assert_eq!(universe.event_count(), 0);

        assert_eq!(bootstrap.initialize(&reg, &mut universe).unwrap_err(), err);
    }

    #[test]
    fn duplicate_declared_world_rejected() {
        let err = Bootstrap::new([CustomWorld::new("X"), CustomWorld::new("X")])
            .err()
            .unwrap();
        assert_eq!(err, BootstrapError::DuplicateWorld("X".into()));
    }

    #[test]
    fn default_root_phases_sorted_once_after_linking() {
        let reg = Registry::new(vec![
            SystemDescriptor::new("Z").in_world("Zeta"),
            SystemDescriptor::new("A").in_world("Alpha"),
        ])
        .unwrap();
        let mut universe = Universe::default();
        let mut bootstrap = Bootstrap::new([]).unwrap().with_order(LexicalOrder);
        bootstrap.initialize(&reg, &mut universe).unwrap();

        let default = universe.default_world();
        for phase in RootPhase::ALL {
            let inst = default.get_existing(&NodeId::Phase(phase)).unwrap();
            let group = inst.as_group().unwrap();
            assert_eq!(group.sort_count(), 1);
            assert_eq!(
                group.members(),
                &[MemberRef::new("Alpha", phase), MemberRef::new("Zeta", phase)]
            );
        }
    }

    #[test]
    fn tagging_the_default_world_builds_in_place() {
        let reg = Registry::new(vec![
            SystemDescriptor::new("A").in_world(DEFAULT_WORLD_NAME),
            SystemDescriptor::new("B"),
        ])
        .unwrap();
        let mut universe = Universe::default();
        let mut bootstrap = Bootstrap::new([]).unwrap();
        let defaults = bootstrap.initialize(&reg, &mut universe).unwrap();

        assert_eq!(ids(defaults), vec!["B"]);
        let sim = NodeId::Phase(RootPhase::Simulation);
        let group = universe
            .default_world()
            .get_existing(&sim)
            .unwrap()
            .as_group()
            .unwrap();
        assert_eq!(group.members(), &[MemberRef::new(DEFAULT_WORLD_NAME, SystemId::new("A"))]);
        assert_eq!(group.sort_count(), 1);
    }

    #[test]
    fn explicit_groups_leave_default_systems() {
        let reg = Registry::new(vec![
            SystemDescriptor::new("A").in_world("W").in_group("G"),
            SystemDescriptor::group("G"),
            SystemDescriptor::new("B").in_group("G"),
        ])
        .unwrap();
        let mut universe = Universe::default();
        let mut bootstrap = Bootstrap::new([]).unwrap();
        let defaults = bootstrap.initialize(&reg, &mut universe).unwrap();
        assert_eq!(ids(defaults), vec!["B"]);
    }
}
