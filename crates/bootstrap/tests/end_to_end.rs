use multiworld_bootstrap::{Bootstrap, BootstrapConfig, BootstrapError};
use multiworld_common::{Registry, RootPhase, SystemId};
use multiworld_kernel::{NodeId, DEFAULT_WORLD_NAME};

const REGISTRY: &str = include_str!("fixtures/registry.yaml");
const WORLDS: &str = include_str!("fixtures/worlds.yaml");
const CYCLIC: &str = include_str!("fixtures/cyclic.yaml");

fn strings<'a>(ids: impl IntoIterator<Item = &'a SystemId>) -> Vec<&'a str> {
    ids.into_iter().map(SystemId::as_str).collect()
}

#[test]
fn fixture_bootstrap_partitions_and_links() {
    let registry = Registry::from_yaml_str(REGISTRY).unwrap();
    let config = BootstrapConfig::from_yaml_str(WORLDS).unwrap();
    let mut universe = config.universe();
    let mut bootstrap = Bootstrap::from_config(&config).unwrap();

    let defaults = bootstrap.initialize(&registry, &mut universe).unwrap().clone();

    // physics chain is explicit all the way up, so none of it stays in the default world
    assert_eq!(
        strings(defaults.iter()),
        vec![
            "Game.Rendering.CullingSystem",
            "Game.Rendering.Lights.ShadowSystem",
            "Game.Rendering.LightingGroup",
            "Game.RenderingTools.DebugDraw",
            "Game.Input.PollSystem",
            "Game.Logic.ScoreSystem",
        ]
    );

    let worlds = bootstrap.custom_worlds();
    assert_eq!(
        strings(worlds.get("Physics").unwrap().systems_to_create()),
        vec![
            "Game.Physics.StepSystem",
            "Game.Physics.PhysicsGroup",
            "Game.Physics.FixedStepGroup",
        ]
    );
    assert_eq!(
        strings(worlds.get("Render").unwrap().systems_to_create()),
        vec![
            "Game.Rendering.CullingSystem",
            "Game.Rendering.Lights.ShadowSystem",
            "Game.Rendering.LightingGroup",
        ]
    );

    let physics = universe.world("Physics").unwrap();
    let fixed = NodeId::System("Game.Physics.FixedStepGroup".into());
    let members = physics.members(&fixed).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].node.label(), "Game.Physics.PhysicsGroup");

    for phase in RootPhase::ALL {
        let linked: Vec<&str> = universe
            .default_world()
            .members(&NodeId::Phase(phase))
            .unwrap()
            .iter()
            .map(|m| m.world.as_str())
            .collect();
        assert_eq!(linked, vec!["Physics", "Render"]);
    }
}

#[test]
fn fixture_execution_plan_reaches_every_custom_system() {
    let registry = Registry::from_yaml_str(REGISTRY).unwrap();
    let config = BootstrapConfig::from_yaml_str(WORLDS).unwrap();
    let mut universe = config.universe();
    let mut bootstrap = Bootstrap::from_config(&config).unwrap();
    bootstrap.initialize(&registry, &mut universe).unwrap();

    let plan = universe.execution_plan();
    for world in bootstrap.custom_worlds().iter() {
        for id in world.systems_to_create() {
            assert!(
                plan.iter()
                    .any(|s| s.world == world.name() && s.node.label() == id.as_str()),
                "{id} in {} is never ticked",
                world.name()
            );
        }
    }
    // the default world's own phases come first in every phase slot
    assert_eq!(plan[0].world, DEFAULT_WORLD_NAME);
    assert_eq!(plan[0].depth, 0);
}

#[test]
fn fixture_cycle_aborts_before_building() {
    let registry = Registry::from_yaml_str(CYCLIC).unwrap();
    let config = BootstrapConfig::default();
    let mut universe = config.universe();
    let mut bootstrap = Bootstrap::from_config(&config).unwrap();

    let err = bootstrap.initialize(&registry, &mut universe).unwrap_err();
    assert!(matches!(err, BootstrapError::GroupCycle { ref world, .. } if world == "Ai"));
    assert_eq!(universe.world_count(), 1);
    assert_eq!(universe.event_count(), 0);
}
