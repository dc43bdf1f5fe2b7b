use multiworld_common::{InterfaceId, SystemId};
use std::collections::BTreeSet;

/// Placement plan for one custom world.
///
/// Filled in by the classify, duplicate and resolve steps, then consumed by
/// [`build_world`](crate::build_world).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomWorld {
    name: String,
    /// Interfaces whose implementors are added to this world.
    interfaces: BTreeSet<InterfaceId>,
    /// Category prefixes whose systems are duplicated into this world.
    duplicate_namespaces: Vec<String>,
    pub(crate) explicit: BTreeSet<SystemId>,
    pub(crate) filtered: BTreeSet<SystemId>,
    pub(crate) duplicated: BTreeSet<SystemId>,
    pub(crate) systems_to_create: Vec<SystemId>,
}

impl CustomWorld {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interfaces: BTreeSet::new(),
            duplicate_namespaces: Vec::new(),
            explicit: BTreeSet::new(),
            filtered: BTreeSet::new(),
            duplicated: BTreeSet::new(),
            systems_to_create: Vec::new(),
        }
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.insert(InterfaceId::new(interface));
        self
    }

    pub fn with_duplicate_namespace(mut self, prefix: impl Into<String>) -> Self {
        self.duplicate_namespaces.push(prefix.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interfaces(&self) -> &BTreeSet<InterfaceId> {
        &self.interfaces
    }

    pub fn duplicate_namespaces(&self) -> &[String] {
        &self.duplicate_namespaces
    }

    /// Systems placed by world tag, plus groups that inherited that placement.
    pub fn explicit(&self) -> &BTreeSet<SystemId> {
        &self.explicit
    }

    /// Systems placed because they implement a filtered interface.
    pub fn filtered(&self) -> &BTreeSet<SystemId> {
        &self.filtered
    }

    /// Systems selected by category prefix.
    pub fn duplicated(&self) -> &BTreeSet<SystemId> {
        &self.duplicated
    }

    /// Everything that will be instantiated in this world, in build order.
    pub fn systems_to_create(&self) -> &[SystemId] {
        &self.systems_to_create
    }

    pub fn creates(&self, id: &SystemId) -> bool {
        self.systems_to_create.contains(id)
    }

    /// Append to the creation list unless already present.
    pub(crate) fn push_to_create(&mut self, id: &SystemId) -> bool {
        if self.creates(id) {
            return false;
        }
        self.systems_to_create.push(id.clone());
        true
    }
}

/// Custom worlds in declaration order; names are unique.
#[derive(Debug, Clone, Default)]
pub struct CustomWorlds {
    worlds: Vec<CustomWorld>,
}

impl CustomWorlds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pre-declared world. Returns `false` if the name is already taken.
    pub fn declare(&mut self, world: CustomWorld) -> bool {
        if self.get(world.name()).is_some() {
            return false;
        }
        self.worlds.push(world);
        true
    }

    /// Find a world by name, creating an empty one on first reference.
    pub fn get_or_insert(&mut self, name: &str) -> &mut CustomWorld {
        let index = match self.worlds.iter().position(|w| w.name == name) {
            Some(i) => i,
            None => {
                tracing::debug!(world = name, "custom world discovered from tag");
                self.worlds.push(CustomWorld::new(name));
                self.worlds.len() - 1
            }
        };
        &mut self.worlds[index]
    }

    pub fn get(&self, name: &str) -> Option<&CustomWorld> {
        self.worlds.iter().find(|w| w.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomWorld> + '_ {
        self.worlds.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CustomWorld> + '_ {
        self.worlds.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}
