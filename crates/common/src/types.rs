use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identity of a system or system group, usually its fully qualified type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub String);

impl SystemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SystemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identity of a capability interface a system may implement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceId(pub String);

impl InterfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InterfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The three fixed phases at the top of every world's group hierarchy.
///
/// Declaration order is tick order: initialization runs first, presentation last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RootPhase {
    Initialization,
    Simulation,
    Presentation,
}

impl RootPhase {
    pub const ALL: [RootPhase; 3] = [
        RootPhase::Initialization,
        RootPhase::Simulation,
        RootPhase::Presentation,
    ];

    /// Canonical group id used to reference this phase in descriptor tables.
    pub fn group_id(self) -> &'static str {
        match self {
            RootPhase::Initialization => "InitializationSystemGroup",
            RootPhase::Simulation => "SimulationSystemGroup",
            RootPhase::Presentation => "PresentationSystemGroup",
        }
    }

    /// Map a declared parent group back to a root phase, if it names one.
    pub fn from_group_id(id: &SystemId) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.group_id() == id.as_str())
    }
}

impl fmt::Display for RootPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.group_id())
    }
}

/// Whether a descriptor is a plain system or a group that can contain members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    #[default]
    System,
    Group,
}

/// Declared metadata for one system, pre-parsed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDescriptor {
    pub id: SystemId,
    #[serde(default)]
    pub kind: SystemKind,
    /// Names of the worlds this system is explicitly placed in.
    #[serde(default)]
    pub worlds: Vec<String>,
    /// Group this system updates in. `None` means the simulation phase.
    #[serde(default)]
    pub group: Option<SystemId>,
    #[serde(default)]
    pub interfaces: BTreeSet<InterfaceId>,
    /// Dot-separated namespace path, e.g. `Physics.Broadphase`.
    #[serde(default)]
    pub category: String,
}

impl SystemDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: SystemId::new(id),
            kind: SystemKind::System,
            worlds: Vec::new(),
            group: None,
            interfaces: BTreeSet::new(),
            category: String::new(),
        }
    }

    /// Shorthand for a descriptor of kind [`SystemKind::Group`].
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            kind: SystemKind::Group,
            ..Self::new(id)
        }
    }

    pub fn in_world(mut self, world: impl Into<String>) -> Self {
        self.worlds.push(world.into());
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(SystemId::new(group));
        self
    }

    pub fn in_phase(mut self, phase: RootPhase) -> Self {
        self.group = Some(SystemId::new(phase.group_id()));
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.insert(InterfaceId::new(interface));
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn is_group(&self) -> bool {
        self.kind == SystemKind::Group
    }

    /// World tags with surrounding quotes and whitespace removed; blank tags are skipped.
    pub fn world_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.worlds
            .iter()
            .map(|w| w.trim().trim_matches('"').trim())
            .filter(|w| !w.is_empty())
    }

    /// The root phase this descriptor's parent names, if any.
    pub fn parent_phase(&self) -> Option<RootPhase> {
        self.group.as_ref().and_then(RootPhase::from_group_id)
    }
}
