use multiworld_common::SystemId;
use multiworld_kernel::WorldError;
use std::fmt;

/// Why a declared parent cannot be used as a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFault {
    /// Not present in the registry.
    Unknown,
    /// Registered, but a plain system.
    NotAGroup,
}

impl fmt::Display for TargetFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFault::Unknown => f.write_str("not a registered system"),
            TargetFault::NotAGroup => f.write_str("not a system group"),
        }
    }
}

/// Errors that abort the bootstrap pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    #[error("system {system} is trying to update in {target}, which is {fault}")]
    InvalidGroupTarget {
        system: SystemId,
        target: SystemId,
        fault: TargetFault,
    },
    #[error("group {group} is part of a cyclic group chain in world {world}")]
    GroupCycle { world: String, group: SystemId },
    #[error("custom world {0} is declared more than once")]
    DuplicateWorld(String),
    #[error(transparent)]
    World(#[from] WorldError),
}
