//! Descriptor table supplied by the host.
//!
//! Tables can be built in memory or loaded from YAML/JSON:
//! ```text
//! systems:
//!   - id: Game.Physics.StepSystem
//!     worlds: [Physics]
//!     group: Game.Physics.PhysicsGroup
//!     interfaces: [IFixedStep]
//!     category: Game.Physics
//! ```

use crate::types::{RootPhase, SystemDescriptor, SystemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors from building or loading a descriptor table.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },
    #[error("YAML error: {0}")]
    Yaml(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("unsupported table format: {0}")]
    UnsupportedFormat(String),
    #[error("system {0} is declared more than once")]
    DuplicateSystem(SystemId),
    #[error("system id {0} is reserved for a root phase")]
    ReservedId(SystemId),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryTable {
    #[serde(default)]
    systems: Vec<SystemDescriptor>,
}

/// Ordered, immutable collection of system descriptors indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    systems: Vec<SystemDescriptor>,
    index: BTreeMap<SystemId, usize>,
}

impl Registry {
    /// Build a registry, rejecting duplicate ids and ids reserved for root phases.
    pub fn new(systems: Vec<SystemDescriptor>) -> Result<Self, RegistryError> {
        let mut index = BTreeMap::new();
        for (i, d) in systems.iter().enumerate() {
            if RootPhase::from_group_id(&d.id).is_some() {
                return Err(RegistryError::ReservedId(d.id.clone()));
            }
            if index.insert(d.id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateSystem(d.id.clone()));
            }
        }
        tracing::debug!(systems = systems.len(), "registry built");
        Ok(Self { systems, index })
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, RegistryError> {
        let table: RegistryTable =
            serde_yaml::from_str(s).map_err(|e| RegistryError::Yaml(e.to_string()))?;
        Self::new(table.systems)
    }

    pub fn from_json_str(s: &str) -> Result<Self, RegistryError> {
        let table: RegistryTable =
            serde_json::from_str(s).map_err(|e| RegistryError::Json(e.to_string()))?;
        Self::new(table.systems)
    }

    /// Load a table from disk, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(RegistryError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn get(&self, id: &SystemId) -> Option<&SystemDescriptor> {
        self.index.get(id).map(|&i| &self.systems[i])
    }

    pub fn contains(&self, id: &SystemId) -> bool {
        self.index.contains_key(id)
    }

    /// Descriptors in the caller's original order.
    pub fn iter(&self) -> impl Iterator<Item = &SystemDescriptor> + '_ {
        self.systems.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SystemId> + '_ {
        self.systems.iter().map(|d| &d.id)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
