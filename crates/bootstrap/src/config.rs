//! Bootstrap configuration: default world name, group ordering, pre-declared worlds.
//!
//! ```text
//! default_world: Default World
//! ordering: lexical
//! worlds:
//!   - name: Render
//!     interfaces: [IRenderOnly]
//!     duplicate_namespaces: [Game.Rendering]
//! ```

use crate::custom_world::CustomWorld;
use multiworld_common::InterfaceId;
use multiworld_kernel::{InsertionOrder, LexicalOrder, MemberOrder, Universe, DEFAULT_WORLD_NAME};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("world {0} is declared more than once")]
    DuplicateWorld(String),
    #[error("world names must not be empty")]
    EmptyWorldName,
}

/// Which [`MemberOrder`] re-sorts group member lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberOrdering {
    #[default]
    Insertion,
    Lexical,
}

impl MemberOrdering {
    pub fn strategy(self) -> Box<dyn MemberOrder> {
        match self {
            MemberOrdering::Insertion => Box::new(InsertionOrder),
            MemberOrdering::Lexical => Box::new(LexicalOrder),
        }
    }
}

/// A custom world declared up front, before any tag references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub name: String,
    #[serde(default)]
    pub interfaces: Vec<InterfaceId>,
    #[serde(default)]
    pub duplicate_namespaces: Vec<String>,
}

impl WorldConfig {
    pub fn to_custom_world(&self) -> CustomWorld {
        let world = self
            .interfaces
            .iter()
            .fold(CustomWorld::new(&self.name), |w, i| w.with_interface(i.0.clone()));
        self.duplicate_namespaces
            .iter()
            .fold(world, |w, ns| w.with_duplicate_namespace(ns.clone()))
    }
}

fn default_world_name() -> String {
    DEFAULT_WORLD_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_world_name")]
    pub default_world: String,
    #[serde(default)]
    pub ordering: MemberOrdering,
    #[serde(default)]
    pub worlds: Vec<WorldConfig>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            default_world: default_world_name(),
            ordering: MemberOrdering::default(),
            worlds: Vec::new(),
        }
    }
}

impl BootstrapConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_world.trim().is_empty() {
            return Err(ConfigError::EmptyWorldName);
        }
        let mut seen = BTreeSet::new();
        for world in &self.worlds {
            if world.name.trim().is_empty() {
                return Err(ConfigError::EmptyWorldName);
            }
            if !seen.insert(world.name.as_str()) {
                return Err(ConfigError::DuplicateWorld(world.name.clone()));
            }
        }
        Ok(())
    }

    /// A fresh universe holding only the configured default world.
    pub fn universe(&self) -> Universe {
        Universe::new(self.default_world.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let config = BootstrapConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, BootstrapConfig::default());
        assert_eq!(config.universe().default_world_name(), DEFAULT_WORLD_NAME);
    }

    #[test]
    fn parses_yaml_worlds() {
        let yaml = r#"
default_world: Main
ordering: lexical
worlds:
  - name: Render
    interfaces: [IRenderOnly]
    duplicate_namespaces: [Foo.Render]
  - name: Physics
"#;
        let config = BootstrapConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.default_world, "Main");
        assert_eq!(config.ordering, MemberOrdering::Lexical);
        assert_eq!(config.worlds.len(), 2);

        let render = config.worlds[0].to_custom_world();
        assert_eq!(render.name(), "Render");
        assert!(render.interfaces().contains(&InterfaceId::new("IRenderOnly")));
        assert_eq!(render.duplicate_namespaces(), &["Foo.Render".to_string()]);
    }

    #[test]
    fn parses_json() {
        let config =
            BootstrapConfig::from_json_str(r#"{"worlds":[{"name":"Physics"}]}"#).unwrap();
        assert_eq!(config.worlds[0].name, "Physics");
        assert_eq!(config.ordering, MemberOrdering::Insertion);
    }

    #[test]
    fn duplicate_world_rejected() {
        let yaml = "worlds:\n  - name: A\n  - name: A\n";
        assert!(matches!(
            BootstrapConfig::from_yaml_str(yaml),
            Err(ConfigError::DuplicateWorld(name)) if name == "A"
        ));
    }

    #[test]
    fn empty_world_name_rejected() {
        assert!(matches!(
            BootstrapConfig::from_yaml_str("worlds:\n  - name: ' '\n"),
            Err(ConfigError::EmptyWorldName)
        ));
    }

    #[test]
    fn unknown_ordering_rejected() {
        assert!(matches!(
            BootstrapConfig::from_yaml_str("ordering: random"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
