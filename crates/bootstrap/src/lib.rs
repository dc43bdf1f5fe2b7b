//! Multi-world bootstrap: partitions the system registry across custom worlds
//! and builds every world's group hierarchy before ticking starts.
//!
//! Pipeline, run once per [`Bootstrap`]:
//! 1. [`classify`] places systems by world tag and interface filter.
//! 2. [`duplicate`] copies systems into worlds by category prefix.
//! 3. [`resolve_groups`] ascends group chains and discovers intermediate groups.
//! 4. [`build_world`] materializes each world and links its root phases into
//!    the default world.
//!
//! # Invariants
//! - Every fatal check runs before the first world is touched.
//! - A system placed by tag is never returned in [`DefaultSystems`].

mod bootstrap;
mod build;
mod classify;
pub mod config;
mod custom_world;
mod duplicate;
mod error;
mod resolve;

pub use bootstrap::{Bootstrap, DefaultSystems};
pub use build::build_world;
pub use classify::classify;
pub use config::{BootstrapConfig, ConfigError, MemberOrdering, WorldConfig};
pub use custom_world::{CustomWorld, CustomWorlds};
pub use duplicate::{category_matches, duplicate};
pub use error::{BootstrapError, TargetFault};
pub use resolve::resolve_groups;

pub fn crate_info() -> &'static str {
    "multiworld-bootstrap v0.1.0"
}
