//! Developer Tooling: read-only views over a bootstrapped universe.
//!
//! # Invariants
//! - Tools never mutate world graphs.

mod inspector;

pub use inspector::{UniverseInspector, UniverseReport, WorldReport, WorldSummary};

pub fn crate_info() -> &'static str {
    "multiworld-tools v0.1.0"
}
