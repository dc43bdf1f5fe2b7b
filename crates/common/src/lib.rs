//! Shared identities and the descriptor table consumed by the bootstrap.
//!
//! # Invariants
//! - Descriptors are immutable once the registry is built.
//! - Registry order is the caller's order and is preserved everywhere.
//! - Root phase ids are reserved and never appear as descriptors.

mod registry;
mod types;

pub use registry::{Registry, RegistryError};
pub use types::{InterfaceId, RootPhase, SystemDescriptor, SystemId, SystemKind};

pub fn crate_info() -> &'static str {
    "multiworld-common v0.1.0"
}
