//! World Kernel: per-world instance arenas, group hierarchies, cross-world links.
//!
//! # Invariants
//! - Instances are owned by exactly one world; a group of the same id in two
//!   worlds is two distinct instances.
//! - Member lists are ordered and never hold the same reference twice.
//! - Every mutation is recorded in the owning world's event log.

pub mod order;
pub mod universe;
pub mod world;

pub use order::{InsertionOrder, LexicalOrder, MemberOrder};
pub use universe::{PlanStep, Universe, DEFAULT_WORLD_NAME};
pub use world::{Group, Instance, InstanceKind, MemberRef, NodeId, World, WorldError, WorldEvent};
