//! Sibling ordering inside a group's update list.
//!
//! Real ordering constraints (before/after declarations) belong to the host
//! scheduler; the kernel only guarantees when a re-sort is requested.

use crate::world::{MemberRef, NodeId};

/// Strategy invoked whenever a group's member list is re-sorted.
pub trait MemberOrder {
    fn sort(&self, group: &NodeId, members: &mut [MemberRef]);
}

/// Keeps members in the order they were attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionOrder;

impl MemberOrder for InsertionOrder {
    fn sort(&self, _group: &NodeId, _members: &mut [MemberRef]) {}
}

/// Orders members by node label, then by owning world.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalOrder;

impl MemberOrder for LexicalOrder {
    fn sort(&self, _group: &NodeId, members: &mut [MemberRef]) {
        members.sort_by(|a, b| {
            a.node
                .label()
                .cmp(b.node.label())
                .then_with(|| a.world.cmp(&b.world))
        });
    }
}
