//! Structural errors reported by [`RrbTree::validate`](crate::tree::RrbTree::validate).

use thiserror::Error;

/// A broken tree invariant.
///
/// These are never produced by the public editing operations; they exist so
/// tests and debugging sessions can check a tree's shape after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The recorded element count disagrees with the nodes.
    #[error("tree records {recorded} elements but holds {actual}")]
    SizeMismatch {
        /// Count stored on the tree.
        recorded: usize,
        /// Count found by walking the nodes.
        actual: usize,
    },

    /// A node holds more slots than its capacity.
    #[error("node at shift {shift} holds {len} slots, capacity is {capacity}")]
    NodeOverflow {
        /// Shift of the offending node.
        shift: u32,
        /// Slots present.
        len: usize,
        /// Slots allowed.
        capacity: usize,
    },

    /// A node below the root holds nothing.
    #[error("empty node at shift {shift}")]
    EmptyNode {
        /// Shift of the offending node.
        shift: u32,
    },

    /// A cumulative size table disagrees with the subtrees it describes.
    #[error("size table of node at shift {shift} records {recorded} at slot {slot}, subtrees hold {actual}")]
    SizeTableMismatch {
        /// Shift of the offending node.
        shift: u32,
        /// Slot whose entry is wrong.
        slot: usize,
        /// Cumulative size stored in the table.
        recorded: usize,
        /// Cumulative size found by walking the subtrees.
        actual: usize,
    },

    /// A node without a size table has a non-final child that is not full.
    #[error("node at shift {shift} has no size table but child {slot} holds {len} of {capacity}")]
    IrregularNode {
        /// Shift of the offending node.
        shift: u32,
        /// Child that is short.
        slot: usize,
        /// Elements under that child.
        len: usize,
        /// Elements a full child holds.
        capacity: usize,
    },

    /// A leaf sits away from shift 0 or an internal node sits at shift 0.
    #[error("{kind} found at shift {shift}")]
    ShiftMismatch {
        /// `"leaf"`, `"internal node"` or `"empty root"`.
        kind: &'static str,
        /// Shift where it was found.
        shift: u32,
    },

    /// The tail is empty in a non-empty tree, or the other way around.
    #[error("tail holds {tail_len} elements in a tree of {size}")]
    TailInvariant {
        /// Elements in the tail.
        tail_len: usize,
        /// Elements in the tree.
        size: usize,
    },
}
