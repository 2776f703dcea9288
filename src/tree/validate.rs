//! Structural self-checks.

use super::node::Node;
use super::RrbTree;
use crate::config::{TreeConfig, branches, child_capacity, child_shift, leaf_capacity};
use crate::error::TreeError;

impl<T, C: TreeConfig> RrbTree<T, C> {
    /// Walks the whole tree and checks every structural invariant: node
    /// capacities, size tables, leaf placement and the tail rule.
    ///
    /// # Errors
    ///
    /// Returns the first broken invariant found.
    ///
    /// # Complexity
    ///
    /// O(n / 2^BL): every node is visited once.
    pub fn validate(&self) -> Result<(), TreeError> {
        let tail_len = self.tail_len();
        if (tail_len == 0) != (self.size == 0) {
            return Err(TreeError::TailInvariant {
                tail_len,
                size: self.size,
            });
        }
        if tail_len > leaf_capacity::<C>() {
            return Err(TreeError::NodeOverflow {
                shift: 0,
                len: tail_len,
                capacity: leaf_capacity::<C>(),
            });
        }

        let tree_size = match &self.root {
            None if self.shift != 0 => {
                return Err(TreeError::ShiftMismatch {
                    kind: "empty root",
                    shift: self.shift,
                });
            }
            None => 0,
            Some(root) => check_node::<T, C>(root, self.shift)?,
        };
        if tree_size + tail_len != self.size {
            return Err(TreeError::SizeMismatch {
                recorded: self.size,
                actual: tree_size + tail_len,
            });
        }
        Ok(())
    }
}

/// Checks the subtree at `shift` and returns its element count.
fn check_node<T, C: TreeConfig>(node: &Node<T, C>, shift: u32) -> Result<usize, TreeError> {
    match node {
        Node::Leaf(leaf) => {
            let len = leaf.elements.len();
            if shift != 0 {
                return Err(TreeError::ShiftMismatch { kind: "leaf", shift });
            }
            if len == 0 {
                return Err(TreeError::EmptyNode { shift });
            }
            if len > leaf_capacity::<C>() {
                return Err(TreeError::NodeOverflow {
                    shift,
                    len,
                    capacity: leaf_capacity::<C>(),
                });
            }
            Ok(len)
        }
        Node::Inner(inner) => {
            let len = inner.children.len();
            if shift == 0 {
                return Err(TreeError::ShiftMismatch {
                    kind: "internal node",
                    shift,
                });
            }
            if len == 0 {
                return Err(TreeError::EmptyNode { shift });
            }
            if len > branches::<C>() {
                return Err(TreeError::NodeOverflow {
                    shift,
                    len,
                    capacity: branches::<C>(),
                });
            }
            if let Some(sizes) = &inner.sizes
                && sizes.len() != len
            {
                return Err(TreeError::SizeTableMismatch {
                    shift,
                    slot: sizes.len().min(len),
                    recorded: sizes.last().copied().unwrap_or(0),
                    actual: 0,
                });
            }

            let full = child_capacity(shift);
            let mut total = 0;
            for (slot, child) in inner.children.iter().enumerate() {
                let child_len = check_node::<T, C>(child, child_shift::<C>(shift))?;
                if child_len > full {
                    return Err(TreeError::NodeOverflow {
                        shift,
                        len: child_len,
                        capacity: full,
                    });
                }
                total += child_len;
                match &inner.sizes {
                    Some(sizes) if sizes[slot] != total => {
                        return Err(TreeError::SizeTableMismatch {
                            shift,
                            slot,
                            recorded: sizes[slot],
                            actual: total,
                        });
                    }
                    None if slot + 1 < len && child_len != full => {
                        return Err(TreeError::IrregularNode {
                            shift,
                            slot,
                            len: child_len,
                            capacity: full,
                        });
                    }
                    _ => {}
                }
            }
            Ok(total)
        }
    }
}
