//! The relaxed radix balanced tree engine.
//!
//! [`RrbTree`] is the persistent core that [`FlexVector`](crate::persistent::FlexVector)
//! and [`TransientFlexVector`](crate::persistent::TransientFlexVector) wrap.
//! It stores a sequence as:
//!
//! - an optional **root** node of height `shift`, holding every element but
//!   the last few
//! - a **tail** leaf holding the last `1..=2^BL` elements (empty only when
//!   the tree is empty), so appends rarely touch the tree proper
//!
//! # Operations
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `get` | O(log n) |
//! | `set` / `update` | O(log n) |
//! | `push_back` | O(1) amortised |
//! | `take` / `drop` | O(log n) |
//! | `concat` | O(log n) |
//! | `for_each_chunk` | O(n) |
//!
//! Every operation leaves its inputs untouched and shares all unchanged
//! nodes with its result.
//!
//! # Examples
//!
//! ```rust
//! use flexvec::tree::RrbTree;
//!
//! let tree: RrbTree<i32> = (0..100).fold(RrbTree::new(), |tree, n| tree.push_back(n));
//! let joined = tree.take(10).concat(&tree.drop(90));
//! assert_eq!(joined.len(), 20);
//! assert_eq!(joined.get(10), Some(&90));
//! assert!(joined.validate().is_ok());
//! ```

mod chunks;
mod concat;
mod growth;
mod node;
mod owner;
mod path;
mod slice;
mod validate;

use std::fmt;

use crate::config::{DefaultConfig, TreeConfig, child_shift};
use crate::policy::OwnershipPolicy;

pub use chunks::Chunks;
pub(crate) use node::{Node, NodeRef};
pub(crate) use owner::Owner;

type Policy<C> = <C as TreeConfig>::Policy;

// =============================================================================
// RrbTree Definition
// =============================================================================

/// A persistent sequence backed by a relaxed radix balanced tree.
///
/// `RrbTree` is the engine under [`FlexVector`](crate::persistent::FlexVector).
/// Its editing operations take `&self` and return a new tree.
///
/// # Type Parameters
///
/// - `T`: element type
/// - `C`: geometry and ownership policy, see [`TreeConfig`]
pub struct RrbTree<T, C: TreeConfig = DefaultConfig> {
    size: usize,
    shift: u32,
    root: Option<NodeRef<T, C>>,
    tail: NodeRef<T, C>,
}

impl<T, C: TreeConfig> RrbTree<T, C> {
    /// Creates an empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::tree::RrbTree;
    ///
    /// let tree: RrbTree<i32> = RrbTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: 0,
            shift: 0,
            root: None,
            tail: Node::<T, C>::leaf_ref(Owner::NONE, Vec::new()),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of levels in the tree proper, excluding the tail.
    ///
    /// A tree whose elements all fit in the tail has height 0.
    #[must_use]
    pub fn height(&self) -> usize {
        if self.root.is_none() {
            return 0;
        }
        let mut levels = 1;
        let mut shift = self.shift;
        while shift > 0 {
            shift = child_shift::<C>(shift);
            levels += 1;
        }
        levels
    }

    /// Returns `true` if both trees are the same value by identity: same
    /// length, same root node and same tail node.
    ///
    /// This is a constant-time structural check; equal contents built
    /// separately are not identical.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let roots_match = match (&self.root, &other.root) {
            (None, None) => true,
            (Some(left), Some(right)) => Policy::<C>::ptr_eq(left, right),
            _ => false,
        };
        self.size == other.size
            && self.shift == other.shift
            && roots_match
            && Policy::<C>::ptr_eq(&self.tail, &other.tail)
    }

    #[inline]
    pub(crate) fn tail_len(&self) -> usize {
        self.tail.len()
    }

    /// Index of the first tail element, which is also the size of the tree proper.
    #[inline]
    pub(crate) fn tail_offset(&self) -> usize {
        self.size - self.tail_len()
    }
}

impl<T, C: TreeConfig> Clone for RrbTree<T, C> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            shift: self.shift,
            root: self.root.clone(),
            tail: self.tail.clone(),
        }
    }
}

impl<T, C: TreeConfig> Default for RrbTree<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C: TreeConfig> fmt::Debug for RrbTree<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RrbTree")
            .field("size", &self.size)
            .field("shift", &self.shift)
            .field("tail", &self.tail.elements())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
