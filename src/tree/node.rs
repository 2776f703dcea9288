//! Tree nodes and the shared-handle helpers built on them.
//!
//! A [`Node`] is either a leaf holding elements or an internal node holding
//! child handles. Internal nodes come in two flavours:
//!
//! - **regular** (`sizes == None`): every child except the last is full, so
//!   the child holding an index is found with a shift
//! - **relaxed** (`sizes == Some(..)`): a cumulative size table records the
//!   number of elements under the first `i + 1` children

use std::mem;

use super::owner::Owner;
use crate::config::{TreeConfig, child_capacity, leaf_capacity, parent_shift};
use crate::policy::OwnershipPolicy;

/// Shared handle to a node under the policy of `C`.
pub(crate) type NodeRef<T, C> = <<C as TreeConfig>::Policy as OwnershipPolicy>::Shared<Node<T, C>>;

type Policy<C> = <C as TreeConfig>::Policy;

// =============================================================================
// Node Definitions
// =============================================================================

pub(crate) enum Node<T, C: TreeConfig> {
    Leaf(Leaf<T>),
    Inner(Inner<T, C>),
}

pub(crate) struct Leaf<T> {
    pub(crate) owner: Owner,
    pub(crate) elements: Vec<T>,
}

pub(crate) struct Inner<T, C: TreeConfig> {
    pub(crate) owner: Owner,
    pub(crate) children: Vec<NodeRef<T, C>>,
    /// Cumulative element counts, present only on relaxed nodes.
    pub(crate) sizes: Option<Vec<usize>>,
}

impl<T, C: TreeConfig> Node<T, C> {
    #[inline]
    pub(crate) const fn owner(&self) -> Owner {
        match self {
            Self::Leaf(leaf) => leaf.owner,
            Self::Inner(inner) => inner.owner,
        }
    }

    /// Number of slots: elements of a leaf, children of an internal node.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Leaf(leaf) => leaf.elements.len(),
            Self::Inner(inner) => inner.children.len(),
        }
    }

    #[inline]
    pub(crate) fn elements(&self) -> &[T] {
        match self {
            Self::Leaf(leaf) => &leaf.elements,
            Self::Inner(_) => &[],
        }
    }

    #[inline]
    pub(crate) fn children(&self) -> &[NodeRef<T, C>] {
        match self {
            Self::Leaf(_) => &[],
            Self::Inner(inner) => &inner.children,
        }
    }

    /// Elements of a leaf. Calling this on an internal node is a bug.
    #[inline]
    pub(crate) fn leaf_mut(&mut self) -> &mut Vec<T> {
        match self {
            Self::Leaf(leaf) => &mut leaf.elements,
            Self::Inner(_) => unreachable!("leaf access on an internal node"),
        }
    }

    /// Calling this on a leaf is a bug.
    #[inline]
    pub(crate) fn inner_mut(&mut self) -> &mut Inner<T, C> {
        match self {
            Self::Inner(inner) => inner,
            Self::Leaf(_) => unreachable!("internal access on a leaf"),
        }
    }

    pub(crate) fn leaf_ref(owner: Owner, elements: Vec<T>) -> NodeRef<T, C> {
        Policy::<C>::share(Self::Leaf(Leaf { owner, elements }))
    }

    pub(crate) fn inner_ref(inner: Inner<T, C>) -> NodeRef<T, C> {
        Policy::<C>::share(Self::Inner(inner))
    }
}

impl<T: Clone, C: TreeConfig> Node<T, C> {
    /// Shallow copy stamped with `owner`. Children are retained, not copied.
    pub(crate) fn copy_for(&self, owner: Owner) -> Self {
        match self {
            Self::Leaf(leaf) => {
                let mut elements = Vec::with_capacity(leaf_capacity::<C>().max(leaf.elements.len()));
                elements.extend_from_slice(&leaf.elements);
                Self::Leaf(Leaf { owner, elements })
            }
            Self::Inner(inner) => Self::Inner(Inner {
                owner,
                children: inner.children.clone(),
                sizes: inner.sizes.clone(),
            }),
        }
    }
}

impl<T: Clone, C: TreeConfig> Clone for Node<T, C> {
    fn clone(&self) -> Self {
        self.copy_for(self.owner())
    }
}

// =============================================================================
// Internal Node Arithmetic
// =============================================================================

impl<T, C: TreeConfig> Inner<T, C> {
    /// Builds a node at `shift` over `children`, whose element counts are
    /// `child_sizes`. The size table is kept only if the children are not
    /// regular.
    pub(crate) fn from_sized_children(
        owner: Owner,
        children: Vec<NodeRef<T, C>>,
        child_sizes: &[usize],
        shift: u32,
    ) -> Self {
        let full = child_capacity(shift);
        let last = child_sizes.len().saturating_sub(1);
        let regular = child_sizes[..last].iter().all(|&size| size == full);
        let sizes = (!regular).then(|| {
            child_sizes
                .iter()
                .scan(0, |total, &size| {
                    *total += size;
                    Some(*total)
                })
                .collect()
        });
        Self {
            owner,
            children,
            sizes,
        }
    }

    /// Finds the child holding `index`.
    ///
    /// Returns the slot and the number of elements in the slots before it.
    /// `index` must be smaller than the node's element count.
    #[inline]
    pub(crate) fn locate(&self, index: usize, shift: u32) -> (usize, usize) {
        let guess = index.checked_shr(shift).unwrap_or(0);
        match &self.sizes {
            None => (guess, guess * child_capacity(shift)),
            Some(sizes) => {
                let mut slot = guess;
                while slot + 1 < sizes.len() && sizes[slot] <= index {
                    slot += 1;
                }
                let before = if slot == 0 { 0 } else { sizes[slot - 1] };
                (slot, before)
            }
        }
    }

    /// Elements under `slot`, given that the node holds `node_size`.
    #[inline]
    pub(crate) fn child_size(&self, slot: usize, shift: u32, node_size: usize) -> usize {
        match &self.sizes {
            Some(sizes) => sizes[slot] - if slot == 0 { 0 } else { sizes[slot - 1] },
            None if slot + 1 == self.children.len() => node_size - slot * child_capacity(shift),
            None => child_capacity(shift),
        }
    }

    /// Cumulative size table, materialised for regular nodes.
    pub(crate) fn cumulative_sizes(&self, shift: u32, node_size: usize) -> Vec<usize> {
        if let Some(sizes) = &self.sizes {
            return sizes.clone();
        }
        let full = child_capacity(shift);
        let last = self.children.len().saturating_sub(1);
        (0..self.children.len())
            .map(|slot| if slot == last { node_size } else { (slot + 1) * full })
            .collect()
    }
}

/// Returns `true` if a cumulative table describes full non-final children.
pub(crate) fn table_is_regular(sizes: &[usize], shift: u32) -> bool {
    let full = child_capacity(shift);
    let last = sizes.len().saturating_sub(1);
    sizes[..last]
        .iter()
        .enumerate()
        .all(|(slot, &total)| total == (slot + 1) * full)
}

// =============================================================================
// Ownership Helpers
// =============================================================================

/// Grants mutable access to `node` on behalf of `owner`.
///
/// The node is edited in place only if `owner` is a transient token, the node
/// carries that token, and nobody else holds the node. Otherwise the handle
/// is replaced by a shallow copy stamped with `owner`.
pub(crate) fn node_mut<T: Clone, C: TreeConfig>(node: &mut NodeRef<T, C>, owner: Owner) -> &mut Node<T, C> {
    let editable = owner.is_transient() && node.owner() == owner && Policy::<C>::is_unique(node);
    if !editable {
        *node = Policy::<C>::share(node.copy_for(owner));
    }
    Policy::<C>::make_mut(node)
}

/// Children of `node`, moved out when `owner` may consume it, cloned otherwise.
pub(crate) fn into_children<T, C: TreeConfig>(node: NodeRef<T, C>, owner: Owner) -> Vec<NodeRef<T, C>> {
    if owner.is_transient() && node.owner() == owner {
        match Policy::<C>::try_unwrap(node) {
            Ok(Node::Inner(mut inner)) => return mem::take(&mut inner.children),
            Ok(Node::Leaf(_)) => return Vec::new(),
            Err(shared) => return shared.children().to_vec(),
        }
    }
    node.children().to_vec()
}

/// A chain of single-child nodes from `shift` down to `leaf`.
pub(crate) fn new_path<T, C: TreeConfig>(shift: u32, leaf: NodeRef<T, C>, owner: Owner) -> NodeRef<T, C> {
    let mut node = leaf;
    let mut level = 0;
    while level < shift {
        level = parent_shift::<C>(level);
        node = Node::<T, C>::inner_ref(Inner {
            owner,
            children: vec![node],
            sizes: None,
        });
    }
    node
}

// =============================================================================
// Teardown
// =============================================================================

impl<T, C: TreeConfig> Drop for Inner<T, C> {
    fn drop(&mut self) {
        // Unlink uniquely owned descendants iteratively so dropping a deep
        // tree never recurses once per level.
        let mut pending = mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Ok(Node::Inner(mut inner)) = Policy::<C>::try_unwrap(child) {
                pending.append(&mut inner.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::policy::RcPolicy;
    use rstest::rstest;

    type Tiny = Config<RcPolicy, 2, 2>;

    fn leaf(values: &[i32]) -> NodeRef<i32, Tiny> {
        Node::<i32, Tiny>::leaf_ref(Owner::NONE, values.to_vec())
    }

    #[rstest]
    fn test_regular_children_stay_tableless() {
        let inner = Inner::<i32, Tiny>::from_sized_children(Owner::NONE, vec![leaf(&[1, 2, 3, 4]), leaf(&[5])], &[4, 1], 2);
        assert!(inner.sizes.is_none());
        assert_eq!(inner.locate(4, 2), (1, 4));
        assert_eq!(inner.child_size(1, 2, 5), 1);
    }

    #[rstest]
    fn test_short_prefix_builds_size_table() {
        let inner = Inner::<i32, Tiny>::from_sized_children(
            Owner::NONE,
            vec![leaf(&[1, 2]), leaf(&[3, 4, 5, 6]), leaf(&[7])],
            &[2, 4, 1],
            2,
        );
        assert_eq!(inner.sizes, Some(vec![2, 6, 7]));
        assert_eq!(inner.locate(0, 2), (0, 0));
        assert_eq!(inner.locate(2, 2), (1, 2));
        assert_eq!(inner.locate(5, 2), (1, 2));
        assert_eq!(inner.locate(6, 2), (2, 6));
        assert_eq!(inner.child_size(1, 2, 7), 4);
    }

    #[rstest]
    fn test_node_mut_copies_shared_nodes() {
        let mut original = leaf(&[1, 2]);
        let retained = original.clone();
        node_mut::<i32, Tiny>(&mut original, Owner::NONE).leaf_mut().push(3);
        assert_eq!(retained.elements(), &[1, 2]);
        assert_eq!(original.elements(), &[1, 2, 3]);
    }

    #[rstest]
    fn test_node_mut_edits_owned_nodes_in_place() {
        let owner = Owner::fresh();
        let mut node = leaf(&[1]);
        node_mut::<i32, Tiny>(&mut node, owner).leaf_mut().push(2);
        let before = &raw const *node;
        node_mut::<i32, Tiny>(&mut node, owner).leaf_mut().push(3);
        assert_eq!(before, &raw const *node);
        assert_eq!(node.elements(), &[1, 2, 3]);
    }

    #[rstest]
    fn test_new_path_reaches_requested_shift() {
        let path = new_path::<i32, Tiny>(6, leaf(&[9]), Owner::NONE);
        let mut depth = 0;
        let mut node: &Node<i32, Tiny> = &path;
        while let Node::Inner(inner) = node {
            depth += 1;
            node = &inner.children[0];
        }
        assert_eq!(depth, 3);
    }

    #[rstest]
    fn test_table_is_regular() {
        assert!(table_is_regular(&[4, 8, 9], 2));
        assert!(!table_is_regular(&[3, 7, 8], 2));
        assert!(table_is_regular(&[1], 2));
    }
}
