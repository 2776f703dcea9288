//! Concatenation with bounded rebalancing.
//!
//! Joining two trees walks down the right edge of the left tree and the left
//! edge of the right tree until both sides meet at the same height, then
//! climbs back up. At every level the nodes along the seam are collected and
//! passed through a shuffle plan that merges underfull neighbours until the
//! level holds at most one node more than the minimum its contents need.
//! Nodes the plan leaves untouched are reused without copying.

use std::mem;

use arrayvec::ArrayVec;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::node::{Inner, Node, NodeRef, into_children, node_mut};
use super::owner::Owner;
use super::RrbTree;
use crate::config::{TreeConfig, branches, child_shift, leaf_capacity, parent_shift};

/// Extra nodes a level may carry beyond the minimum before it is rebalanced.
const EXTRAS: usize = 2;

/// A node is left alone by the plan while it has fewer than this many free slots.
const INVARIANT: usize = 1;

/// A node paired with the number of elements under it.
type Sized<T, C> = (NodeRef<T, C>, usize);

/// Nodes produced by merging one level: never more than three.
type Center<T, C> = ArrayVec<Sized<T, C>, 3>;

impl<T: Clone, C: TreeConfig> RrbTree<T, C> {
    /// Returns the elements of `self` followed by the elements of `other`.
    ///
    /// Both inputs remain valid and unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n) nodes are created; everything else is shared.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::tree::RrbTree;
    ///
    /// let left: RrbTree<i32> = (0..50).fold(RrbTree::new(), |tree, n| tree.push_back(n));
    /// let right: RrbTree<i32> = (50..120).fold(RrbTree::new(), |tree, n| tree.push_back(n));
    /// let joined = left.concat(&right);
    /// assert_eq!(joined.len(), 120);
    /// assert_eq!(joined.get(75), Some(&75));
    /// ```
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut tree = self.clone();
        tree.concat_mut(Owner::NONE, other.clone());
        tree
    }

    pub(crate) fn concat_mut(&mut self, owner: Owner, right: Self) {
        if right.size == 0 {
            return;
        }
        if self.size == 0 {
            *self = right;
            return;
        }

        let Self {
            size: right_size,
            shift: right_shift,
            root: right_root,
            tail: right_tail,
        } = right;

        let Some(right_root) = right_root else {
            self.append_tail(owner, &right_tail);
            return;
        };

        let left_size = self.size;
        let left_tree_size = self.tail_offset();
        let right_tree_size = right_size - right_tail.len();
        let left_tail = mem::replace(&mut self.tail, right_tail);
        self.push_leaf(owner, left_tail, left_tree_size);

        let Some(left_root) = self.root.take() else {
            return;
        };
        let (left_root, left_shift) = lift_leaf::<T, C>(left_root, self.shift, owner);
        let (right_root, right_shift) = lift_leaf::<T, C>(right_root, right_shift, owner);
        debug!(
            left_size,
            right_size,
            left_shift,
            right_shift,
            "concatenating trees"
        );

        let (mut center, shift) = merge::<T, C>(
            (left_root, left_size),
            left_shift,
            (right_root, right_tree_size),
            right_shift,
            owner,
        );
        let root = if center.len() == 1 {
            self.shift = shift;
            center.pop().map(|(node, _)| node)
        } else {
            let parent = parent_shift::<C>(shift);
            self.shift = parent;
            trace!(nodes = center.len(), shift = parent, "concatenation grew the root");
            let (children, sizes): (Vec<_>, Vec<_>) = center.into_iter().unzip();
            Some(Node::<T, C>::inner_ref(Inner::<T, C>::from_sized_children(
                owner, children, &sizes, parent,
            )))
        };
        self.root = root;
        self.size += right_size;
        self.collapse_root();
    }

    /// Appends the elements of a tail-only tree.
    fn append_tail(&mut self, owner: Owner, right_tail: &NodeRef<T, C>) {
        let capacity = leaf_capacity::<C>();
        let incoming = right_tail.elements();
        let tail_len = self.tail_len();
        let tree_size = self.tail_offset();

        if tail_len == capacity {
            let full = mem::replace(&mut self.tail, right_tail.clone());
            self.push_leaf(owner, full, tree_size);
        } else if tail_len + incoming.len() <= capacity {
            node_mut::<T, C>(&mut self.tail, owner).leaf_mut().extend_from_slice(incoming);
        } else {
            let (head, rest) = incoming.split_at(capacity - tail_len);
            let mut elements = Vec::with_capacity(capacity);
            elements.extend_from_slice(rest);
            let mut full = mem::replace(&mut self.tail, Node::<T, C>::leaf_ref(owner, elements));
            node_mut::<T, C>(&mut full, owner).leaf_mut().extend_from_slice(head);
            self.push_leaf(owner, full, tree_size);
        }
        self.size += incoming.len();
    }
}

/// Wraps a leaf root in an internal node so both sides of a merge sit at
/// shift `BL` or above.
fn lift_leaf<T, C: TreeConfig>(root: NodeRef<T, C>, shift: u32, owner: Owner) -> (NodeRef<T, C>, u32) {
    if shift > 0 {
        return (root, shift);
    }
    let inner = Inner {
        owner,
        children: vec![root],
        sizes: None,
    };
    (Node::<T, C>::inner_ref(inner), C::LEAF_BITS)
}

/// Merges `left` (at `left_shift`) with `right` (at `right_shift`).
///
/// Returns one to three nodes at the larger of the two shifts, together with
/// that shift.
fn merge<T: Clone, C: TreeConfig>(
    left: Sized<T, C>,
    left_shift: u32,
    right: Sized<T, C>,
    right_shift: u32,
    owner: Owner,
) -> (Center<T, C>, u32) {
    let shift = left_shift.max(right_shift);
    if shift == C::LEAF_BITS {
        let mut children = sized_children::<T, C>(left, shift, owner);
        children.extend(sized_children::<T, C>(right, shift, owner));
        return (rebalance::<T, C>(children, shift, owner), shift);
    }

    let level = child_shift::<C>(shift);
    let (mut children, left_seam) = if left_shift == shift {
        let mut children = sized_children::<T, C>(left, shift, owner);
        let last = children.pop();
        (children, last)
    } else {
        (Vec::new(), Some(left))
    };
    let mut rest = if right_shift == shift {
        sized_children::<T, C>(right, shift, owner)
    } else {
        vec![right]
    }
    .into_iter();

    match (left_seam, rest.next()) {
        (Some(left_seam), Some(right_seam)) => {
            let (center, _) = merge::<T, C>(
                left_seam,
                left_shift.min(level),
                right_seam,
                right_shift.min(level),
                owner,
            );
            children.extend(center);
        }
        (left_seam, right_seam) => children.extend(left_seam.into_iter().chain(right_seam)),
    }
    children.extend(rest);
    (rebalance::<T, C>(children, shift, owner), shift)
}

/// Element counts of the children of `node`, which sits at `shift` and holds `size`.
fn child_sizes<T, C: TreeConfig>(node: &Node<T, C>, shift: u32, size: usize) -> Vec<usize> {
    match node {
        Node::Inner(inner) => (0..inner.children.len())
            .map(|slot| inner.child_size(slot, shift, size))
            .collect(),
        Node::Leaf(_) => Vec::new(),
    }
}

/// Children of a node at `shift`, each paired with its element count.
fn sized_children<T, C: TreeConfig>((node, size): Sized<T, C>, shift: u32, owner: Owner) -> Vec<Sized<T, C>> {
    let sizes = child_sizes::<T, C>(&node, shift, size);
    into_children::<T, C>(node, owner).into_iter().zip(sizes).collect()
}

/// Redistributes the seam nodes of one level and groups them under at most
/// three parents at `shift`.
fn rebalance<T: Clone, C: TreeConfig>(children: Vec<Sized<T, C>>, shift: u32, owner: Owner) -> Center<T, C> {
    let level = child_shift::<C>(shift);
    let slot_capacity = if level == 0 {
        leaf_capacity::<C>()
    } else {
        branches::<C>()
    };

    let mut counts: SmallVec<[usize; 65]> = children.iter().map(|(child, _)| child.len()).collect();
    let children = if plan_counts(&mut counts, slot_capacity) {
        trace!(before = children.len(), after = counts.len(), shift, "rebalanced seam");
        redistribute::<T, C>(&children, &counts, level, owner)
    } else {
        children
    };

    let mut parents = Center::<T, C>::new();
    let mut remaining = children.into_iter().peekable();
    while remaining.peek().is_some() {
        let (group, sizes): (Vec<_>, Vec<_>) = remaining.by_ref().take(branches::<C>()).unzip();
        let total = sizes.iter().sum();
        let parent = Inner::<T, C>::from_sized_children(owner, group, &sizes, shift);
        parents.push((Node::<T, C>::inner_ref(parent), total));
    }
    parents
}

/// Computes the slot counts of the rebalanced level in place.
///
/// Returns `false` when the level already has few enough nodes and should be
/// left alone.
fn plan_counts(counts: &mut SmallVec<[usize; 65]>, capacity: usize) -> bool {
    let total: usize = counts.iter().sum();
    let optimal = total.div_ceil(capacity);
    if counts.len() < optimal + EXTRAS {
        return false;
    }

    let mut index = 0;
    while counts.len() >= optimal + EXTRAS {
        while counts[index] > capacity - INVARIANT {
            index += 1;
        }
        let mut remaining = counts[index];
        loop {
            let next = counts[index + 1];
            let count = (remaining + next).min(capacity);
            counts[index] = count;
            remaining = remaining + next - count;
            index += 1;
            if remaining == 0 {
                break;
            }
        }
        counts.remove(index);
        index -= 1;
    }
    true
}

/// Builds the nodes described by `counts` from the slots of `children`,
/// reusing a child whenever it lines up with a planned node exactly.
fn redistribute<T: Clone, C: TreeConfig>(
    children: &[Sized<T, C>],
    counts: &[usize],
    level: u32,
    owner: Owner,
) -> Vec<Sized<T, C>> {
    let mut nodes = Vec::with_capacity(counts.len());
    let mut source = 0;
    let mut offset = 0;

    for &count in counts {
        if offset == 0 && children[source].0.len() == count {
            nodes.push(children[source].clone());
            source += 1;
            continue;
        }

        if level == 0 {
            let mut elements = Vec::with_capacity(count);
            while elements.len() < count {
                let from = children[source].0.elements();
                let step = (count - elements.len()).min(from.len() - offset);
                elements.extend_from_slice(&from[offset..offset + step]);
                offset += step;
                if offset == from.len() {
                    source += 1;
                    offset = 0;
                }
            }
            nodes.push((Node::<T, C>::leaf_ref(owner, elements), count));
        } else {
            let mut grandchildren = Vec::with_capacity(count);
            let mut sizes = Vec::with_capacity(count);
            while grandchildren.len() < count {
                let (from, from_size) = &children[source];
                let from_sizes = child_sizes::<T, C>(from, level, *from_size);
                let from = from.children();
                let step = (count - grandchildren.len()).min(from.len() - offset);
                grandchildren.extend_from_slice(&from[offset..offset + step]);
                sizes.extend_from_slice(&from_sizes[offset..offset + step]);
                offset += step;
                if offset == from.len() {
                    source += 1;
                    offset = 0;
                }
            }
            let total = sizes.iter().sum();
            let inner = Inner::<T, C>::from_sized_children(owner, grandchildren, &sizes, level);
            nodes.push((Node::<T, C>::inner_ref(inner), total));
        }
    }
    nodes
}
