//! Appending at the back and reshaping the root.

use std::mem;

use tracing::trace;

use super::node::{Inner, Node, NodeRef, new_path, node_mut};
use super::owner::Owner;
use super::RrbTree;
use crate::config::{TreeConfig, branches, child_capacity, child_shift, leaf_capacity, parent_shift, subtree_capacity};

impl<T: Clone, C: TreeConfig> RrbTree<T, C> {
    /// Returns a tree with `value` appended at the back.
    ///
    /// # Complexity
    ///
    /// O(1) amortised. Once every `2^BL` appends the full tail is pushed into
    /// the tree proper, which costs O(log n).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::tree::RrbTree;
    ///
    /// let empty: RrbTree<i32> = RrbTree::new();
    /// let one = empty.push_back(1);
    /// assert_eq!(empty.len(), 0);
    /// assert_eq!(one.get(0), Some(&1));
    /// ```
    #[must_use]
    pub fn push_back(&self, value: T) -> Self {
        let mut tree = self.clone();
        tree.push_back_mut(Owner::NONE, value);
        tree
    }

    pub(crate) fn push_back_mut(&mut self, owner: Owner, value: T) {
        if self.tail_len() < leaf_capacity::<C>() {
            node_mut::<T, C>(&mut self.tail, owner).leaf_mut().push(value);
        } else {
            let tree_size = self.tail_offset();
            let mut elements = Vec::with_capacity(leaf_capacity::<C>());
            elements.push(value);
            let full = mem::replace(&mut self.tail, Node::<T, C>::leaf_ref(owner, elements));
            self.push_leaf(owner, full, tree_size);
        }
        self.size += 1;
    }

    /// Appends `leaf` after the last leaf of the tree proper, which currently
    /// holds `tree_size` elements. Does not touch `size` or the tail.
    pub(crate) fn push_leaf(&mut self, owner: Owner, leaf: NodeRef<T, C>, tree_size: usize) {
        let leaf_len = leaf.len();
        let Some(mut root) = self.root.take() else {
            self.root = Some(leaf);
            self.shift = 0;
            return;
        };

        if has_room::<T, C>(&root, self.shift, tree_size) {
            push_leaf_into::<T, C>(&mut root, self.shift, tree_size, leaf, owner);
            self.root = Some(root);
        } else {
            let shift = parent_shift::<C>(self.shift);
            let path = new_path::<T, C>(self.shift, leaf, owner);
            let inner = Inner::<T, C>::from_sized_children(owner, vec![root, path], &[tree_size, leaf_len], shift);
            self.root = Some(Node::<T, C>::inner_ref(inner));
            self.shift = shift;
            trace!(shift, size = tree_size + leaf_len, "root grew");
        }
    }
}

impl<T, C: TreeConfig> RrbTree<T, C> {
    /// Replaces a root with a single child by that child until the root is a
    /// leaf or has at least two children.
    pub(crate) fn collapse_root(&mut self) {
        let mut collapsed = 0;
        while let Some(root) = &self.root {
            let child = match &**root {
                Node::Inner(inner) if inner.children.len() == 1 => inner.children[0].clone(),
                _ => break,
            };
            self.root = Some(child);
            self.shift = child_shift::<C>(self.shift);
            collapsed += 1;
        }
        if collapsed > 0 {
            trace!(levels = collapsed, shift = self.shift, "root collapsed");
        }
    }
}

/// Returns `true` if a leaf can be appended below `node` without growing it.
fn has_room<T, C: TreeConfig>(node: &Node<T, C>, shift: u32, size: usize) -> bool {
    let Node::Inner(inner) = node else {
        return false;
    };
    if size >= subtree_capacity::<C>(shift) {
        return false;
    }
    if inner.children.len() < branches::<C>() {
        return true;
    }
    let level = child_shift::<C>(shift);
    let last = inner.children.len() - 1;
    level > 0 && has_room::<T, C>(&inner.children[last], level, inner.child_size(last, shift, size))
}

fn push_leaf_into<T: Clone, C: TreeConfig>(
    node: &mut NodeRef<T, C>,
    shift: u32,
    size: usize,
    leaf: NodeRef<T, C>,
    owner: Owner,
) {
    let leaf_len = leaf.len();
    let level = child_shift::<C>(shift);
    let inner = node_mut::<T, C>(node, owner).inner_mut();
    let last = inner.children.len() - 1;
    let last_size = inner.child_size(last, shift, size);

    if level > 0 && has_room::<T, C>(&inner.children[last], level, last_size) {
        push_leaf_into::<T, C>(&mut inner.children[last], level, last_size, leaf, owner);
        if let Some(sizes) = &mut inner.sizes {
            sizes[last] += leaf_len;
        }
        return;
    }

    if inner.sizes.is_none() && last_size != child_capacity(shift) {
        inner.sizes = Some(inner.cumulative_sizes(shift, size));
    }
    inner.children.push(new_path::<T, C>(level, leaf, owner));
    if let Some(sizes) = &mut inner.sizes {
        sizes.push(size + leaf_len);
    }
}
