//! Prefix and suffix slicing.

use super::node::{NodeRef, node_mut, table_is_regular};
use super::owner::Owner;
use super::RrbTree;
use crate::config::{TreeConfig, child_shift};

impl<T: Clone, C: TreeConfig> RrbTree<T, C> {
    /// Returns the first `count` elements.
    ///
    /// `count >= len` returns an identical tree; `count == 0` returns an
    /// empty one.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::tree::RrbTree;
    ///
    /// let tree: RrbTree<i32> = (0..100).fold(RrbTree::new(), |tree, n| tree.push_back(n));
    /// let prefix = tree.take(40);
    /// assert_eq!(prefix.len(), 40);
    /// assert_eq!(prefix.get(39), Some(&39));
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        let mut tree = self.clone();
        tree.take_mut(Owner::NONE, count);
        tree
    }

    /// Returns everything after the first `count` elements.
    ///
    /// `count == 0` returns an identical tree; `count >= len` returns an
    /// empty one.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn drop(&self, count: usize) -> Self {
        let mut tree = self.clone();
        tree.drop_mut(Owner::NONE, count);
        tree
    }

    pub(crate) fn take_mut(&mut self, owner: Owner, count: usize) {
        if count >= self.size {
            return;
        }
        if count == 0 {
            *self = Self::new();
            return;
        }

        let tail_offset = self.tail_offset();
        if count > tail_offset {
            node_mut::<T, C>(&mut self.tail, owner).leaf_mut().truncate(count - tail_offset);
            self.size = count;
            return;
        }

        let Some(root) = self.root.take() else {
            return;
        };
        let (remaining, tail) = slice_right::<T, C>(root, self.shift, tail_offset, count, owner);
        self.tail = tail;
        self.size = count;
        match remaining {
            Some(root) => {
                self.root = Some(root);
                self.collapse_root();
            }
            None => self.shift = 0,
        }
    }

    pub(crate) fn drop_mut(&mut self, owner: Owner, count: usize) {
        if count == 0 {
            return;
        }
        if count >= self.size {
            *self = Self::new();
            return;
        }

        let tail_offset = self.tail_offset();
        if count >= tail_offset {
            if count > tail_offset {
                node_mut::<T, C>(&mut self.tail, owner).leaf_mut().drain(..count - tail_offset);
            }
            self.root = None;
            self.shift = 0;
            self.size -= count;
            return;
        }

        let Some(root) = self.root.take() else {
            return;
        };
        self.root = Some(slice_left::<T, C>(root, self.shift, tail_offset, count, owner));
        self.size -= count;
        self.collapse_root();
    }
}

/// Keeps the first `end` elements of `node`, which holds `size`.
///
/// Returns what remains of the subtree without its last leaf, and that last
/// leaf, which becomes the new tail. `end` must lie in `1..=size`.
fn slice_right<T: Clone, C: TreeConfig>(
    mut node: NodeRef<T, C>,
    shift: u32,
    size: usize,
    end: usize,
    owner: Owner,
) -> (Option<NodeRef<T, C>>, NodeRef<T, C>) {
    if shift == 0 {
        if end < node.len() {
            node_mut::<T, C>(&mut node, owner).leaf_mut().truncate(end);
        }
        return (None, node);
    }

    let inner = node_mut::<T, C>(&mut node, owner).inner_mut();
    let (slot, before) = inner.locate(end - 1, shift);
    let child_size = inner.child_size(slot, shift, size);
    inner.children.truncate(slot + 1);
    if let Some(sizes) = &mut inner.sizes {
        sizes.truncate(slot);
    }
    let child = inner.children.remove(slot);

    let (rest, tail) = slice_right::<T, C>(child, child_shift::<C>(shift), child_size, end - before, owner);
    if let Some(rest) = rest {
        let rest_size = end - before - tail.len();
        inner.children.push(rest);
        if let Some(sizes) = &mut inner.sizes {
            sizes.push(before + rest_size);
        }
    }

    if inner.children.is_empty() {
        (None, tail)
    } else {
        (Some(node), tail)
    }
}

/// Removes the first `start` elements of `node`, which holds `size`.
///
/// `start` must be smaller than `size`.
fn slice_left<T: Clone, C: TreeConfig>(
    mut node: NodeRef<T, C>,
    shift: u32,
    size: usize,
    start: usize,
    owner: Owner,
) -> NodeRef<T, C> {
    if start == 0 {
        return node;
    }
    if shift == 0 {
        node_mut::<T, C>(&mut node, owner).leaf_mut().drain(..start);
        return node;
    }

    let inner = node_mut::<T, C>(&mut node, owner).inner_mut();
    let (slot, before) = inner.locate(start, shift);
    let child_size = inner.child_size(slot, shift, size);
    let mut sizes = inner.cumulative_sizes(shift, size);
    sizes.drain(..slot);
    for total in &mut sizes {
        *total -= start;
    }
    inner.children.drain(..slot);

    let child = inner.children.remove(0);
    let child = slice_left::<T, C>(child, child_shift::<C>(shift), child_size, start - before, owner);
    inner.children.insert(0, child);
    inner.sizes = (!table_is_regular(&sizes, shift)).then_some(sizes);
    node
}
