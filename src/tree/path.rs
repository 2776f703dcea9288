//! Indexed lookup and path-copying updates.

use super::node::{Node, NodeRef, node_mut};
use super::owner::Owner;
use super::RrbTree;
use crate::config::{TreeConfig, child_shift};

impl<T, C: TreeConfig> RrbTree<T, C> {
    /// Returns the element at `index`, or `None` if it is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n); O(1) for indices in the tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::tree::RrbTree;
    ///
    /// let tree: RrbTree<char> = "abc".chars().fold(RrbTree::new(), |tree, c| tree.push_back(c));
    /// assert_eq!(tree.get(1), Some(&'b'));
    /// assert_eq!(tree.get(3), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        let (chunk, start) = self.chunk_at(index)?;
        chunk.get(index - start)
    }

    /// Returns the leaf holding `index` together with the index of its first
    /// element.
    ///
    /// Iterators use this to fetch a whole leaf per descent.
    pub(crate) fn chunk_at(&self, index: usize) -> Option<(&[T], usize)> {
        if index >= self.size {
            return None;
        }
        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            return Some((self.tail.elements(), tail_offset));
        }

        let mut node: &Node<T, C> = self.root.as_ref()?;
        let mut shift = self.shift;
        let mut remaining = index;
        loop {
            match node {
                Node::Leaf(leaf) => return Some((leaf.elements.as_slice(), index - remaining)),
                Node::Inner(inner) => {
                    let (slot, before) = inner.locate(remaining, shift);
                    remaining -= before;
                    node = inner.children.get(slot)?;
                    shift = child_shift::<C>(shift);
                }
            }
        }
    }
}

impl<T: Clone, C: TreeConfig> RrbTree<T, C> {
    /// Returns a tree with the element at `index` replaced by `value`.
    ///
    /// Out-of-bounds indices return an identical tree.
    ///
    /// # Complexity
    ///
    /// O(log n): only the path from the root to the leaf is copied.
    #[must_use]
    pub fn set(&self, index: usize, value: T) -> Self {
        let mut tree = self.clone();
        tree.set_mut(Owner::NONE, index, value);
        tree
    }

    /// Returns a tree with the element at `index` replaced by
    /// `function(&old)`.
    ///
    /// `function` is called exactly once when `index` is in bounds and not at
    /// all otherwise.
    #[must_use]
    pub fn update<F>(&self, index: usize, function: F) -> Self
    where
        F: FnOnce(&T) -> T,
    {
        let mut tree = self.clone();
        tree.update_mut(Owner::NONE, index, function);
        tree
    }

    pub(crate) fn set_mut(&mut self, owner: Owner, index: usize, value: T) -> bool {
        self.modify_mut(owner, index, |slot| *slot = value)
    }

    pub(crate) fn update_mut<F>(&mut self, owner: Owner, index: usize, function: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        self.modify_mut(owner, index, |slot| *slot = function(slot))
    }

    /// Applies `edit` to the element at `index` after making its path
    /// writable for `owner`. Returns `false` if `index` is out of bounds.
    fn modify_mut<F>(&mut self, owner: Owner, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        if index >= self.size {
            return false;
        }
        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            edit(&mut node_mut::<T, C>(&mut self.tail, owner).leaf_mut()[index - tail_offset]);
            return true;
        }
        match self.root.as_mut() {
            Some(root) => {
                modify_node::<T, C, F>(root, self.shift, index, owner, edit);
                true
            }
            None => false,
        }
    }
}

fn modify_node<T: Clone, C: TreeConfig, F: FnOnce(&mut T)>(
    node: &mut NodeRef<T, C>,
    shift: u32,
    index: usize,
    owner: Owner,
    edit: F,
) {
    match node_mut::<T, C>(node, owner) {
        Node::Leaf(leaf) => edit(&mut leaf.elements[index]),
        Node::Inner(inner) => {
            let (slot, before) = inner.locate(index, shift);
            modify_node::<T, C, F>(
                &mut inner.children[slot],
                child_shift::<C>(shift),
                index - before,
                owner,
                edit,
            );
        }
    }
}
