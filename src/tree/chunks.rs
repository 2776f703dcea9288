//! Leaf-granular traversal.

use std::iter::FusedIterator;
use std::slice;

use smallvec::SmallVec;

use super::node::{Node, NodeRef};
use super::RrbTree;
use crate::config::TreeConfig;

impl<T, C: TreeConfig> RrbTree<T, C> {
    /// Calls `function` once per non-empty leaf, in order, then once for the
    /// tail.
    ///
    /// Concatenating the slices yields the whole sequence. The traversal
    /// allocates nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::tree::RrbTree;
    ///
    /// let tree: RrbTree<u64> = (1..=100).fold(RrbTree::new(), |tree, n| tree.push_back(n));
    /// let mut total = 0;
    /// tree.for_each_chunk(|chunk| total += chunk.iter().sum::<u64>());
    /// assert_eq!(total, 5050);
    /// ```
    pub fn for_each_chunk<F>(&self, mut function: F)
    where
        F: FnMut(&[T]),
    {
        if let Some(root) = &self.root {
            visit_leaves::<T, C, F>(root, &mut function);
        }
        let tail = self.tail.elements();
        if !tail.is_empty() {
            function(tail);
        }
    }

    /// Returns an iterator over the leaves as slices, in order.
    #[must_use]
    pub fn chunks(&self) -> Chunks<'_, T, C> {
        let mut stack = SmallVec::new();
        if let Some(root) = &self.root {
            stack.push(slice::from_ref(root).iter());
        }
        Chunks {
            stack,
            tail: Some(self.tail.elements()).filter(|tail| !tail.is_empty()),
        }
    }
}

fn visit_leaves<T, C: TreeConfig, F: FnMut(&[T])>(node: &Node<T, C>, function: &mut F) {
    match node {
        Node::Leaf(leaf) => {
            if !leaf.elements.is_empty() {
                function(&leaf.elements);
            }
        }
        Node::Inner(inner) => {
            for child in &inner.children {
                visit_leaves::<T, C, F>(child, function);
            }
        }
    }
}

/// Iterator over the leaves of an [`RrbTree`], created by [`RrbTree::chunks`].
pub struct Chunks<'a, T, C: TreeConfig> {
    stack: SmallVec<[slice::Iter<'a, NodeRef<T, C>>; 8]>,
    tail: Option<&'a [T]>,
}

impl<'a, T, C: TreeConfig> Iterator for Chunks<'a, T, C> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            let Some(node) = top.next() else {
                self.stack.pop();
                continue;
            };
            match &**node {
                Node::Leaf(leaf) if !leaf.elements.is_empty() => return Some(leaf.elements.as_slice()),
                Node::Leaf(_) => {}
                Node::Inner(inner) => self.stack.push(inner.children.iter()),
            }
        }
        self.tail.take()
    }
}

impl<T, C: TreeConfig> FusedIterator for Chunks<'_, T, C> {}
