//! Batch editing for [`FlexVector`].

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::rc::Rc;

use super::FlexVector;
use crate::config::{DefaultConfig, TreeConfig};
use crate::tree::{Owner, RrbTree};

/// A transient (temporarily mutable) vector for efficient batch updates.
///
/// A transient stamps every node it copies with its own edit token and
/// mutates such nodes in place on later edits, so a long run of edits copies
/// each node at most once. Nodes still shared with a persistent vector are
/// copied before being written, so the vector the transient came from never
/// changes.
///
/// `TransientFlexVector` is neither `Send` nor `Sync` and cannot be cloned.
/// Convert back with [`persistent()`](Self::persistent), or take a
/// [`snapshot()`](Self::snapshot) and keep editing.
///
/// # Examples
///
/// ```rust
/// use flexvec::persistent::{FlexVector, TransientFlexVector};
///
/// let mut transient: TransientFlexVector<i32> = TransientFlexVector::new();
/// for n in 0..1000 {
///     transient.push_back(n);
/// }
/// transient.set(0, -1);
///
/// let vector: FlexVector<i32> = transient.persistent();
/// assert_eq!(vector.len(), 1000);
/// assert_eq!(vector.get(0), Some(&-1));
/// ```
pub struct TransientFlexVector<T, C: TreeConfig = DefaultConfig> {
    tree: RrbTree<T, C>,
    owner: Owner,
    /// Marker to ensure `!Send` and `!Sync`.
    _marker: PhantomData<Rc<()>>,
}

// Static assertions to verify TransientFlexVector is not Send/Sync
static_assertions::assert_not_impl_any!(TransientFlexVector<i32>: Send, Sync);
static_assertions::assert_not_impl_any!(TransientFlexVector<String>: Send, Sync);

// Even with shared nodes behind Arc the transient stays on one thread
#[cfg(feature = "arc")]
mod arc_send_sync_verification_flex_vector {
    use super::TransientFlexVector;
    use std::sync::Arc;

    static_assertions::assert_not_impl_any!(TransientFlexVector<Arc<i32>>: Send, Sync);
    static_assertions::assert_not_impl_any!(TransientFlexVector<Arc<String>>: Send, Sync);
}

// =============================================================================
// TransientFlexVector Implementation
// =============================================================================

impl<T, C: TreeConfig> TransientFlexVector<T, C> {
    /// Creates a new empty transient vector.
    #[must_use]
    pub fn new() -> Self {
        Self::from_tree(RrbTree::new())
    }

    pub(crate) fn from_tree(tree: RrbTree<T, C>) -> Self {
        Self {
            tree,
            owner: Owner::fresh(),
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the transient contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns a reference to the element at `index`, or `None` if it is out
    /// of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.tree.get(index)
    }

    /// Converts the transient into a persistent vector.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn persistent(self) -> FlexVector<T, C> {
        FlexVector::from_tree(self.tree)
    }
}

impl<T: Clone, C: TreeConfig> TransientFlexVector<T, C> {
    /// Replaces the element at `index`.
    ///
    /// Returns `false`, leaving the transient unchanged, if `index` is out of
    /// bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (0..5).collect();
    /// let mut transient = vector.transient();
    /// assert!(transient.set(2, 20));
    /// assert!(!transient.set(5, 50));
    /// assert_eq!(transient.get(2), Some(&20));
    /// assert_eq!(vector.get(2), Some(&2));
    /// ```
    pub fn set(&mut self, index: usize, element: T) -> bool {
        self.tree.set_mut(self.owner, index, element)
    }

    /// Replaces the element at `index` with `function(&old)`.
    ///
    /// Returns `false` without calling `function` if `index` is out of bounds.
    pub fn update_with<F>(&mut self, index: usize, function: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        self.tree.update_mut(self.owner, index, function)
    }

    /// Appends an element to the back.
    ///
    /// # Complexity
    ///
    /// Amortized O(1)
    pub fn push_back(&mut self, element: T) {
        self.tree.push_back_mut(self.owner, element);
    }

    /// Prepends an element to the front.
    ///
    /// # Complexity
    ///
    /// O(log N)
    pub fn push_front(&mut self, element: T) {
        let mut front = RrbTree::new();
        front.push_back_mut(self.owner, element);
        front.concat_mut(self.owner, mem::take(&mut self.tree));
        self.tree = front;
    }

    /// Removes and returns the last element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let last = self.tree.get(self.len().checked_sub(1)?)?.clone();
        self.tree.take_mut(self.owner, self.len() - 1);
        Some(last)
    }

    /// Keeps only the first `count` elements.
    pub fn take(&mut self, count: usize) {
        self.tree.take_mut(self.owner, count);
    }

    /// Removes the first `count` elements.
    pub fn drop_first(&mut self, count: usize) {
        self.tree.drop_mut(self.owner, count);
    }

    /// Appends the elements of `other`, sharing its nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::{FlexVector, TransientFlexVector};
    ///
    /// let tail: FlexVector<i32> = (3..6).collect();
    /// let mut transient: TransientFlexVector<i32> = TransientFlexVector::new();
    /// transient.push_back(0);
    /// transient.append(&tail);
    /// transient.push_front(-1);
    ///
    /// let vector = transient.persistent();
    /// assert_eq!(vector.iter().copied().collect::<Vec<_>>(), vec![-1, 0, 3, 4, 5]);
    /// ```
    pub fn append(&mut self, other: &FlexVector<T, C>) {
        self.tree.concat_mut(self.owner, other.tree().clone());
    }

    /// Returns a persistent vector with the current contents and keeps
    /// editing.
    ///
    /// Later edits copy any node the snapshot shares before writing it, so
    /// the snapshot never changes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::TransientFlexVector;
    ///
    /// let mut transient: TransientFlexVector<i32> = TransientFlexVector::new();
    /// transient.push_back(1);
    /// let snapshot = transient.snapshot();
    /// transient.set(0, 2);
    ///
    /// assert_eq!(snapshot.get(0), Some(&1));
    /// assert_eq!(transient.get(0), Some(&2));
    /// ```
    #[must_use]
    pub fn snapshot(&mut self) -> FlexVector<T, C> {
        self.owner = Owner::fresh();
        FlexVector::from_tree(self.tree.clone())
    }
}

impl<T, C: TreeConfig> Default for TransientFlexVector<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: TreeConfig> Extend<T> for TransientFlexVector<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push_back(element);
        }
    }
}

impl<T: fmt::Debug, C: TreeConfig> fmt::Debug for TransientFlexVector<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TransientFlexVector")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
