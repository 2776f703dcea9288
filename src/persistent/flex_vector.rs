//! Persistent flexible vector.
//!
//! This module provides [`FlexVector`], an immutable sequence backed by a
//! Relaxed Radix Balanced tree. Unlike a plain radix balanced vector it
//! supports concatenation, slicing, insertion and removal at arbitrary
//! positions in O(log N) while keeping indexed access at O(log N).
//!
//! # Examples
//!
//! ```rust
//! use flexvec::persistent::FlexVector;
//!
//! let vector: FlexVector<i32> = (0..10).collect();
//! let spliced = vector.take(3).append(&vector.drop_first(7));
//! assert_eq!(spliced.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 7, 8, 9]);
//!
//! // Structural sharing: the original vector is preserved
//! assert_eq!(vector.len(), 10);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Add, Index};

use super::iter::{FlexVectorIntoIterator, FlexVectorIterator};
use super::transient::TransientFlexVector;
use crate::config::{DefaultConfig, TreeConfig};
use crate::tree::{Chunks, RrbTree};

// =============================================================================
// FlexVector Definition
// =============================================================================

/// A persistent (immutable) vector based on a Relaxed Radix Balanced tree.
///
/// `FlexVector` uses structural sharing: every edit returns a new vector that
/// shares all unchanged nodes with the original.
///
/// # Time Complexity
///
/// | Operation     | Complexity                    |
/// |---------------|-------------------------------|
/// | `new`         | O(1)                          |
/// | `get`         | O(log N)                      |
/// | `push_back`   | O(log N) amortized O(1)       |
/// | `push_front`  | O(log N)                      |
/// | `update`      | O(log N)                      |
/// | `take`        | O(log N)                      |
/// | `drop_first`  | O(log N)                      |
/// | `append`      | O(log N)                      |
/// | `insert`      | O(log N)                      |
/// | `remove`      | O(log N)                      |
/// | `len`         | O(1)                          |
/// | `iter`        | O(1) to create, O(N) to iterate |
///
/// # Type Parameters
///
/// - `T`: element type
/// - `C`: tree geometry and ownership policy, [`DefaultConfig`] unless given
///
/// # Examples
///
/// ```rust
/// use flexvec::persistent::FlexVector;
///
/// let vector: FlexVector<i32> = (0..100).collect();
/// assert_eq!(vector.len(), 100);
/// assert_eq!(vector.get(50), Some(&50));
/// ```
pub struct FlexVector<T, C: TreeConfig = DefaultConfig> {
    tree: RrbTree<T, C>,
}

impl<T, C: TreeConfig> FlexVector<T, C> {
    /// Creates a new empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = FlexVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: RrbTree::new(),
        }
    }

    pub(crate) const fn from_tree(tree: RrbTree<T, C>) -> Self {
        Self { tree }
    }

    /// Returns the underlying tree for structural inspection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (0..1000).collect();
    /// assert!(vector.tree().validate().is_ok());
    /// assert!(vector.tree().height() <= 3);
    /// ```
    #[inline]
    #[must_use]
    pub const fn tree(&self) -> &RrbTree<T, C> {
        &self.tree
    }

    /// Returns the number of elements in the vector.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.len(), 5);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns a reference to the element at the given index.
    ///
    /// Returns `None` if the index is out of bounds.
    ///
    /// # Arguments
    ///
    /// * `index` - The zero-based index of the element
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get(0), Some(&1));
    /// assert_eq!(vector.get(4), Some(&5));
    /// assert_eq!(vector.get(10), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.tree.get(index)
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a reference to the last element, or `None` if empty.
    ///
    /// # Complexity
    ///
    /// O(1): the last element always lives in the tail.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns an iterator over references to the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=3).collect();
    /// let collected: Vec<&i32> = vector.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3]);
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> FlexVectorIterator<'_, T, C> {
        FlexVectorIterator::new(&self.tree)
    }

    /// Returns an iterator over the leaves of the vector as slices.
    ///
    /// Concatenating the slices yields the whole vector.
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> Chunks<'_, T, C> {
        self.tree.chunks()
    }

    /// Calls `function` with every leaf of the vector in order.
    ///
    /// This is the fastest way to visit all elements; it never allocates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<u32> = (1..=100).collect();
    /// let mut sum = 0;
    /// vector.for_each_chunk(|chunk| sum += chunk.iter().sum::<u32>());
    /// assert_eq!(sum, 5050);
    /// ```
    #[inline]
    pub fn for_each_chunk<F>(&self, function: F)
    where
        F: FnMut(&[T]),
    {
        self.tree.for_each_chunk(function);
    }

    /// Returns the index of the first element satisfying `predicate`.
    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(predicate)
    }
}

impl<T: Clone, C: TreeConfig> FlexVector<T, C> {
    /// Creates a vector containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector = FlexVector::<i32>::singleton(42);
    /// assert_eq!(vector.len(), 1);
    /// assert_eq!(vector.get(0), Some(&42));
    /// ```
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().push_back(element)
    }

    /// Creates a vector from a slice by cloning its elements.
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }

    /// Appends an element to the back of the vector.
    ///
    /// # Arguments
    ///
    /// * `element` - The element to append
    ///
    /// # Complexity
    ///
    /// O(log N) worst case, amortized O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector = FlexVector::<i32>::new().push_back(1).push_back(2);
    /// assert_eq!(vector.len(), 2);
    /// assert_eq!(vector.get(1), Some(&2));
    /// ```
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        Self::from_tree(self.tree.push_back(element))
    }

    /// Prepends an element to the front of the vector.
    ///
    /// # Complexity
    ///
    /// O(log N): the element is concatenated in front of the vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=3).collect();
    /// let with_zero = vector.push_front(0);
    ///
    /// assert_eq!(with_zero.get(0), Some(&0));
    /// assert_eq!(with_zero.get(1), Some(&1));
    /// ```
    #[must_use]
    pub fn push_front(&self, element: T) -> Self {
        Self::singleton(element).append(self)
    }

    /// Removes the last element from the vector.
    ///
    /// Returns `None` if the vector is empty, otherwise returns the new vector
    /// and the removed element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// let (remaining, element) = vector.pop_back().unwrap();
    ///
    /// assert_eq!(element, 5);
    /// assert_eq!(remaining.len(), 4);
    /// ```
    #[must_use]
    pub fn pop_back(&self) -> Option<(Self, T)> {
        let last = self.last()?.clone();
        Some((self.take(self.len() - 1), last))
    }

    /// Removes the first element from the vector.
    ///
    /// Returns `None` if the vector is empty, otherwise returns the new vector
    /// and the removed element.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// let (remaining, element) = vector.pop_front().unwrap();
    ///
    /// assert_eq!(element, 1);
    /// assert_eq!(remaining.get(0), Some(&2));
    /// ```
    #[must_use]
    pub fn pop_front(&self) -> Option<(Self, T)> {
        let first = self.first()?.clone();
        Some((self.drop_first(1), first))
    }

    /// Replaces the element at the given index.
    ///
    /// Returns `None` if the index is out of bounds, otherwise returns a new
    /// vector with the updated element.
    ///
    /// # Arguments
    ///
    /// * `index` - The zero-based index to update
    /// * `element` - The new element value
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// let updated = vector.update(2, 100).unwrap();
    ///
    /// assert_eq!(updated.get(2), Some(&100));
    /// assert_eq!(vector.get(2), Some(&3)); // Original unchanged
    /// assert!(vector.update(5, 0).is_none());
    /// ```
    #[must_use]
    pub fn update(&self, index: usize, element: T) -> Option<Self> {
        (index < self.len()).then(|| Self::from_tree(self.tree.set(index, element)))
    }

    /// Replaces the element at the given index with `function(&old)`.
    ///
    /// Returns `None` without calling `function` if the index is out of
    /// bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// let doubled = vector.update_with(1, |value| value * 2).unwrap();
    /// assert_eq!(doubled.get(1), Some(&4));
    /// ```
    #[must_use]
    pub fn update_with<F>(&self, index: usize, function: F) -> Option<Self>
    where
        F: FnOnce(&T) -> T,
    {
        (index < self.len()).then(|| Self::from_tree(self.tree.update(index, function)))
    }

    /// Returns a new vector containing the first `count` elements.
    ///
    /// If `count` exceeds the vector's length, returns the vector itself.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.take(3).len(), 3);
    /// assert_eq!(vector.take(10), vector);
    /// assert!(vector.take(0).is_empty());
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        Self::from_tree(self.tree.take(count))
    }

    /// Returns a new vector with the first `count` elements removed.
    ///
    /// If `count` exceeds the vector's length, returns an empty vector.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.drop_first(2).first(), Some(&3));
    /// assert!(vector.drop_first(10).is_empty());
    /// ```
    #[must_use]
    pub fn drop_first(&self, count: usize) -> Self {
        Self::from_tree(self.tree.drop(count))
    }

    /// Splits the vector at the given index.
    ///
    /// This is equivalent to `(self.take(index), self.drop_first(index))`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (1..=5).collect();
    /// let (left, right) = vector.split_at(2);
    /// assert_eq!(left.len(), 2);
    /// assert_eq!(right.first(), Some(&3));
    /// ```
    #[must_use]
    pub fn split_at(&self, index: usize) -> (Self, Self) {
        (self.take(index), self.drop_first(index))
    }

    /// Returns the elements in `start..end`.
    ///
    /// `end` is clamped to the length and an empty vector is returned when
    /// `start >= end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (0..10).collect();
    /// let middle = vector.slice(3, 6);
    /// assert_eq!(middle.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    /// assert!(vector.slice(6, 3).is_empty());
    /// ```
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len());
        if start >= end {
            return Self::new();
        }
        Self::from_tree(self.tree.take(end).drop(start))
    }

    /// Inserts an element at `index`, shifting later elements back.
    ///
    /// Returns `None` if `index > len`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (0..5).collect();
    /// let inserted = vector.insert(2, 100).unwrap();
    /// assert_eq!(inserted.iter().copied().collect::<Vec<_>>(), vec![0, 1, 100, 2, 3, 4]);
    /// assert!(vector.insert(6, 0).is_none());
    /// ```
    #[must_use]
    pub fn insert(&self, index: usize, element: T) -> Option<Self> {
        if index > self.len() {
            return None;
        }
        let front = self.tree.take(index).push_back(element);
        Some(Self::from_tree(front.concat(&self.tree.drop(index))))
    }

    /// Removes the element at `index`, shifting later elements forward.
    ///
    /// Returns `None` if the index is out of bounds, otherwise the new vector
    /// and the removed element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (0..5).collect();
    /// let (removed, element) = vector.remove(1).unwrap();
    /// assert_eq!(element, 1);
    /// assert_eq!(removed.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3, 4]);
    /// ```
    #[must_use]
    pub fn remove(&self, index: usize) -> Option<(Self, T)> {
        let element = self.get(index)?.clone();
        let joined = self.tree.take(index).concat(&self.tree.drop(index + 1));
        Some((Self::from_tree(joined), element))
    }

    /// Appends another vector to this vector.
    ///
    /// # Arguments
    ///
    /// * `other` - The vector to append
    ///
    /// # Complexity
    ///
    /// O(log N): both vectors share their nodes with the result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector1: FlexVector<i32> = (1..=3).collect();
    /// let vector2: FlexVector<i32> = (4..=6).collect();
    /// let combined = vector1.append(&vector2);
    ///
    /// assert_eq!(combined.len(), 6);
    /// assert_eq!(combined.get(3), Some(&4));
    /// ```
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        Self::from_tree(self.tree.concat(&other.tree))
    }

    /// Returns a transient copy for batch editing.
    ///
    /// The vector itself is unaffected by edits made through the transient.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    ///
    /// let vector: FlexVector<i32> = (0..3).collect();
    /// let mut transient = vector.transient();
    /// transient.push_back(3);
    /// transient.push_back(4);
    /// let extended = transient.persistent();
    ///
    /// assert_eq!(vector.len(), 3);
    /// assert_eq!(extended.len(), 5);
    /// ```
    #[must_use]
    pub fn transient(&self) -> TransientFlexVector<T, C> {
        TransientFlexVector::from_tree(self.tree.clone())
    }

    /// Converts the vector into a transient for batch editing.
    #[must_use]
    pub fn into_transient(self) -> TransientFlexVector<T, C> {
        TransientFlexVector::from_tree(self.tree)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, C: TreeConfig> Clone for FlexVector<T, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T, C: TreeConfig> Default for FlexVector<T, C> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: TreeConfig> From<RrbTree<T, C>> for FlexVector<T, C> {
    fn from(tree: RrbTree<T, C>) -> Self {
        Self::from_tree(tree)
    }
}

impl<T: Clone, C: TreeConfig> From<Vec<T>> for FlexVector<T, C> {
    fn from(elements: Vec<T>) -> Self {
        elements.into_iter().collect()
    }
}

impl<T: Clone, C: TreeConfig> FromIterator<T> for FlexVector<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut transient = TransientFlexVector::new();
        transient.extend(iter);
        transient.persistent()
    }
}

impl<T: Clone, C: TreeConfig> Extend<T> for FlexVector<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut transient = mem::take(self).into_transient();
        transient.extend(iter);
        *self = transient.persistent();
    }
}

impl<T: Clone, C: TreeConfig> IntoIterator for FlexVector<T, C> {
    type Item = T;
    type IntoIter = FlexVectorIntoIterator<T, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        FlexVectorIntoIterator::new(self.tree)
    }
}

impl<'a, T, C: TreeConfig> IntoIterator for &'a FlexVector<T, C> {
    type Item = &'a T;
    type IntoIter = FlexVectorIterator<'a, T, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: TreeConfig> Index<usize> for FlexVector<T, C> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(element) => element,
            None => panic!("index {index} out of bounds for FlexVector of length {}", self.len()),
        }
    }
}

impl<T: Clone, C: TreeConfig> Add for FlexVector<T, C> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        self.append(&other)
    }
}

impl<T: Clone, C: TreeConfig> Add<&FlexVector<T, C>> for &FlexVector<T, C> {
    type Output = FlexVector<T, C>;

    fn add(self, other: &FlexVector<T, C>) -> Self::Output {
        self.append(other)
    }
}

impl<T: PartialEq, C: TreeConfig> PartialEq for FlexVector<T, C> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.tree.ptr_eq(&other.tree) || self.iter().eq(other.iter())
    }
}

impl<T: Eq, C: TreeConfig> Eq for FlexVector<T, C> {}

impl<T: PartialOrd, C: TreeConfig> PartialOrd for FlexVector<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, C: TreeConfig> Ord for FlexVector<T, C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

/// Computes a hash value for this vector.
///
/// The length is hashed first, then each element in order, so equal vectors
/// produce equal hashes regardless of their internal tree shape.
///
/// # Examples
///
/// ```rust
/// use flexvec::persistent::FlexVector;
/// use std::collections::HashMap;
///
/// let mut map: HashMap<FlexVector<i32>, &str> = HashMap::new();
/// let key: FlexVector<i32> = (1..=3).collect();
/// map.insert(key.clone(), "value");
/// assert_eq!(map.get(&key), Some(&"value"));
/// ```
impl<T: Hash, C: TreeConfig> Hash for FlexVector<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug, C: TreeConfig> fmt::Debug for FlexVector<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, C: TreeConfig> fmt::Display for FlexVector<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Parallel Iteration
// =============================================================================

#[cfg(feature = "rayon")]
impl<T: Sync, C: TreeConfig> FlexVector<T, C> {
    /// Returns a parallel iterator over references to the elements.
    ///
    /// Work is split by leaf, so each task walks a contiguous slice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexvec::persistent::FlexVector;
    /// use rayon::prelude::*;
    ///
    /// let vector: FlexVector<u64> = (1..=1000).collect();
    /// let sum: u64 = vector.par_iter().sum();
    /// assert_eq!(sum, 500_500);
    /// ```
    #[must_use]
    pub fn par_iter(&self) -> impl rayon::iter::ParallelIterator<Item = &T> {
        use rayon::prelude::*;

        let chunks: Vec<&[T]> = self.chunks().collect();
        chunks.into_par_iter().flat_map_iter(|chunk| chunk.iter())
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, C: TreeConfig> serde::Serialize for FlexVector<T, C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct FlexVectorVisitor<T, C> {
    marker: std::marker::PhantomData<(T, C)>,
}

#[cfg(feature = "serde")]
impl<T, C> FlexVectorVisitor<T, C> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::de::Visitor<'de> for FlexVectorVisitor<T, C>
where
    T: serde::Deserialize<'de> + Clone,
    C: TreeConfig,
{
    type Value = FlexVector<T, C>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut transient = TransientFlexVector::new();
        while let Some(element) = seq.next_element()? {
            transient.push_back(element);
        }
        Ok(transient.persistent())
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::Deserialize<'de> for FlexVector<T, C>
where
    T: serde::Deserialize<'de> + Clone,
    C: TreeConfig,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(FlexVectorVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::policy::RcPolicy;
    use rstest::rstest;

    type Tiny = Config<RcPolicy, 2, 2>;

    fn collect<C: TreeConfig>(vector: &FlexVector<i32, C>) -> Vec<i32> {
        vector.iter().copied().collect()
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_vector() {
        let vector: FlexVector<i32> = FlexVector::new();
        assert_eq!(format!("{vector}"), "[]");
    }

    #[rstest]
    fn test_display_multiple_elements_vector() {
        let vector: FlexVector<i32> = (1..=3).collect();
        assert_eq!(format!("{vector}"), "[1, 2, 3]");
        assert_eq!(format!("{vector:?}"), "[1, 2, 3]");
    }

    // =========================================================================
    // Construction and Access
    // =========================================================================

    #[rstest]
    fn test_index_into_vector_built_from_uneven_pieces() {
        let mut vector: FlexVector<usize> = FlexVector::new();
        let mut model = Vec::new();
        let mut next = 0;
        for piece_len in (1..=45).cycle().step_by(7).take(60) {
            let piece: FlexVector<usize> = (next..next + piece_len).collect();
            vector = vector.append(&piece);
            model.extend(next..next + piece_len);
            next += piece_len;
        }

        assert_eq!(vector.len(), model.len());
        for (index, expected) in model.iter().enumerate() {
            assert_eq!(vector.get(index), Some(expected));
            assert_eq!(vector[index], *expected);
        }
        assert_eq!(vector.get(model.len()), None);
        assert!(vector.tree().validate().is_ok());
    }

    #[rstest]
    #[should_panic(expected = "index 3 out of bounds")]
    fn test_index_out_of_bounds_panics() {
        let vector: FlexVector<i32> = (0..3).collect();
        let _ = vector[3];
    }

    #[rstest]
    fn test_first_and_last() {
        let vector: FlexVector<i32, Tiny> = (10..20).collect();
        assert_eq!(vector.first(), Some(&10));
        assert_eq!(vector.last(), Some(&19));
        let empty: FlexVector<i32, Tiny> = FlexVector::new();
        assert_eq!(empty.first(), None);
        assert_eq!(empty.last(), None);
    }

    // =========================================================================
    // Edits
    // =========================================================================

    #[rstest]
    fn test_push_front_many() {
        let vector = (0..200).rev().fold(FlexVector::<i32, Tiny>::new(), |vector, n| vector.push_front(n));
        assert_eq!(collect(&vector), (0..200).collect::<Vec<_>>());
        assert!(vector.tree().validate().is_ok());
    }

    #[rstest]
    fn test_pop_back_and_pop_front() {
        let vector: FlexVector<i32, Tiny> = (0..9).collect();
        let (front_removed, first) = vector.pop_front().unwrap();
        let (back_removed, last) = front_removed.pop_back().unwrap();
        assert_eq!((first, last), (0, 8));
        assert_eq!(collect(&back_removed), (1..8).collect::<Vec<_>>());
        assert!(FlexVector::<i32, Tiny>::new().pop_back().is_none());
        assert!(FlexVector::<i32, Tiny>::new().pop_front().is_none());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(17)]
    #[case(63)]
    #[case(64)]
    fn test_insert_and_remove_round_trip(#[case] index: usize) {
        let vector: FlexVector<i32, Tiny> = (0..64).collect();
        let inserted = vector.insert(index, -1).unwrap();
        assert_eq!(inserted.len(), 65);
        assert_eq!(inserted.get(index), Some(&-1));
        let (removed, element) = inserted.remove(index).unwrap();
        assert_eq!(element, -1);
        assert_eq!(removed, vector);
        assert!(removed.tree().validate().is_ok());
    }

    #[rstest]
    fn test_update_with_out_of_bounds_skips_function() {
        let vector: FlexVector<i32> = (0..3).collect();
        let result = vector.update_with(3, |_| panic!("must not be called"));
        assert!(result.is_none());
    }

    #[rstest]
    fn test_slice_clamps_bounds() {
        let vector: FlexVector<i32, Tiny> = (0..30).collect();
        assert_eq!(collect(&vector.slice(25, 100)), (25..30).collect::<Vec<_>>());
        assert!(vector.slice(30, 40).is_empty());
    }

    #[rstest]
    fn test_add_operator() {
        let left: FlexVector<i32> = (0..40).collect();
        let right: FlexVector<i32> = (40..90).collect();
        let by_reference = &left + &right;
        let by_value = left + right;
        assert_eq!(by_reference, by_value);
        assert_eq!(collect(&by_value), (0..90).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_extend_appends() {
        let mut vector: FlexVector<i32, Tiny> = (0..10).collect();
        let snapshot = vector.clone();
        vector.extend(10..50);
        assert_eq!(collect(&vector), (0..50).collect::<Vec<_>>());
        assert_eq!(collect(&snapshot), (0..10).collect::<Vec<_>>());
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    #[rstest]
    fn test_equality_ignores_tree_shape() {
        let pushed: FlexVector<i32, Tiny> = (0..100).collect();
        let concatenated = (0..100)
            .map(FlexVector::<i32, Tiny>::singleton)
            .fold(FlexVector::new(), |vector, single| single.append(&vector));
        let reversed: FlexVector<i32, Tiny> = (0..100).rev().collect();
        assert_eq!(concatenated, reversed);
        assert_ne!(pushed, reversed);
    }

    #[rstest]
    fn test_ordering_is_lexicographic() {
        let shorter: FlexVector<i32> = (0..3).collect();
        let longer: FlexVector<i32> = (0..4).collect();
        let bigger: FlexVector<i32> = FlexVector::from_slice(&[0, 2]);
        assert!(shorter < longer);
        assert!(longer < bigger);
    }
}
