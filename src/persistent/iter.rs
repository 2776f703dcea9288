//! Element iterators for [`FlexVector`](super::FlexVector).
//!
//! Both iterators walk the vector one leaf at a time from either end: each
//! end fetches the leaf holding its next index with a single descent and then
//! yields from that slice. The two ends share an index range of leaves not
//! yet fetched, so they never yield the same element twice.

use std::iter::FusedIterator;
use std::slice;
use std::vec;

use crate::config::{DefaultConfig, TreeConfig};
use crate::tree::RrbTree;

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over references to the elements of a
/// [`FlexVector`](super::FlexVector).
///
/// Supports iteration from both ends and knows its exact length.
///
/// # Examples
///
/// ```rust
/// use flexvec::persistent::FlexVector;
///
/// let vector: FlexVector<i32> = (1..=5).collect();
/// let mut iter = vector.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&5));
/// assert_eq!(iter.len(), 3);
/// ```
pub struct FlexVectorIterator<'a, T, C: TreeConfig = DefaultConfig> {
    tree: &'a RrbTree<T, C>,
    front: slice::Iter<'a, T>,
    back: slice::Iter<'a, T>,
    /// First index not yet fetched by either end.
    unfetched_start: usize,
    /// One past the last index not yet fetched by either end.
    unfetched_end: usize,
}

impl<'a, T, C: TreeConfig> FlexVectorIterator<'a, T, C> {
    pub(crate) fn new(tree: &'a RrbTree<T, C>) -> Self {
        Self {
            tree,
            front: [].iter(),
            back: [].iter(),
            unfetched_start: 0,
            unfetched_end: tree.len(),
        }
    }
}

impl<'a, T, C: TreeConfig> Iterator for FlexVectorIterator<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.front.next() {
                return Some(element);
            }
            if self.unfetched_start >= self.unfetched_end {
                return self.back.next();
            }
            let (chunk, start) = self.tree.chunk_at(self.unfetched_start)?;
            let end = (start + chunk.len()).min(self.unfetched_end);
            self.front = chunk[self.unfetched_start - start..end - start].iter();
            self.unfetched_start = end;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len();
        (remaining, Some(remaining))
    }
}

impl<T, C: TreeConfig> DoubleEndedIterator for FlexVectorIterator<'_, T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.back.next_back() {
                return Some(element);
            }
            if self.unfetched_start >= self.unfetched_end {
                return self.front.next_back();
            }
            let (chunk, start) = self.tree.chunk_at(self.unfetched_end - 1)?;
            let begin = start.max(self.unfetched_start);
            self.back = chunk[begin - start..self.unfetched_end - start].iter();
            self.unfetched_end = begin;
        }
    }
}

impl<T, C: TreeConfig> ExactSizeIterator for FlexVectorIterator<'_, T, C> {
    fn len(&self) -> usize {
        self.front.len() + self.back.len() + (self.unfetched_end - self.unfetched_start)
    }
}

impl<T, C: TreeConfig> FusedIterator for FlexVectorIterator<'_, T, C> {}

impl<T, C: TreeConfig> Clone for FlexVectorIterator<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            unfetched_start: self.unfetched_start,
            unfetched_end: self.unfetched_end,
        }
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over the elements of a
/// [`FlexVector`](super::FlexVector).
///
/// Leaves may be shared with other vectors, so elements are cloned out one
/// leaf at a time.
pub struct FlexVectorIntoIterator<T, C: TreeConfig = DefaultConfig> {
    tree: RrbTree<T, C>,
    front: vec::IntoIter<T>,
    back: vec::IntoIter<T>,
    unfetched_start: usize,
    unfetched_end: usize,
}

impl<T, C: TreeConfig> FlexVectorIntoIterator<T, C> {
    pub(crate) fn new(tree: RrbTree<T, C>) -> Self {
        let unfetched_end = tree.len();
        Self {
            tree,
            front: Vec::new().into_iter(),
            back: Vec::new().into_iter(),
            unfetched_start: 0,
            unfetched_end,
        }
    }
}

impl<T: Clone, C: TreeConfig> Iterator for FlexVectorIntoIterator<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.front.next() {
                return Some(element);
            }
            if self.unfetched_start >= self.unfetched_end {
                return self.back.next();
            }
            let (chunk, start) = self.tree.chunk_at(self.unfetched_start)?;
            let end = (start + chunk.len()).min(self.unfetched_end);
            self.front = chunk[self.unfetched_start - start..end - start].to_vec().into_iter();
            self.unfetched_start = end;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len();
        (remaining, Some(remaining))
    }
}

impl<T: Clone, C: TreeConfig> DoubleEndedIterator for FlexVectorIntoIterator<T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.back.next_back() {
                return Some(element);
            }
            if self.unfetched_start >= self.unfetched_end {
                return self.front.next_back();
            }
            let (chunk, start) = self.tree.chunk_at(self.unfetched_end - 1)?;
            let begin = start.max(self.unfetched_start);
            self.back = chunk[begin - start..self.unfetched_end - start].to_vec().into_iter();
            self.unfetched_end = begin;
        }
    }
}

impl<T: Clone, C: TreeConfig> ExactSizeIterator for FlexVectorIntoIterator<T, C> {
    fn len(&self) -> usize {
        self.front.len() + self.back.len() + (self.unfetched_end - self.unfetched_start)
    }
}

impl<T: Clone, C: TreeConfig> FusedIterator for FlexVectorIntoIterator<T, C> {}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::persistent::FlexVector;
    use crate::policy::RcPolicy;
    use rstest::rstest;

    type Tiny = Config<RcPolicy, 2, 2>;

    fn vector_of(len: usize) -> FlexVector<usize, Tiny> {
        (0..len).collect()
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    #[case(9)]
    #[case(130)]
    fn test_forward_and_backward(#[case] len: usize) {
        let vector = vector_of(len);
        let forward: Vec<usize> = vector.iter().copied().collect();
        let backward: Vec<usize> = vector.iter().rev().copied().collect();
        assert_eq!(forward, (0..len).collect::<Vec<_>>());
        assert_eq!(backward, (0..len).rev().collect::<Vec<_>>());
    }

    #[rstest]
    fn test_alternating_ends_meet_in_the_middle() {
        let vector = vector_of(37);
        let mut iter = vector.iter();
        let mut seen = Vec::new();
        loop {
            match (iter.next(), iter.next_back()) {
                (Some(front), Some(back)) => {
                    seen.push(*front);
                    seen.push(*back);
                }
                (Some(front), None) => seen.push(*front),
                (None, _) => break,
            }
            assert_eq!(iter.len(), 37 - seen.len());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..37).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_into_iter_both_ends() {
        let vector = vector_of(50);
        let mut iter = vector.clone().into_iter();
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(49));
        assert_eq!(iter.len(), 48);
        let rest: Vec<usize> = iter.collect();
        assert_eq!(rest, (1..49).collect::<Vec<_>>());
        assert_eq!(vector.len(), 50);
    }
}
