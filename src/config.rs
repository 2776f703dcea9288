//! Compile-time tree geometry.
//!
//! A [`TreeConfig`] fixes three things for a tree type: the ownership
//! policy of its nodes, the number of branch bits `B` (internal nodes hold
//! up to `2^B` children) and the number of leaf bits `BL` (leaves hold up
//! to `2^BL` elements).
//!
//! [`Config`] carries all three as type parameters, so different geometries
//! are different types and two trees can only be concatenated when they
//! agree on all of them.
//!
//! # Examples
//!
//! ```rust
//! use flexvec::config::{Config, TreeConfig};
//! use flexvec::policy::RcPolicy;
//!
//! type Narrow = Config<RcPolicy, 2, 3>;
//! assert_eq!(Narrow::BITS, 2);
//! assert_eq!(Narrow::LEAF_BITS, 3);
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::policy::{DefaultPolicy, OwnershipPolicy};

/// Geometry and ownership policy of a tree type.
pub trait TreeConfig: 'static {
    /// Reference-counting policy for nodes.
    type Policy: OwnershipPolicy;

    /// Branch bits: internal nodes hold up to `2^BITS` children.
    const BITS: u32;

    /// Leaf bits: leaves hold up to `2^LEAF_BITS` elements.
    const LEAF_BITS: u32;
}

/// Type-level [`TreeConfig`].
///
/// `B` must lie in `2..=8` and `BL` in `1..=10`; other values are rejected
/// when the configuration is first used.
pub struct Config<P, const B: u32 = 5, const BL: u32 = 5> {
    _policy: PhantomData<P>,
}

impl<P: OwnershipPolicy, const B: u32, const BL: u32> TreeConfig for Config<P, B, BL> {
    type Policy = P;

    const BITS: u32 = {
        assert!(B >= 2 && B <= 8, "branch bits must lie in 2..=8");
        B
    };

    const LEAF_BITS: u32 = {
        assert!(BL >= 1 && BL <= 10, "leaf bits must lie in 1..=10");
        BL
    };
}

impl<P, const B: u32, const BL: u32> fmt::Debug for Config<P, B, BL> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Config<{B}, {BL}>")
    }
}

/// 32-way branching with 32-element leaves over [`DefaultPolicy`].
pub type DefaultConfig = Config<DefaultPolicy, 5, 5>;

// =============================================================================
// Geometry Helpers
// =============================================================================

/// Maximum children of an internal node.
#[inline]
pub(crate) fn branches<C: TreeConfig>() -> usize {
    1 << C::BITS
}

/// Maximum elements of a leaf.
#[inline]
pub(crate) fn leaf_capacity<C: TreeConfig>() -> usize {
    1 << C::LEAF_BITS
}

/// Shift of the children of a node at `shift`.
///
/// `shift` must belong to an internal node.
#[inline]
pub(crate) fn child_shift<C: TreeConfig>(shift: u32) -> u32 {
    if shift == C::LEAF_BITS {
        0
    } else {
        shift - C::BITS
    }
}

/// Shift of a node whose children sit at `shift`.
#[inline]
pub(crate) fn parent_shift<C: TreeConfig>(shift: u32) -> u32 {
    if shift == 0 {
        C::LEAF_BITS
    } else {
        shift + C::BITS
    }
}

/// Maximum elements under one child of a node at `shift`, saturating.
#[inline]
pub(crate) fn child_capacity(shift: u32) -> usize {
    1usize.checked_shl(shift).unwrap_or(usize::MAX)
}

/// Maximum elements under a node at `shift`, saturating.
#[inline]
pub(crate) fn subtree_capacity<C: TreeConfig>(shift: u32) -> usize {
    if shift == 0 {
        leaf_capacity::<C>()
    } else {
        1usize.checked_shl(shift + C::BITS).unwrap_or(usize::MAX)
    }
}

// =============================================================================
// Tests
// =============================================================================
