//! Ownership policies for shared tree nodes.
//!
//! Every node of an RRB tree lives behind a reference-counted handle. The
//! tree engine never names `Rc` or `Arc` directly; it goes through an
//! [`OwnershipPolicy`], which provides the handful of capabilities the
//! engine needs:
//!
//! - **retain**: cloning a handle increments the reference count
//! - **release**: dropping a handle decrements it, destroying the value
//!   when the count reaches zero
//! - **uniqueness**: [`OwnershipPolicy::is_unique`] tells the transient
//!   protocol whether a node may be edited in place
//!
//! Two policies are provided:
//!
//! - [`RcPolicy`]: non-atomic counting, single-threaded
//! - [`ArcPolicy`]: atomic counting, values can be shared across threads
//!
//! [`DefaultPolicy`] is [`RcPolicy`] unless the `arc` feature is enabled.
//!
//! # Examples
//!
//! ```rust
//! use flexvec::policy::{OwnershipPolicy, RcPolicy};
//!
//! let shared = RcPolicy::share(42);
//! assert!(RcPolicy::is_unique(&shared));
//!
//! let retained = shared.clone();
//! assert!(!RcPolicy::is_unique(&shared));
//! assert!(RcPolicy::ptr_eq(&shared, &retained));
//! ```

use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

// =============================================================================
// Policy Trait
// =============================================================================

/// Reference-counting discipline for shared structure.
///
/// Implementations are type-level markers; they are never instantiated.
pub trait OwnershipPolicy: 'static {
    /// Shared handle type. Cloning retains, dropping releases.
    type Shared<V>: Deref<Target = V> + Clone;

    /// Moves `value` into a fresh handle with a reference count of one.
    fn share<V>(value: V) -> Self::Shared<V>;

    /// Returns `true` if `shared` is the only handle to its value.
    fn is_unique<V>(shared: &Self::Shared<V>) -> bool;

    /// Returns a mutable reference, cloning the value first if it is shared.
    fn make_mut<V: Clone>(shared: &mut Self::Shared<V>) -> &mut V;

    /// Takes the value out of the handle if it is the only one.
    ///
    /// # Errors
    ///
    /// Returns the handle unchanged if other handles exist.
    fn try_unwrap<V>(shared: Self::Shared<V>) -> Result<V, Self::Shared<V>>;

    /// Returns `true` if both handles point to the same value.
    fn ptr_eq<V>(left: &Self::Shared<V>, right: &Self::Shared<V>) -> bool;

    /// Returns the number of handles to the value.
    fn strong_count<V>(shared: &Self::Shared<V>) -> usize;
}

// =============================================================================
// Rc Policy
// =============================================================================

/// Non-atomic reference counting with [`std::rc::Rc`].
///
/// Trees using this policy are neither `Send` nor `Sync`.
#[derive(Debug)]
pub enum RcPolicy {}

impl OwnershipPolicy for RcPolicy {
    type Shared<V> = Rc<V>;

    #[inline]
    fn share<V>(value: V) -> Rc<V> {
        Rc::new(value)
    }

    #[inline]
    fn is_unique<V>(shared: &Rc<V>) -> bool {
        Rc::strong_count(shared) == 1 && Rc::weak_count(shared) == 0
    }

    #[inline]
    fn make_mut<V: Clone>(shared: &mut Rc<V>) -> &mut V {
        Rc::make_mut(shared)
    }

    #[inline]
    fn try_unwrap<V>(shared: Rc<V>) -> Result<V, Rc<V>> {
        Rc::try_unwrap(shared)
    }

    #[inline]
    fn ptr_eq<V>(left: &Rc<V>, right: &Rc<V>) -> bool {
        Rc::ptr_eq(left, right)
    }

    #[inline]
    fn strong_count<V>(shared: &Rc<V>) -> usize {
        Rc::strong_count(shared)
    }
}

// =============================================================================
// Arc Policy
// =============================================================================

/// Atomic reference counting with [`std::sync::Arc`].
///
/// Trees using this policy are `Send + Sync` whenever the element type is.
#[derive(Debug)]
pub enum ArcPolicy {}

impl OwnershipPolicy for ArcPolicy {
    type Shared<V> = Arc<V>;

    #[inline]
    fn share<V>(value: V) -> Arc<V> {
        Arc::new(value)
    }

    #[inline]
    fn is_unique<V>(shared: &Arc<V>) -> bool {
        Arc::strong_count(shared) == 1 && Arc::weak_count(shared) == 0
    }

    #[inline]
    fn make_mut<V: Clone>(shared: &mut Arc<V>) -> &mut V {
        Arc::make_mut(shared)
    }

    #[inline]
    fn try_unwrap<V>(shared: Arc<V>) -> Result<V, Arc<V>> {
        Arc::try_unwrap(shared)
    }

    #[inline]
    fn ptr_eq<V>(left: &Arc<V>, right: &Arc<V>) -> bool {
        Arc::ptr_eq(left, right)
    }

    #[inline]
    fn strong_count<V>(shared: &Arc<V>) -> usize {
        Arc::strong_count(shared)
    }
}

// =============================================================================
// Default Policy
// =============================================================================

/// Policy used when none is specified.
///
/// When the `arc` feature is enabled, this is [`ArcPolicy`],
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is [`RcPolicy`],
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub type DefaultPolicy = ArcPolicy;

/// Policy used when none is specified.
///
/// When the `arc` feature is enabled, this is [`ArcPolicy`],
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is [`RcPolicy`],
/// which is faster but not thread-safe.
#[cfg(not(feature = "arc"))]
pub type DefaultPolicy = RcPolicy;

// =============================================================================
// Tests
// =============================================================================
