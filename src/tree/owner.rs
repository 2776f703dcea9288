//! Edit tokens for the transient protocol.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Identity of a transient editing session.
///
/// Nodes are stamped with the token of the session that created or copied
/// them. A node may be edited in place only by the session whose token it
/// carries, and only while it is uniquely referenced. [`Owner::NONE`] never
/// grants in-place edits; persistent operations use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Owner(u64);

impl Owner {
    /// Token of persistent operations and of nodes no session owns.
    pub(crate) const NONE: Self = Self(0);

    /// A token distinct from every token handed out before.
    pub(crate) fn fresh() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub(crate) const fn is_transient(self) -> bool {
        self.0 != 0
    }
}
