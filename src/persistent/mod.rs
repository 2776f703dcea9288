//! Persistent (immutable) sequence types built on the RRB tree.
//!
//! - [`FlexVector`]: persistent vector with O(log n) concatenation, slicing,
//!   insertion and removal
//! - [`TransientFlexVector`]: single-owner mutable companion for batch edits
//!
//! # Structural Sharing
//!
//! Every edit returns a new vector that shares all unchanged nodes with the
//! original, so keeping old versions around is cheap.
//!
//! # Examples
//!
//! ```rust
//! use flexvec::persistent::FlexVector;
//!
//! let vector: FlexVector<i32> = (0..100).collect();
//! assert_eq!(vector.get(50), Some(&50));
//!
//! // Structural sharing: the original vector is preserved
//! let updated = vector.update(50, 999).unwrap();
//! assert_eq!(vector.get(50), Some(&50));     // Original unchanged
//! assert_eq!(updated.get(50), Some(&999));   // New version
//!
//! // Insertion in the middle keeps everything else shared
//! let inserted = vector.insert(10, -1).unwrap();
//! assert_eq!(inserted.len(), 101);
//! assert_eq!(inserted.get(11), Some(&10));
//! ```
//!
//! ## Batch Construction
//!
//! ```rust
//! use flexvec::persistent::TransientFlexVector;
//!
//! let mut transient: TransientFlexVector<i32> = TransientFlexVector::new();
//! transient.extend(0..10_000);
//! let vector = transient.persistent();
//! assert_eq!(vector.len(), 10_000);
//! ```

mod flex_vector;
mod iter;
mod transient;

pub use flex_vector::FlexVector;
pub use iter::FlexVectorIntoIterator;
pub use iter::FlexVectorIterator;
pub use transient::TransientFlexVector;
