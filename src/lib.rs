//! # flexvec
//!
//! Persistent sequences backed by a Relaxed Radix Balanced (RRB) tree.
//!
//! ## Overview
//!
//! - **[`FlexVector`]**: an immutable vector with O(log n) indexing, update,
//!   concatenation, slicing, insertion and removal, and amortized O(1) append
//! - **[`TransientFlexVector`]**: a single-owner companion that edits nodes in
//!   place for fast batch construction
//! - **[`RrbTree`]**: the underlying engine, parameterized by branching
//!   factors and an ownership policy through [`TreeConfig`]
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `Arc` so vectors are `Send + Sync`
//! - `rayon`: parallel iteration (implies `arc`)
//! - `serde`: `Serialize`/`Deserialize` for [`FlexVector`]
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use flexvec::prelude::*;
//!
//! let left: FlexVector<i32> = (0..1000).collect();
//! let right: FlexVector<i32> = (1000..2000).collect();
//! let joined = left.append(&right);
//!
//! assert_eq!(joined.len(), 2000);
//! assert_eq!(joined.get(1500), Some(&1500));
//! assert!(joined.tree().validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Allow some pedantic lints that are too strict for this library
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use flexvec::prelude::*;
///
/// let vector: FlexVector<u8> = FlexVector::singleton(1);
/// assert_eq!(vector.len(), 1);
/// ```
pub mod prelude {
    pub use crate::config::{Config, DefaultConfig, TreeConfig};
    pub use crate::error::TreeError;
    pub use crate::persistent::*;
    pub use crate::policy::{ArcPolicy, DefaultPolicy, OwnershipPolicy, RcPolicy};
    pub use crate::tree::RrbTree;
}

/// Tree geometry and ownership configuration.
pub mod config;

/// Structural invariant errors.
pub mod error;

/// Persistent and transient vector types.
pub mod persistent;

/// Reference-counting policies for tree nodes.
pub mod policy;

/// The RRB tree engine.
pub mod tree;

pub use config::{Config, DefaultConfig, TreeConfig};
pub use error::TreeError;
pub use persistent::{FlexVector, TransientFlexVector};
pub use tree::RrbTree;
