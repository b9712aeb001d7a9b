//! # balanced-map
//!
//! A self-balancing ordered map for Rust, built on an AVL tree with
//! per-node size and height augmentation.
//!
//! ## Overview
//!
//! - **[`avl::BalancedOrderedMap`]**: the map itself, O(log N) `get`,
//!   `put`, `put_if_absent` and `remove`, O(1) `len` and `height`
//! - **[`ordered_map::OrderedMap`]**: the contract the map implements
//! - **[`avl::Entry`]**: read-only view of a node and its neighbours
//! - **[`error::TreeError`]**: rejected arguments and invariant violations
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for `BalancedOrderedMap`
//!
//! ## Logging
//!
//! Rotations and slot releases are reported at `trace` level and invariant
//! violations at `debug` level through [`tracing`]. Install a subscriber to
//! see them.
//!
//! ## Example
//!
//! ```rust
//! use balanced_map::prelude::*;
//!
//! let mut map = BalancedOrderedMap::new();
//! map.put(2, "two");
//! map.put(1, "one");
//! map.put(3, "three");
//!
//! assert_eq!(map.height(), 2);
//! assert_eq!(map.remove(&2), Some("two"));
//! assert!(map.check_invariants().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use balanced_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::avl::{BalancedOrderedMap, Entry, NodeId};
    pub use crate::error::{Invariant, TreeError};
    pub use crate::ordered_map::{OrderedMap, TreeEntry};
}

pub mod avl;
pub mod error;
pub mod ordered_map;
