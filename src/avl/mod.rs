//! AVL-balanced ordered map.
//!
//! This module provides [`BalancedOrderedMap`], a mutable ordered map kept
//! balanced by AVL rotations, and [`Entry`], a read-only view of one of its
//! nodes.
//!
//! # Overview
//!
//! Every node stores the size and height of its subtree. After each
//! insertion or removal the path from the mutation point back to the root
//! is rebalanced node by node:
//!
//! - left-heavy by two, outer grandchild at least as tall: rotate right
//! - left-heavy by two, inner grandchild taller: rotate the left child
//!   left, then rotate right
//! - right-heavy: the mirror image
//! - otherwise: refresh the node's size and height
//!
//! The tree therefore satisfies, after every public operation:
//! 1. Keys in a left subtree are smaller than the node's key, keys in a
//!    right subtree larger
//! 2. Parent links agree with child links; the root has no parent
//! 3. Sizes and heights agree with the children
//! 4. Sibling subtree heights differ by at most one
//!
//! [`BalancedOrderedMap::check_invariants`] verifies all four.
//!
//! # Examples
//!
//! ```rust
//! use balanced_map::avl::BalancedOrderedMap;
//!
//! let mut map = BalancedOrderedMap::new();
//! for key in [10, 20, 30, 40, 50, 25] {
//!     map.put(key, key.to_string());
//! }
//!
//! let keys: Vec<&i32> = map.in_order().into_iter().map(|(key, _)| key).collect();
//! assert_eq!(keys, vec![&10, &20, &25, &30, &40, &50]);
//!
//! let root = map.entry_list()[0];
//! assert_eq!(root.key(), &30);
//! assert_eq!(root.balance_factor(), 0);
//! ```
//!
//! # Internal Structure
//!
//! Nodes live in an index arena. Child links own their subtree through the
//! arena; parent links are plain indices, so the structure has no
//! reference cycles and `clear` releases everything at once.

mod arena;
mod entry;
mod invariant;
mod map;
mod rebalance;

pub use arena::NodeId;
pub use entry::Entry;
pub use map::BalancedOrderedMap;
