//! Error types for the balanced map.
//!
//! Only two conditions are failures: an absent key handed to one of the
//! `try_put*` entry points, and a broken structural invariant reported by
//! the checker. Looking up or removing a missing key is not an error; it
//! yields `None`.

use crate::avl::NodeId;

/// The structural rule that a node failed during validation.
///
/// # Examples
///
/// ```rust
/// use balanced_map::error::Invariant;
///
/// let invariant = Invariant::Size { expected: 3, actual: 2 };
/// assert_eq!(format!("{invariant}"), "size is 2, expected 3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Invariant {
    /// A key lies outside the bounds inherited from its ancestors.
    #[error("key is out of search-tree order")]
    Ordering,
    /// The stored parent link does not match the node actually holding the child.
    #[error("parent link is {actual:?}, expected {expected:?}")]
    ParentLink {
        /// The node that owns this one as a child, `None` for the root.
        expected: Option<NodeId>,
        /// The parent link stored on the node.
        actual: Option<NodeId>,
    },
    /// The stored subtree size disagrees with the children.
    #[error("size is {actual}, expected {expected}")]
    Size {
        /// `1 + size(left) + size(right)`.
        expected: usize,
        /// The stored size.
        actual: usize,
    },
    /// The stored subtree height disagrees with the children.
    #[error("height is {actual}, expected {expected}")]
    Height {
        /// `1 + max(height(left), height(right))`.
        expected: usize,
        /// The stored height.
        actual: usize,
    },
    /// Sibling subtree heights differ by more than one.
    #[error("subtree heights {left_height} and {right_height} differ by more than one")]
    Balance {
        /// Height of the left subtree.
        left_height: usize,
        /// Height of the right subtree.
        right_height: usize,
    },
}

/// Errors raised by [`BalancedOrderedMap`](crate::avl::BalancedOrderedMap).
///
/// # Examples
///
/// ```rust
/// use balanced_map::avl::BalancedOrderedMap;
/// use balanced_map::error::TreeError;
///
/// let mut map: BalancedOrderedMap<i32, &str> = BalancedOrderedMap::new();
/// let result = map.try_put(None, "orphan");
/// assert_eq!(result, Err(TreeError::InvalidArgument("key can not be absent")));
/// assert!(map.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// An argument was rejected before the map was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The checker found a node that breaks one of the tree invariants.
    #[error("structural invariant violated at node {node}: {invariant}")]
    StructuralInvariantViolation {
        /// The offending node.
        node: NodeId,
        /// The rule it breaks.
        invariant: Invariant,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_invalid_argument_display() {
        let error = TreeError::InvalidArgument("key can not be absent");
        assert_eq!(format!("{error}"), "invalid argument: key can not be absent");
    }

    #[rstest]
    #[case(Invariant::Ordering, "key is out of search-tree order")]
    #[case(Invariant::Height { expected: 3, actual: 4 }, "height is 4, expected 3")]
    #[case(
        Invariant::Balance { left_height: 3, right_height: 1 },
        "subtree heights 3 and 1 differ by more than one"
    )]
    fn test_invariant_display(#[case] invariant: Invariant, #[case] expected: &str) {
        assert_eq!(format!("{invariant}"), expected);
    }

    #[rstest]
    fn test_structural_violation_names_node_and_rule() {
        let error = TreeError::StructuralInvariantViolation {
            node: NodeId::new(7),
            invariant: Invariant::Size {
                expected: 5,
                actual: 6,
            },
        };
        assert_eq!(
            format!("{error}"),
            "structural invariant violated at node #7: size is 6, expected 5"
        );
    }
}
