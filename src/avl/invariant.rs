//! Structural invariant checker.
//!
//! Walks the tree in pre-order and stops at the first node that breaks a
//! rule:
//! 1. Keys respect the bounds inherited from every ancestor
//! 2. Each node's parent link points at the node holding it (none for the root)
//! 3. `size = 1 + size(left) + size(right)`
//! 4. `height = 1 + max(height(left), height(right))`
//! 5. `|height(left) - height(right)| <= 1`
//!
//! This is a diagnostic; the mutation paths never call it.

use smallvec::SmallVec;

use super::arena::{NodeArena, NodeId};
use crate::error::{Invariant, TreeError};

/// A node waiting to be checked, with what its ancestors require of it.
struct Frame<'a, K> {
    id: NodeId,
    parent: Option<NodeId>,
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

impl<K: Ord, V> NodeArena<K, V> {
    /// Checks every node, in pre-order.
    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        let mut pending: SmallVec<[Frame<'_, K>; 32]> = SmallVec::new();
        if let Some(root) = self.root() {
            pending.push(Frame {
                id: root,
                parent: None,
                lower: None,
                upper: None,
            });
        }

        while let Some(frame) = pending.pop() {
            self.validate_node(&frame)?;

            let node = &self[frame.id];
            // right first so the left subtree is popped first
            if let Some(right) = node.right {
                pending.push(Frame {
                    id: right,
                    parent: Some(frame.id),
                    lower: Some(&node.key),
                    upper: frame.upper,
                });
            }
            if let Some(left) = node.left {
                pending.push(Frame {
                    id: left,
                    parent: Some(frame.id),
                    lower: frame.lower,
                    upper: Some(&node.key),
                });
            }
        }

        Ok(())
    }

    fn validate_node(&self, frame: &Frame<'_, K>) -> Result<(), TreeError> {
        let node = &self[frame.id];
        let violation = |invariant: Invariant| {
            tracing::debug!(node = %frame.id, %invariant, "structural invariant violated");
            TreeError::StructuralInvariantViolation {
                node: frame.id,
                invariant,
            }
        };

        if node.parent != frame.parent {
            return Err(violation(Invariant::ParentLink {
                expected: frame.parent,
                actual: node.parent,
            }));
        }

        let below_lower = frame.lower.is_some_and(|lower| node.key <= *lower);
        let above_upper = frame.upper.is_some_and(|upper| node.key >= *upper);
        if below_lower || above_upper {
            return Err(violation(Invariant::Ordering));
        }

        let expected_size = 1 + self.size(node.left) + self.size(node.right);
        if node.size != expected_size {
            return Err(violation(Invariant::Size {
                expected: expected_size,
                actual: node.size,
            }));
        }

        let left_height = self.height(node.left);
        let right_height = self.height(node.right);
        let expected_height = 1 + left_height.max(right_height);
        if node.height != expected_height {
            return Err(violation(Invariant::Height {
                expected: expected_height,
                actual: node.height,
            }));
        }

        if left_height.abs_diff(right_height) > 1 {
            return Err(violation(Invariant::Balance {
                left_height,
                right_height,
            }));
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Builds the balanced tree 2(1, 3) by hand.
    fn three_nodes() -> (NodeArena<i32, ()>, [NodeId; 3]) {
        let mut arena = NodeArena::new();
        let one = arena.allocate(1, (), None);
        let two = arena.allocate(2, (), None);
        let three = arena.allocate(3, (), None);
        arena.attach_root(Some(two));
        arena.attach_left(two, Some(one));
        arena.attach_right(two, Some(three));
        arena.refresh(two);
        (arena, [one, two, three])
    }

    fn invariant_of(result: Result<(), TreeError>) -> Option<(NodeId, Invariant)> {
        match result {
            Err(TreeError::StructuralInvariantViolation { node, invariant }) => {
                Some((node, invariant))
            }
            _ => None,
        }
    }

    #[rstest]
    fn test_empty_arena_is_valid() {
        let arena: NodeArena<i32, ()> = NodeArena::new();
        assert_eq!(arena.validate(), Ok(()));
    }

    #[rstest]
    fn test_well_formed_tree_is_valid() {
        let (arena, _) = three_nodes();
        assert_eq!(arena.validate(), Ok(()));
    }

    #[rstest]
    fn test_detects_wrong_parent_link() {
        let (mut arena, [one, two, three]) = three_nodes();
        arena[three].parent = Some(one);

        assert_eq!(
            invariant_of(arena.validate()),
            Some((
                three,
                Invariant::ParentLink {
                    expected: Some(two),
                    actual: Some(one),
                }
            ))
        );
    }

    #[rstest]
    fn test_detects_root_with_parent() {
        let (mut arena, [one, two, _]) = three_nodes();
        arena[two].parent = Some(one);

        assert_eq!(
            invariant_of(arena.validate()),
            Some((
                two,
                Invariant::ParentLink {
                    expected: None,
                    actual: Some(one),
                }
            ))
        );
    }

    #[rstest]
    fn test_detects_key_out_of_order() {
        let (mut arena, [one, _, _]) = three_nodes();
        arena[one].key = 5;

        assert_eq!(
            invariant_of(arena.validate()),
            Some((one, Invariant::Ordering))
        );
    }

    #[rstest]
    fn test_detects_key_violating_ancestor_bound() {
        // 4(2(1, 3), 6): the 3 is replaced by 5, which is fine for its
        // parent but not for the root
        let mut arena: NodeArena<i32, ()> = NodeArena::new();
        let ids: Vec<NodeId> = [4, 2, 6, 1, 5]
            .iter()
            .map(|&key| arena.allocate(key, (), None))
            .collect();
        arena.attach_root(Some(ids[0]));
        arena.attach_left(ids[0], Some(ids[1]));
        arena.attach_right(ids[0], Some(ids[2]));
        arena.attach_left(ids[1], Some(ids[3]));
        arena.attach_right(ids[1], Some(ids[4]));
        arena.refresh(ids[1]);
        arena.refresh(ids[0]);

        assert_eq!(
            invariant_of(arena.validate()),
            Some((ids[4], Invariant::Ordering))
        );
    }

    #[rstest]
    fn test_detects_duplicate_key() {
        let (mut arena, [_, _, three]) = three_nodes();
        arena[three].key = 2;

        assert_eq!(
            invariant_of(arena.validate()),
            Some((three, Invariant::Ordering))
        );
    }

    #[rstest]
    fn test_detects_stale_size() {
        let (mut arena, [_, two, _]) = three_nodes();
        arena[two].size = 4;

        assert_eq!(
            invariant_of(arena.validate()),
            Some((
                two,
                Invariant::Size {
                    expected: 3,
                    actual: 4,
                }
            ))
        );
    }

    #[rstest]
    fn test_detects_stale_height() {
        let (mut arena, [one, _, _]) = three_nodes();
        // still consistent with the root, which only sees max(0, 1)
        arena[one].height = 0;

        assert_eq!(
            invariant_of(arena.validate()),
            Some((
                one,
                Invariant::Height {
                    expected: 1,
                    actual: 0,
                }
            ))
        );
    }

    #[rstest]
    fn test_detects_imbalance() {
        let mut arena: NodeArena<i32, ()> = NodeArena::new();
        let ids: Vec<NodeId> = [1, 2, 3]
            .iter()
            .map(|&key| arena.allocate(key, (), None))
            .collect();
        arena.attach_root(Some(ids[0]));
        arena.attach_right(ids[0], Some(ids[1]));
        arena.attach_right(ids[1], Some(ids[2]));
        arena.refresh(ids[1]);
        arena.refresh(ids[0]);

        assert_eq!(
            invariant_of(arena.validate()),
            Some((
                ids[0],
                Invariant::Balance {
                    left_height: 0,
                    right_height: 2,
                }
            ))
        );
    }

    #[rstest]
    fn test_reports_first_violation_in_pre_order() {
        let (mut arena, [one, two, three]) = three_nodes();
        arena[one].height = 5;
        arena[three].height = 5;
        arena[two].size = 9;

        assert_eq!(invariant_of(arena.validate()).map(|(node, _)| node), Some(two));
    }
}
