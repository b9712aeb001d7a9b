//! Rotations and the AVL rebalance decision.
//!
//! Every function here takes the parent of the node it works on explicitly.
//! The parent decides which slot the promoted node lands in (the root slot
//! when it is `None`).

use super::arena::{NodeArena, NodeId};

impl<K, V> NodeArena<K, V> {
    /// Rotates left around `pivot`, promoting its right child.
    ///
    /// ```text
    ///     pivot               promoted
    ///     /   \               /      \
    ///    a  promoted  =>   pivot      c
    ///        /    \        /   \
    ///    inner     c      a   inner
    /// ```
    ///
    /// Does nothing when `pivot` has no right child.
    pub(crate) fn rotate_left(&mut self, parent: Option<NodeId>, pivot: NodeId) {
        let Some(promoted) = self[pivot].right else {
            return;
        };
        let inner = self[promoted].left;

        self.replace_child(parent, pivot, Some(promoted));
        self.attach_left(promoted, Some(pivot));
        self.attach_right(pivot, inner);
        // pivot is now below promoted and must be final first
        self.refresh(pivot);
        self.refresh(promoted);

        tracing::trace!(pivot = %pivot, promoted = %promoted, "rotated left");
    }

    /// Rotates right around `pivot`, promoting its left child. Mirror of
    /// [`rotate_left`](Self::rotate_left).
    pub(crate) fn rotate_right(&mut self, parent: Option<NodeId>, pivot: NodeId) {
        let Some(promoted) = self[pivot].left else {
            return;
        };
        let inner = self[promoted].right;

        self.replace_child(parent, pivot, Some(promoted));
        self.attach_right(promoted, Some(pivot));
        self.attach_left(pivot, inner);
        self.refresh(pivot);
        self.refresh(promoted);

        tracing::trace!(pivot = %pivot, promoted = %promoted, "rotated right");
    }

    /// Restores the balance bound at `id` after one of its subtrees changed
    /// height by at most one level, refreshing its augmentation either way.
    ///
    /// The outer grandchild wins ties (`>=`), so a single rotation is
    /// preferred whenever it suffices.
    pub(crate) fn rebalance(&mut self, parent: Option<NodeId>, id: NodeId) {
        let (left, right) = (self[id].left, self[id].right);
        let left_height = self.height(left);
        let right_height = self.height(right);

        if left_height > right_height + 1 {
            if let Some(left) = left
                && self.height(self[left].left) < self.height(self[left].right)
            {
                self.rotate_left(Some(id), left);
            }
            self.rotate_right(parent, id);
        } else if right_height > left_height + 1 {
            if let Some(right) = right
                && self.height(self[right].right) < self.height(self[right].left)
            {
                self.rotate_right(Some(id), right);
            }
            self.rotate_left(parent, id);
        } else {
            self.refresh(id);
        }
    }
}
