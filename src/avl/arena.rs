//! Slot arena holding the tree nodes.
//!
//! Child and parent links are [`NodeId`] indices into the arena rather than
//! pointers, so the parent back reference never forms an ownership cycle.
//! Released slots are chained into a free list and reused by the next
//! allocation.

use std::fmt;
use std::ops::{Index, IndexMut};

// =============================================================================
// NodeId
// =============================================================================

/// Index of a node inside a map's arena.
///
/// Ids are only meaningful for the map that produced them, and only until
/// the next mutation of that map.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// A tree node with its size/height augmentation.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) size: usize,
    pub(crate) height: usize,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    const fn leaf(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            size: 1,
            height: 1,
        }
    }
}

#[derive(Clone, Debug)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<NodeId> },
}

// =============================================================================
// NodeArena
// =============================================================================

/// Storage for every node of one tree, plus the root link.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Slot<K, V>>,
    next_free: Option<NodeId>,
    root: Option<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_free: None,
            root: None,
        }
    }

    #[inline]
    pub(crate) const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Stores a new leaf and returns its id. Linking it into the tree is the
    /// caller's job.
    pub(crate) fn allocate(&mut self, key: K, value: V, parent: Option<NodeId>) -> NodeId {
        let node = Node::leaf(key, value, parent);
        match self.next_free {
            Some(id) => {
                if let Slot::Vacant { next_free } = &self.slots[id.0] {
                    self.next_free = *next_free;
                }
                self.slots[id.0] = Slot::Occupied(node);
                id
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Frees a slot that is no longer linked into the tree and hands back its node.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        let vacant = Slot::Vacant {
            next_free: self.next_free,
        };
        match std::mem::replace(&mut self.slots[id.0], vacant) {
            Slot::Occupied(node) => {
                self.next_free = Some(id);
                tracing::trace!(node = %id, "released node slot");
                node
            }
            Slot::Vacant { .. } => unreachable!("node {id} released twice"),
        }
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.next_free = None;
        self.root = None;
    }

    // =========================================================================
    // Augmentation
    // =========================================================================

    /// Subtree size, 0 for an absent subtree.
    #[inline]
    pub(crate) fn size(&self, node: Option<NodeId>) -> usize {
        node.map_or(0, |id| self[id].size)
    }

    /// Subtree height, 0 for an absent subtree.
    #[inline]
    pub(crate) fn height(&self, node: Option<NodeId>) -> usize {
        node.map_or(0, |id| self[id].height)
    }

    /// Recomputes `size` and `height` of `id` from its children.
    pub(crate) fn refresh(&mut self, id: NodeId) {
        let (left, right) = (self[id].left, self[id].right);
        let size = 1 + self.size(left) + self.size(right);
        let height = 1 + self.height(left).max(self.height(right));
        let node = &mut self[id];
        node.size = size;
        node.height = height;
    }

    // =========================================================================
    // Linkage
    // =========================================================================

    pub(crate) fn attach_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self[parent].left = child;
        if let Some(child) = child {
            self[child].parent = Some(parent);
        }
    }

    pub(crate) fn attach_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self[parent].right = child;
        if let Some(child) = child {
            self[child].parent = Some(parent);
        }
    }

    pub(crate) fn attach_root(&mut self, child: Option<NodeId>) {
        self.root = child;
        if let Some(child) = child {
            self[child].parent = None;
        }
    }

    /// Puts `replacement` into the slot `old` occupies under `parent`.
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        replacement: Option<NodeId>,
    ) {
        match parent {
            None => self.attach_root(replacement),
            Some(parent) if self[parent].left == Some(old) => {
                self.attach_left(parent, replacement);
            }
            Some(parent) => self.attach_right(parent, replacement),
        }
    }

    /// The rightmost node of the subtree rooted at `id`.
    pub(crate) fn max_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(right) = self[current].right {
            current = right;
        }
        current
    }

    /// The leftmost node of the subtree rooted at `id`.
    pub(crate) fn min_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(left) = self[current].left {
            current = left;
        }
        current
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("node {id} read after release"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("node {id} written after release"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_allocate_creates_leaf() {
        let mut arena: NodeArena<i32, &str> = NodeArena::new();
        let id = arena.allocate(1, "one", None);
        assert_eq!(arena[id].size, 1);
        assert_eq!(arena[id].height, 1);
        assert_eq!(arena[id].left, None);
        assert_eq!(arena[id].right, None);
    }

    #[rstest]
    fn test_released_slot_is_reused() {
        let mut arena: NodeArena<i32, i32> = NodeArena::new();
        let first = arena.allocate(1, 10, None);
        let second = arena.allocate(2, 20, None);
        let released = arena.release(first);
        assert_eq!(released.key, 1);
        assert_eq!(released.value, 10);

        let third = arena.allocate(3, 30, None);
        assert_eq!(third, first);
        assert_ne!(third, second);
        assert_eq!(arena[third].key, 3);
    }

    #[rstest]
    fn test_free_list_is_last_in_first_out() {
        let mut arena: NodeArena<i32, i32> = NodeArena::new();
        let ids: Vec<NodeId> = (0..4).map(|key| arena.allocate(key, key, None)).collect();
        arena.release(ids[1]);
        arena.release(ids[3]);
        assert_eq!(arena.allocate(10, 10, None), ids[3]);
        assert_eq!(arena.allocate(11, 11, None), ids[1]);
        assert_eq!(arena.allocate(12, 12, None), NodeId::new(4));
    }

    #[rstest]
    fn test_attach_sets_both_directions() {
        let mut arena: NodeArena<i32, ()> = NodeArena::new();
        let parent = arena.allocate(2, (), None);
        let left = arena.allocate(1, (), None);
        let right = arena.allocate(3, (), None);
        arena.attach_root(Some(parent));
        arena.attach_left(parent, Some(left));
        arena.attach_right(parent, Some(right));

        assert_eq!(arena.root(), Some(parent));
        assert_eq!(arena[parent].left, Some(left));
        assert_eq!(arena[parent].right, Some(right));
        assert_eq!(arena[left].parent, Some(parent));
        assert_eq!(arena[right].parent, Some(parent));
    }

    #[rstest]
    fn test_refresh_recomputes_from_children() {
        let mut arena: NodeArena<i32, ()> = NodeArena::new();
        let parent = arena.allocate(2, (), None);
        let left = arena.allocate(1, (), None);
        arena.attach_left(parent, Some(left));
        assert_eq!(arena[parent].size, 1);

        arena.refresh(parent);
        assert_eq!(arena[parent].size, 2);
        assert_eq!(arena[parent].height, 2);
        assert_eq!(arena.size(None), 0);
        assert_eq!(arena.height(None), 0);
    }

    #[rstest]
    fn test_replace_child_uses_the_occupied_slot() {
        let mut arena: NodeArena<i32, ()> = NodeArena::new();
        let parent = arena.allocate(2, (), None);
        let right = arena.allocate(3, (), None);
        let replacement = arena.allocate(4, (), None);
        arena.attach_root(Some(parent));
        arena.attach_right(parent, Some(right));

        arena.replace_child(Some(parent), right, Some(replacement));
        assert_eq!(arena[parent].left, None);
        assert_eq!(arena[parent].right, Some(replacement));
        assert_eq!(arena[replacement].parent, Some(parent));

        arena.replace_child(None, parent, Some(replacement));
        assert_eq!(arena.root(), Some(replacement));
        assert_eq!(arena[replacement].parent, None);
    }

    #[rstest]
    fn test_node_id_display() {
        assert_eq!(format!("{}", NodeId::new(12)), "#12");
        assert_eq!(NodeId::new(12).index(), 12);
    }
}
