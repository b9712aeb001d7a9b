//! Read-only entry views.

use std::fmt;

use super::arena::{NodeArena, NodeId};
use crate::ordered_map::TreeEntry;

/// A borrowed view of one node of a [`BalancedOrderedMap`](super::BalancedOrderedMap).
///
/// Besides the key and value it exposes the node's augmentation and lets
/// callers walk to the parent and children. The view borrows the map, so
/// it can never observe a tree that has since been mutated.
///
/// # Examples
///
/// ```rust
/// use balanced_map::avl::BalancedOrderedMap;
///
/// let map: BalancedOrderedMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
/// let root = map.entry_list()[0];
///
/// assert_eq!(root.key(), &2);
/// assert_eq!(root.size(), 3);
/// assert_eq!(root.left().map(|left| *left.value()), Some('a'));
/// assert!(root.parent().is_none());
/// ```
pub struct Entry<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    id: NodeId,
}

impl<'a, K, V> Entry<'a, K, V> {
    pub(crate) const fn new(arena: &'a NodeArena<K, V>, id: NodeId) -> Self {
        Self { arena, id }
    }

    fn at(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self::new(self.arena, id))
    }

    /// The node's arena id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The entry's key.
    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.arena[self.id].key
    }

    /// The entry's value.
    #[must_use]
    pub fn value(&self) -> &'a V {
        &self.arena[self.id].value
    }

    /// Number of entries in this subtree, including this one.
    #[must_use]
    pub fn size(&self) -> usize {
        self.arena[self.id].size
    }

    /// Height of this subtree; a leaf has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        self.arena[self.id].height
    }

    /// Left subtree height minus right subtree height.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn balance_factor(&self) -> isize {
        let node = &self.arena[self.id];
        self.arena.height(node.left) as isize - self.arena.height(node.right) as isize
    }

    /// The entry holding this one as a child.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.at(self.arena[self.id].parent)
    }

    /// Root of the left subtree.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.at(self.arena[self.id].left)
    }

    /// Root of the right subtree.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.at(self.arena[self.id].right)
    }
}

impl<K, V> Clone for Entry<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Entry<'_, K, V> {}

impl<K, V> PartialEq for Entry<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.id == other.id
    }
}

impl<K, V> Eq for Entry<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Entry")
            .field("id", &self.id)
            .field("key", self.key())
            .field("value", self.value())
            .field("size", &self.size())
            .field("height", &self.height())
            .finish()
    }
}

impl<K, V> TreeEntry<K, V> for Entry<'_, K, V> {
    fn key(&self) -> &K {
        Entry::key(self)
    }

    fn value(&self) -> &V {
        Entry::value(self)
    }

    fn size(&self) -> usize {
        Entry::size(self)
    }

    fn height(&self) -> usize {
        Entry::height(self)
    }

    fn parent(&self) -> Option<Self> {
        Entry::parent(self)
    }

    fn left(&self) -> Option<Self> {
        Entry::left(self)
    }

    fn right(&self) -> Option<Self> {
        Entry::right(self)
    }
}
