//! The ordered-map contract.
//!
//! [`OrderedMap`] is what calling code programs against; [`TreeEntry`] is
//! the read-only view of one stored entry together with its position in
//! the tree.

use std::borrow::Borrow;

/// Read-only view of a stored entry and its neighbours in the tree.
pub trait TreeEntry<K, V>: Sized {
    /// The entry's key.
    fn key(&self) -> &K;

    /// The entry's value.
    fn value(&self) -> &V;

    /// Number of entries in the subtree rooted here, including this one.
    fn size(&self) -> usize;

    /// Height of the subtree rooted here; a leaf has height 1.
    fn height(&self) -> usize;

    /// The entry holding this one as a child, `None` for the root.
    fn parent(&self) -> Option<Self>;

    /// Root of the left subtree.
    fn left(&self) -> Option<Self>;

    /// Root of the right subtree.
    fn right(&self) -> Option<Self>;
}

/// A mutable map that keeps its keys in order.
///
/// # Examples
///
/// ```rust
/// use balanced_map::avl::BalancedOrderedMap;
/// use balanced_map::ordered_map::OrderedMap;
///
/// fn fill<M: OrderedMap<i32, &'static str>>(map: &mut M) {
///     map.put(2, "two");
///     map.put(1, "one");
///     map.put_if_absent(2, "TWO");
/// }
///
/// let mut map: BalancedOrderedMap<i32, &str> = BalancedOrderedMap::new();
/// fill(&mut map);
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&2), Some(&"two"));
/// ```
pub trait OrderedMap<K: Ord, V> {
    /// The entry view handed out by [`entry_list`](Self::entry_list).
    type Entry<'a>: TreeEntry<K, V>
    where
        Self: 'a;

    /// Returns the value stored under `key`.
    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Inserts or overwrites, returning the value now stored.
    fn put(&mut self, key: K, value: V) -> &V;

    /// Inserts only when `key` is absent, returning the value now stored.
    fn put_if_absent(&mut self, key: K, value: V) -> &V;

    /// Removes `key`, returning its value if it was present.
    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Removes every entry.
    fn clear(&mut self);

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height of the underlying tree, 0 when empty.
    fn height(&self) -> usize;

    /// Every entry, in pre-order.
    fn entry_list(&self) -> Vec<Self::Entry<'_>>;
}
