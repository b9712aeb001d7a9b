//! The AVL-balanced ordered map.
//!
//! Insertion and removal descend recursively, threading the parent of the
//! current node down the call stack, and call
//! [`rebalance`](NodeArena::rebalance) on every node of the path on the way
//! back up. After each public mutation the four invariants checked by
//! [`BalancedOrderedMap::check_invariants`] hold again.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;

use smallvec::SmallVec;

use super::arena::{Node, NodeArena, NodeId};
use super::entry::Entry;
use crate::error::TreeError;
use crate::ordered_map::OrderedMap;

// =============================================================================
// BalancedOrderedMap Definition
// =============================================================================

/// An ordered map backed by an AVL tree.
///
/// Every node carries the size and height of its subtree, which makes
/// [`len`](Self::len) and [`height`](Self::height) O(1) and lets the
/// rebalance step decide between single and double rotations without
/// walking the tree.
///
/// # Time Complexity
///
/// | Operation           | Complexity |
/// |---------------------|------------|
/// | `get`               | O(log N)   |
/// | `put`               | O(log N)   |
/// | `put_if_absent`     | O(log N)   |
/// | `remove`            | O(log N)   |
/// | `min`/`max`         | O(log N)   |
/// | `len`/`height`      | O(1)       |
/// | `entry_list`        | O(N)       |
/// | `check_invariants`  | O(N)       |
///
/// # Examples
///
/// ```rust
/// use balanced_map::avl::BalancedOrderedMap;
///
/// let mut map = BalancedOrderedMap::new();
/// for key in 1..=7 {
///     map.put(key, key * 10);
/// }
///
/// // A plain search tree would have degenerated into a chain of height 7
/// assert_eq!(map.height(), 3);
/// assert_eq!(map.get(&4), Some(&40));
/// assert_eq!(map.remove(&4), Some(40));
/// assert!(map.check_invariants().is_ok());
/// ```
#[derive(Clone)]
pub struct BalancedOrderedMap<K, V> {
    arena: NodeArena<K, V>,
}

impl<K, V> BalancedOrderedMap<K, V> {
    /// Creates an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedOrderedMap;
    ///
    /// let map: BalancedOrderedMap<i32, String> = BalancedOrderedMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.height(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: NodeArena::new(),
        }
    }

    /// Returns the number of entries, read from the root's augmentation.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.size(self.arena.root())
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.arena.root().is_none()
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single entry.
    ///
    /// The balance bound keeps this below `1.45 * log2(len + 2)`.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.arena.height(self.arena.root())
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.arena.clear();
    }

    /// Returns every entry in pre-order: a node, then its left subtree,
    /// then its right subtree.
    ///
    /// The first entry is the root. No validation is performed; see
    /// [`checked_entry_list`](Self::checked_entry_list).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedOrderedMap;
    ///
    /// let map: BalancedOrderedMap<i32, ()> = (1..=7).map(|key| (key, ())).collect();
    /// let keys: Vec<i32> = map.entry_list().iter().map(|entry| *entry.key()).collect();
    /// assert_eq!(keys, vec![4, 2, 1, 3, 6, 5, 7]);
    /// ```
    #[must_use]
    pub fn entry_list(&self) -> Vec<Entry<'_, K, V>> {
        let mut entries = Vec::with_capacity(self.len());
        let mut pending: SmallVec<[NodeId; 32]> = SmallVec::new();
        pending.extend(self.arena.root());

        while let Some(id) = pending.pop() {
            entries.push(Entry::new(&self.arena, id));
            let node = &self.arena[id];
            pending.extend(node.right);
            pending.extend(node.left);
        }

        entries
    }

    /// Returns every entry in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedOrderedMap;
    ///
    /// let map: BalancedOrderedMap<i32, &str> =
    ///     [(3, "three"), (1, "one"), (2, "two")].into_iter().collect();
    /// assert_eq!(map.in_order(), vec![(&1, &"one"), (&2, &"two"), (&3, &"three")]);
    /// ```
    #[must_use]
    pub fn in_order(&self) -> Vec<(&K, &V)> {
        let mut entries = Vec::with_capacity(self.len());
        let mut pending: SmallVec<[NodeId; 32]> = SmallVec::new();
        let mut current = self.arena.root();

        loop {
            while let Some(id) = current {
                pending.push(id);
                current = self.arena[id].left;
            }
            let Some(id) = pending.pop() else {
                break;
            };
            let node = &self.arena[id];
            entries.push((&node.key, &node.value));
            current = node.right;
        }

        entries
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.arena.root().map(|root| {
            let node = &self.arena[self.arena.min_of(root)];
            (&node.key, &node.value)
        })
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.arena.root().map(|root| {
            let node = &self.arena[self.arena.max_of(root)];
            (&node.key, &node.value)
        })
    }
}

impl<K: Ord, V> BalancedOrderedMap<K, V> {
    /// Creates a map holding a single entry.
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        let mut map = Self::new();
        map.put(key, value);
        map
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the value stored under `key`.
    ///
    /// The key may be any borrowed form of the map's key type, as long as
    /// the ordering of the borrowed form matches the key type's ordering.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedOrderedMap;
    ///
    /// let map = BalancedOrderedMap::singleton("hello".to_string(), 42);
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.arena[id].value)
    }

    /// Returns `true` if the map holds `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.arena.root();
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Inserts `value` under `key`, overwriting any previous value, and
    /// returns the value now stored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedOrderedMap;
    ///
    /// let mut map = BalancedOrderedMap::new();
    /// assert_eq!(map.put(1, "one"), &"one");
    /// assert_eq!(map.put(1, "ONE"), &"ONE");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> &V {
        let id = self.insert(key, value, false);
        &self.arena[id].value
    }

    /// Inserts `value` under `key` only if the key is absent. Returns the
    /// value now stored, which is the existing one when the key was already
    /// present; `value` is dropped in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedOrderedMap;
    ///
    /// let mut map = BalancedOrderedMap::new();
    /// map.put(1, "one");
    /// assert_eq!(map.put_if_absent(1, "uno"), &"one");
    /// assert_eq!(map.put_if_absent(2, "two"), &"two");
    /// ```
    pub fn put_if_absent(&mut self, key: K, value: V) -> &V {
        let id = self.insert(key, value, true);
        &self.arena[id].value
    }

    /// [`put`](Self::put) for callers holding an optional key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] when `key` is `None`; the map
    /// is left untouched.
    pub fn try_put(&mut self, key: Option<K>, value: V) -> Result<&V, TreeError> {
        let key = key.ok_or(TreeError::InvalidArgument(ABSENT_KEY))?;
        Ok(self.put(key, value))
    }

    /// [`put_if_absent`](Self::put_if_absent) for callers holding an
    /// optional key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] when `key` is `None`; the map
    /// is left untouched.
    pub fn try_put_if_absent(&mut self, key: Option<K>, value: V) -> Result<&V, TreeError> {
        let key = key.ok_or(TreeError::InvalidArgument(ABSENT_KEY))?;
        Ok(self.put_if_absent(key, value))
    }

    /// Returns the id of the node now holding `key`.
    fn insert(&mut self, key: K, value: V, only_if_absent: bool) -> NodeId {
        match self.arena.root() {
            None => {
                let id = self.arena.allocate(key, value, None);
                self.arena.attach_root(Some(id));
                id
            }
            Some(root) => self.insert_below(None, root, key, value, only_if_absent).0,
        }
    }

    /// Recursive helper for insert.
    /// Returns (`holder`, `was_added`); the path is only rebalanced when a
    /// leaf was added.
    fn insert_below(
        &mut self,
        parent: Option<NodeId>,
        current: NodeId,
        key: K,
        value: V,
        only_if_absent: bool,
    ) -> (NodeId, bool) {
        let (left, right) = (self.arena[current].left, self.arena[current].right);
        let (holder, added) = match key.cmp(&self.arena[current].key) {
            Ordering::Equal => {
                if !only_if_absent {
                    self.arena[current].value = value;
                }
                return (current, false);
            }
            Ordering::Less => match left {
                Some(left) => self.insert_below(Some(current), left, key, value, only_if_absent),
                None => {
                    let leaf = self.arena.allocate(key, value, Some(current));
                    self.arena.attach_left(current, Some(leaf));
                    (leaf, true)
                }
            },
            Ordering::Greater => match right {
                Some(right) => {
                    self.insert_below(Some(current), right, key, value, only_if_absent)
                }
                None => {
                    let leaf = self.arena.allocate(key, value, Some(current));
                    self.arena.attach_right(current, Some(leaf));
                    (leaf, true)
                }
            },
        };

        if added {
            self.arena.rebalance(parent, current);
        }
        (holder, added)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes `key`, returning its value if it was present.
    ///
    /// Removing an absent key (including from an empty map) returns `None`
    /// and leaves the tree as it was. When the removed node has two
    /// children, its in-order predecessor takes its place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedOrderedMap;
    ///
    /// let mut map: BalancedOrderedMap<i32, ()> = (1..=7).map(|key| (key, ())).collect();
    /// assert_eq!(map.remove(&4), Some(()));
    /// assert_eq!(map.remove(&4), None);
    ///
    /// // 3 is the largest key below the removed root
    /// assert_eq!(map.entry_list()[0].key(), &3);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.arena.root()?;
        self.remove_below(None, root, key)
    }

    /// Recursive helper for remove.
    fn remove_below<Q>(&mut self, parent: Option<NodeId>, current: NodeId, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (left, right) = (self.arena[current].left, self.arena[current].right);
        let removed = match key.cmp(self.arena[current].key.borrow()) {
            Ordering::Less => self.remove_below(Some(current), left?, key),
            Ordering::Greater => self.remove_below(Some(current), right?, key),
            Ordering::Equal => match (left, right) {
                (Some(left), Some(_)) => {
                    let predecessor = self.detach_max(Some(current), left);
                    let node = &mut self.arena[current];
                    node.key = predecessor.key;
                    Some(std::mem::replace(&mut node.value, predecessor.value))
                }
                (only_child, None) | (None, only_child) => {
                    self.arena.replace_child(parent, current, only_child);
                    return Some(self.arena.release(current).value);
                }
            },
        };

        if removed.is_some() {
            self.arena.rebalance(parent, current);
        }
        removed
    }

    /// Unlinks the largest node of the subtree rooted at `current`,
    /// rebalancing the path back up to `current`.
    fn detach_max(&mut self, parent: Option<NodeId>, current: NodeId) -> Node<K, V> {
        match self.arena[current].right {
            Some(right) => {
                let detached = self.detach_max(Some(current), right);
                self.arena.rebalance(parent, current);
                detached
            }
            None => {
                let left = self.arena[current].left;
                self.arena.replace_child(parent, current, left);
                self.arena.release(current)
            }
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Checks search-tree ordering, parent links, size/height augmentation
    /// and the balance bound at every node.
    ///
    /// A correct map always passes; this exists for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StructuralInvariantViolation`] for the first
    /// offending node met in pre-order.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        self.arena.validate()
    }

    /// [`entry_list`](Self::entry_list), after validating the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StructuralInvariantViolation`] for the first
    /// offending node met in pre-order.
    pub fn checked_entry_list(&self) -> Result<Vec<Entry<'_, K, V>>, TreeError> {
        self.check_invariants()?;
        Ok(self.entry_list())
    }
}

const ABSENT_KEY: &str = "key can not be absent";

// =============================================================================
// OrderedMap Implementation
// =============================================================================

impl<K: Ord, V> OrderedMap<K, V> for BalancedOrderedMap<K, V> {
    type Entry<'a>
        = Entry<'a, K, V>
    where
        Self: 'a;

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> &V {
        Self::put(self, key, value)
    }

    fn put_if_absent(&mut self, key: K, value: V) -> &V {
        Self::put_if_absent(self, key, value)
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::remove(self, key)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn height(&self) -> usize {
        Self::height(self)
    }

    fn entry_list(&self) -> Vec<Self::Entry<'_>> {
        Self::entry_list(self)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for BalancedOrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BalancedOrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for BalancedOrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for BalancedOrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.in_order() == other.in_order()
    }
}

impl<K: Eq, V: Eq> Eq for BalancedOrderedMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BalancedOrderedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.in_order()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for BalancedOrderedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self.in_order() {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for BalancedOrderedMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.in_order() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct BalancedOrderedMapVisitor<K, V> {
    marker: std::marker::PhantomData<fn() -> BalancedOrderedMap<K, V>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for BalancedOrderedMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = BalancedOrderedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = BalancedOrderedMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.put(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for BalancedOrderedMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(BalancedOrderedMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
