//! Ordered multimap used by every lookup table in the crate.
//!
//! A binary search tree keyed by `K`, where each node holds all values
//! inserted under its key in insertion order.
//!
//! ## Design Note
//! - Nodes live in a `Vec` arena and point at their children by index.
//!   Dropping the map drops a flat vector, so a degenerate tree of any
//!   depth never recurses on teardown.
//! - There is no rebalancing. Tree shape follows insertion order, and a
//!   dataset inserted in sorted key order degenerates into a list with
//!   O(n) lookups (see `height`). Load order of the record files is
//!   usually unsorted, which keeps the tree shallow in practice.
//! - Lookups hand out `&[V]`, so callers can iterate but never mutate
//!   what the index holds.

use std::borrow::Borrow;
use std::cmp::Ordering;

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    values: Vec<V>,
    left: Option<usize>,
    right: Option<usize>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            values: vec![value],
            left: None,
            right: None,
        }
    }
}

/// Key-ordered map from one key to an append-only sequence of values.
#[derive(Debug, Clone)]
pub struct OrderedMultimap<K, V> {
    nodes: Vec<Node<K, V>>,
    value_count: usize,
}

impl<K: Ord, V> OrderedMultimap<K, V> {
    /// Creates an empty multimap
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            value_count: 0,
        }
    }

    /// Append `value` under `key`.
    ///
    /// An existing key gets the value pushed to the end of its sequence;
    /// a new key becomes a fresh leaf. Values are never de-duplicated.
    pub fn insert(&mut self, key: K, value: V) {
        if self.nodes.is_empty() {
            self.nodes.push(Node::new(key, value));
            self.value_count += 1;
            return;
        }

        let new_index = self.nodes.len();
        let mut current = ROOT;
        loop {
            let node = &mut self.nodes[current];
            let slot = match key.cmp(&node.key) {
                Ordering::Equal => {
                    node.values.push(value);
                    self.value_count += 1;
                    return;
                }
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
            };

            match *slot {
                Some(next) => current = next,
                None => {
                    *slot = Some(new_index);
                    self.nodes.push(Node::new(key, value));
                    self.value_count += 1;
                    return;
                }
            }
        }
    }

    /// All values stored under `key`, oldest first.
    ///
    /// Returns an empty slice when `key` was never inserted.
    ///
    /// Rust concept: `K: Borrow<Q>` lets a `String`-keyed map be queried
    /// with a `&str`, so a lookup never allocates a key.
    pub fn find<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key)
            .map(|index| self.nodes[index].values.as_slice())
            .unwrap_or(&[])
    }

    /// First value inserted under `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).first()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).is_some()
    }

    fn locate<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = if self.nodes.is_empty() { None } else { Some(ROOT) };
        while let Some(index) = current {
            let node = &self.nodes[index];
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(index),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }
}

impl<K, V> OrderedMultimap<K, V> {
    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of values across all keys
    pub fn value_count(&self) -> usize {
        self.value_count
    }

    /// Number of nodes on the longest root-to-leaf path.
    ///
    /// Equals `len()` when keys were inserted in sorted order.
    pub fn height(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut tallest = 0;
        let mut stack = vec![(ROOT, 1)];
        while let Some((index, depth)) = stack.pop() {
            tallest = tallest.max(depth);
            let node = &self.nodes[index];
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }
        tallest
    }

    /// In-order traversal: keys ascending, each with its value slice.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
            current: if self.nodes.is_empty() { None } else { Some(ROOT) },
        }
    }
}

impl<K: Ord, V> Default for OrderedMultimap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMultimap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMultimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// In-order iterator over an [`OrderedMultimap`]
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    stack: Vec<usize>,
    current: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a [V]);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        while let Some(index) = self.current {
            self.stack.push(index);
            self.current = nodes[index].left;
        }

        let index = self.stack.pop()?;
        let node = &nodes[index];
        self.current = node.right;
        Some((&node.key, node.values.as_slice()))
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMultimap<K, V> {
    type Item = (&'a K, &'a [V]);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
