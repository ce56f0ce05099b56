//! HashTable: bucket array plus arena-backed collision chains.

use crate::error::TableError;
use crate::hash::{bucket_index, hash_key, Djb2State};
use core::fmt;
use core::hash::BuildHasher;
use core::mem;
use log::{debug, trace};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Link to a chain node inside the table's arena.
    struct NodeKey;
}

/// One link of a collision chain (the "linked pair").
#[derive(Clone, Debug)]
struct ChainNode<V> {
    key: String,
    value: V,
    next: Option<NodeKey>,
}

/// String-keyed hash table resolving collisions by chaining.
///
/// Each bucket holds the head of a singly linked chain; nodes live in an
/// arena and link to their successor by key. The table doubles its bucket
/// count and rehashes every entry when an insert finds it full
/// (`len() == capacity()`).
#[derive(Clone)]
pub struct HashTable<V, S = Djb2State> {
    hasher: S,
    buckets: Box<[Option<NodeKey>]>,
    nodes: SlotMap<NodeKey, ChainNode<V>>, // every node is linked into exactly one chain
}

impl<V> HashTable<V> {
    /// Create a table with `capacity` buckets hashing with DJB2.
    ///
    /// # Panics
    ///
    /// Panics if the bucket array for `capacity` cannot be allocated
    /// (capacity overflow), as `Vec` does.
    pub fn new(capacity: usize) -> Result<Self, TableError> {
        Self::with_hasher(capacity, Djb2State)
    }
}

/// Walks the node links of one chain, head to tail.
struct Links<'a, V> {
    nodes: &'a SlotMap<NodeKey, ChainNode<V>>,
    next: Option<NodeKey>,
}

impl<'a, V> Iterator for Links<'a, V> {
    type Item = NodeKey;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.next?;
        self.next = self.nodes.get(k).and_then(|n| n.next);
        Some(k)
    }
}

/// Iterator over one bucket's chain, head to tail.
pub struct Chain<'a, V> {
    links: Links<'a, V>,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.links.nodes;
        self.links
            .next()
            .and_then(|k| nodes.get(k))
            .map(|n| (n.key.as_str(), &n.value))
    }
}

/// Iterator over immutable entries in `HashTable`, in arbitrary order.
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, NodeKey, ChainNode<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (n.key.as_str(), &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over mutable entries in `HashTable`, in arbitrary order.
pub struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, NodeKey, ChainNode<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (n.key.as_str(), &mut n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V, S> HashTable<V, S>
where
    S: BuildHasher,
{
    /// Create a table with `capacity` buckets and a caller-chosen hashing
    /// strategy. Zero buckets is rejected before anything is allocated.
    ///
    /// # Panics
    ///
    /// Panics if the bucket array for `capacity` cannot be allocated
    /// (capacity overflow), as `Vec` does.
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::InvalidCapacity);
        }
        Ok(Self {
            hasher,
            buckets: vec![None; capacity].into_boxed_slice(),
            nodes: SlotMap::with_key(),
        })
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Number of stored entries (the table's size).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// `len() / capacity()`; the table grows when this reaches 1.0.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Bucket `key` maps to under the current capacity.
    pub fn bucket_of(&self, key: &str) -> usize {
        bucket_index(hash_key(&self.hasher, key), self.capacity())
    }

    fn links(&self, bucket: usize) -> Links<'_, V> {
        Links {
            nodes: &self.nodes,
            next: self.buckets.get(bucket).copied().flatten(),
        }
    }

    /// Entries of bucket `bucket`, head to tail. Out-of-range buckets are empty.
    pub fn chain(&self, bucket: usize) -> Chain<'_, V> {
        Chain {
            links: self.links(bucket),
        }
    }

    fn find_node(&self, key: &str) -> Option<NodeKey> {
        self.links(self.bucket_of(key))
            .find(|&k| self.nodes.get(k).is_some_and(|n| n.key == key))
    }

    pub fn retrieve(&self, key: &str) -> Option<&V> {
        let k = self.find_node(key)?;
        self.nodes.get(k).map(|n| &n.value)
    }

    pub fn retrieve_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find_node(key)?;
        self.nodes.get_mut(k).map(|n| &mut n.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_node(key).is_some()
    }

    /// Store `value` under `key`, returning the value it replaced.
    ///
    /// A full table grows before the write, even when the key is already
    /// present.
    pub fn insert<K>(&mut self, key: K, value: V) -> Option<V>
    where
        K: Into<String>,
    {
        let key = key.into();
        if self.len() == self.capacity() {
            self.grow();
        }

        let index = self.bucket_of(&key);
        let mut link = self.buckets[index];
        let mut tail = None;
        while let Some(k) = link {
            let node = &mut self.nodes[k];
            if node.key == key {
                trace!("updated {:?} in bucket {}", key, index);
                return Some(mem::replace(&mut node.value, value));
            }
            tail = Some(k);
            link = node.next;
        }

        trace!("inserted {:?} into bucket {}", key, index);
        let fresh = self.nodes.insert(ChainNode {
            key,
            value,
            next: None,
        });
        match tail {
            Some(t) => self.nodes[t].next = Some(fresh),
            None => self.buckets[index] = Some(fresh),
        }
        None
    }

    /// Unlink and return the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_of(key);
        let mut prev: Option<NodeKey> = None;
        let mut link = self.buckets[index];
        while let Some(k) = link {
            let node = &self.nodes[k];
            if node.key == key {
                let next = node.next;
                match prev {
                    Some(p) => self.nodes[p].next = next,
                    None => self.buckets[index] = next,
                }
                return self.nodes.remove(k).map(|n| n.value);
            }
            prev = Some(k);
            link = node.next;
        }
        debug!("remove: key {:?} not present", key);
        None
    }

    /// Drop every entry; capacity is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.iter_mut().for_each(|b| *b = None);
    }

    /// Double the bucket count and relink every node under the new capacity.
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2;

        // The hasher runs only here, before any link is touched.
        let this = &*self;
        let placements: Vec<(NodeKey, usize)> = (0..old_capacity)
            .flat_map(|b| this.links(b))
            .map(|k| {
                let h = hash_key(&this.hasher, &this.nodes[k].key);
                (k, bucket_index(h, new_capacity))
            })
            .collect();

        let mut buckets = vec![None; new_capacity].into_boxed_slice();
        let mut tails: Vec<Option<NodeKey>> = vec![None; new_capacity];
        for &(k, index) in &placements {
            self.nodes[k].next = None;
            match tails[index] {
                Some(t) => self.nodes[t].next = Some(k),
                None => buckets[index] = Some(k),
            }
            tails[index] = Some(k);
        }
        debug_assert_eq!(placements.len(), self.nodes.len());
        self.buckets = buckets;

        debug!(
            "resized from {} to {} buckets, {} entries rehashed",
            old_capacity,
            new_capacity,
            placements.len()
        );
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.nodes.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.nodes.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Walk every bucket and panic if any structural invariant is broken.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = std::collections::HashSet::new();
        let mut keys = std::collections::HashSet::new();
        for b in 0..self.capacity() {
            for k in self.links(b) {
                assert!(seen.insert(k), "node linked twice");
                let node = &self.nodes[k];
                assert!(keys.insert(node.key.clone()), "duplicate key {:?}", node.key);
                assert_eq!(self.bucket_of(&node.key), b, "{:?} in wrong bucket", node.key);
            }
        }
        assert_eq!(seen.len(), self.nodes.len(), "unlinked nodes in arena");
    }
}

impl<K, V, S> Extend<(K, V)> for HashTable<V, S>
where
    K: Into<String>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V, S> fmt::Debug for HashTable<V, S>
where
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
