// perma - Structural node store: shared immutable trees
// Copyright (c) 2026 perma contributors. MIT licensed.

//! The structural node store underlying every perma container.
//!
//! Two tree shapes live here, both built from immutable, `Arc`-shared
//! nodes so that every "update" produces a new root reusing all subtrees
//! off the edited path:
//!
//! - [`Hamt`]: a 32-way hash-array-mapped trie keyed by [`Value`],
//!   generic over the stored payload. Backs `Map`, `Set`, and the key
//!   index of `OrderedMap`.
//! - [`Trie`]: a 32-way persistent vector (branch nodes over leaf
//!   chunks, plus a tail buffer). Backs `List` and the entry list of
//!   `OrderedMap`. Indexed access is O(log32 n); push/pop at the back
//!   are O(1) amortised.
//!
//! A node is never mutated after construction. Dropping the last handle
//! to a subtree releases it; the atomic reference counts make that safe
//! even when handles on different threads release shared subtrees
//! concurrently.

use std::sync::Arc;

use crate::value::{Value, value_hash};

const BITS: u32 = 5;
const WIDTH: usize = 1 << BITS;
const MASK: usize = WIDTH - 1;

// ============================================================================
// Hash-array-mapped trie
// ============================================================================

#[derive(Debug)]
enum HamtEntry<V> {
    /// A key/value pair stored directly in the node
    Pair(Value, V),
    /// A subtree for keys sharing this hash prefix
    Child(Arc<HamtNode<V>>),
    /// Keys whose full 64-bit hashes collide (only at maximum depth)
    Collision(Vec<(Value, V)>),
}

impl<V: Clone> Clone for HamtEntry<V> {
    fn clone(&self) -> Self {
        match self {
            HamtEntry::Pair(k, v) => HamtEntry::Pair(k.clone(), v.clone()),
            HamtEntry::Child(c) => HamtEntry::Child(Arc::clone(c)),
            HamtEntry::Collision(pairs) => HamtEntry::Collision(pairs.clone()),
        }
    }
}

/// One node of the hash trie: a bitmap of occupied slots plus the
/// occupied entries in slot order.
#[derive(Debug)]
struct HamtNode<V> {
    bitmap: u32,
    entries: Vec<HamtEntry<V>>,
}

impl<V: Clone> HamtNode<V> {
    fn position(&self, bit: u32) -> usize {
        (self.bitmap & (bit - 1)).count_ones() as usize
    }

    fn get(&self, hash: u64, shift: u32, key: &Value) -> Option<&V> {
        let idx = ((hash >> shift) as usize) & MASK;
        let bit = 1u32 << idx;
        if self.bitmap & bit == 0 {
            return None;
        }
        match &self.entries[self.position(bit)] {
            HamtEntry::Pair(k, v) => {
                if k == key {
                    Some(v)
                } else {
                    None
                }
            }
            HamtEntry::Child(child) => child.get(hash, shift + BITS, key),
            HamtEntry::Collision(pairs) => {
                pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
        }
    }

    /// Returns the updated node and whether the key was newly added
    /// (false means an existing value was replaced).
    fn insert(&self, hash: u64, shift: u32, key: Value, value: V) -> (Self, bool) {
        let idx = ((hash >> shift) as usize) & MASK;
        let bit = 1u32 << idx;
        let pos = self.position(bit);
        let mut entries = self.entries.clone();
        if self.bitmap & bit == 0 {
            entries.insert(pos, HamtEntry::Pair(key, value));
            return (
                HamtNode {
                    bitmap: self.bitmap | bit,
                    entries,
                },
                true,
            );
        }
        let added = match &self.entries[pos] {
            HamtEntry::Pair(k, v) => {
                if *k == key {
                    entries[pos] = HamtEntry::Pair(key, value);
                    false
                } else {
                    let existing_hash = value_hash(k);
                    entries[pos] = merge_pairs(
                        shift + BITS,
                        existing_hash,
                        k.clone(),
                        v.clone(),
                        hash,
                        key,
                        value,
                    );
                    true
                }
            }
            HamtEntry::Child(child) => {
                let (new_child, added) = child.insert(hash, shift + BITS, key, value);
                entries[pos] = HamtEntry::Child(Arc::new(new_child));
                added
            }
            HamtEntry::Collision(pairs) => {
                // Reaching a collision bucket means the full hash matches.
                let mut pairs = pairs.clone();
                let added = match pairs.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => {
                        slot.1 = value;
                        false
                    }
                    None => {
                        pairs.push((key, value));
                        true
                    }
                };
                entries[pos] = HamtEntry::Collision(pairs);
                added
            }
        };
        (
            HamtNode {
                bitmap: self.bitmap,
                entries,
            },
            added,
        )
    }

    /// Returns `None` if the key is absent. Otherwise the replacement
    /// node (`None` when the node became empty) and the removed value.
    fn remove(&self, hash: u64, shift: u32, key: &Value) -> Option<(Option<Self>, V)> {
        let idx = ((hash >> shift) as usize) & MASK;
        let bit = 1u32 << idx;
        if self.bitmap & bit == 0 {
            return None;
        }
        let pos = self.position(bit);
        match &self.entries[pos] {
            HamtEntry::Pair(k, v) => {
                if k != key {
                    return None;
                }
                let removed = v.clone();
                let mut entries = self.entries.clone();
                entries.remove(pos);
                if entries.is_empty() {
                    Some((None, removed))
                } else {
                    Some((
                        Some(HamtNode {
                            bitmap: self.bitmap & !bit,
                            entries,
                        }),
                        removed,
                    ))
                }
            }
            HamtEntry::Child(child) => {
                let (new_child, removed) = child.remove(hash, shift + BITS, key)?;
                let mut entries = self.entries.clone();
                match new_child {
                    Some(c) => {
                        entries[pos] = HamtEntry::Child(Arc::new(c));
                        Some((
                            Some(HamtNode {
                                bitmap: self.bitmap,
                                entries,
                            }),
                            removed,
                        ))
                    }
                    None => {
                        entries.remove(pos);
                        if entries.is_empty() {
                            Some((None, removed))
                        } else {
                            Some((
                                Some(HamtNode {
                                    bitmap: self.bitmap & !bit,
                                    entries,
                                }),
                                removed,
                            ))
                        }
                    }
                }
            }
            HamtEntry::Collision(pairs) => {
                let found = pairs.iter().position(|(k, _)| k == key)?;
                let removed = pairs[found].1.clone();
                let mut pairs = pairs.clone();
                pairs.remove(found);
                let mut entries = self.entries.clone();
                if pairs.len() == 1 {
                    let (k, v) = pairs.pop().expect("collision bucket holds a pair");
                    entries[pos] = HamtEntry::Pair(k, v);
                } else {
                    entries[pos] = HamtEntry::Collision(pairs);
                }
                Some((
                    Some(HamtNode {
                        bitmap: self.bitmap,
                        entries,
                    }),
                    removed,
                ))
            }
        }
    }
}

/// Build the entry that holds two distinct keys below `shift`.
fn merge_pairs<V: Clone>(
    shift: u32,
    hash_a: u64,
    key_a: Value,
    value_a: V,
    hash_b: u64,
    key_b: Value,
    value_b: V,
) -> HamtEntry<V> {
    if shift >= u64::BITS {
        // Identical 64-bit hashes: a genuine collision bucket.
        return HamtEntry::Collision(vec![(key_a, value_a), (key_b, value_b)]);
    }
    let idx_a = ((hash_a >> shift) as usize) & MASK;
    let idx_b = ((hash_b >> shift) as usize) & MASK;
    if idx_a == idx_b {
        let inner = merge_pairs(shift + BITS, hash_a, key_a, value_a, hash_b, key_b, value_b);
        return HamtEntry::Child(Arc::new(HamtNode {
            bitmap: 1u32 << idx_a,
            entries: vec![inner],
        }));
    }
    let (bitmap, entries) = if idx_a < idx_b {
        (
            (1u32 << idx_a) | (1u32 << idx_b),
            vec![
                HamtEntry::Pair(key_a, value_a),
                HamtEntry::Pair(key_b, value_b),
            ],
        )
    } else {
        (
            (1u32 << idx_a) | (1u32 << idx_b),
            vec![
                HamtEntry::Pair(key_b, value_b),
                HamtEntry::Pair(key_a, value_a),
            ],
        )
    };
    HamtEntry::Child(Arc::new(HamtNode { bitmap, entries }))
}

/// A persistent hash-trie map from [`Value`] keys to `V` payloads.
///
/// Iteration order is the trie order (hash-path order):
/// implementation-defined, but deterministic for a given key set and
/// independent of insertion history.
#[derive(Debug)]
pub(crate) struct Hamt<V> {
    root: Option<Arc<HamtNode<V>>>,
    len: usize,
}

impl<V> Clone for Hamt<V> {
    fn clone(&self) -> Self {
        Hamt {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<V: Clone> Hamt<V> {
    pub fn new() -> Self {
        Hamt { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, key: &Value) -> Option<&V> {
        let root = self.root.as_ref()?;
        root.get(value_hash(key), 0, key)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&self, key: Value, value: V) -> Self {
        let hash = value_hash(&key);
        match &self.root {
            Some(root) => {
                let (new_root, added) = root.insert(hash, 0, key, value);
                Hamt {
                    root: Some(Arc::new(new_root)),
                    len: if added { self.len + 1 } else { self.len },
                }
            }
            None => {
                let idx = (hash as usize) & MASK;
                Hamt {
                    root: Some(Arc::new(HamtNode {
                        bitmap: 1u32 << idx,
                        entries: vec![HamtEntry::Pair(key, value)],
                    })),
                    len: 1,
                }
            }
        }
    }

    /// Remove `key`, returning the new trie unchanged when the key is
    /// absent.
    pub fn remove(&self, key: &Value) -> Self {
        let root = match &self.root {
            Some(root) => root,
            None => return self.clone(),
        };
        match root.remove(value_hash(key), 0, key) {
            Some((new_root, _)) => Hamt {
                root: new_root.map(Arc::new),
                len: self.len - 1,
            },
            None => self.clone(),
        }
    }

    pub fn iter(&self) -> HamtIter<'_, V> {
        let mut stack = Vec::new();
        if let Some(root) = &self.root {
            stack.push((root.as_ref(), 0));
        }
        HamtIter {
            stack,
            collision: None,
        }
    }
}

/// Depth-first iterator over `(key, payload)` pairs in trie order.
pub(crate) struct HamtIter<'a, V> {
    stack: Vec<(&'a HamtNode<V>, usize)>,
    collision: Option<(&'a [(Value, V)], usize)>,
}

impl<'a, V> Iterator for HamtIter<'a, V> {
    type Item = (&'a Value, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((pairs, idx)) = &mut self.collision {
                if *idx < pairs.len() {
                    let (k, v) = &pairs[*idx];
                    *idx += 1;
                    return Some((k, v));
                }
                self.collision = None;
            }
            let frame = self.stack.last_mut()?;
            let node = frame.0;
            let i = frame.1;
            if i >= node.entries.len() {
                self.stack.pop();
                continue;
            }
            frame.1 += 1;
            match &node.entries[i] {
                HamtEntry::Pair(k, v) => return Some((k, v)),
                HamtEntry::Child(child) => self.stack.push((child.as_ref(), 0)),
                HamtEntry::Collision(pairs) => self.collision = Some((pairs.as_slice(), 0)),
            }
        }
    }
}

// ============================================================================
// Persistent vector trie
// ============================================================================

#[derive(Debug)]
enum TrieNode<T> {
    Branch(Vec<Arc<TrieNode<T>>>),
    Leaf(Vec<T>),
}

/// A persistent vector: a dense 32-way trie of leaf chunks plus a tail
/// buffer holding the last `<= 32` elements.
#[derive(Debug)]
pub(crate) struct Trie<T> {
    root: Option<Arc<TrieNode<T>>>,
    /// Bit shift of the root level; 0 when the root is a leaf.
    shift: u32,
    tail: Vec<T>,
    len: usize,
}

impl<T: Clone> Clone for Trie<T> {
    fn clone(&self) -> Self {
        Trie {
            root: self.root.clone(),
            shift: self.shift,
            tail: self.tail.clone(),
            len: self.len,
        }
    }
}

impl<T: Clone> Trie<T> {
    pub fn new() -> Self {
        Trie {
            root: None,
            shift: 0,
            tail: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the first element held in the tail buffer.
    fn tail_offset(&self) -> usize {
        self.len - self.tail.len()
    }

    fn leaf_for(&self, index: usize) -> &Vec<T> {
        let mut node = self.root.as_ref().expect("index below tail offset");
        let mut shift = self.shift;
        loop {
            match node.as_ref() {
                TrieNode::Branch(children) => {
                    node = &children[(index >> shift) & MASK];
                    shift -= BITS;
                }
                TrieNode::Leaf(values) => return values,
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        if index >= self.tail_offset() {
            return Some(&self.tail[index - self.tail_offset()]);
        }
        Some(&self.leaf_for(index)[index & MASK])
    }

    /// Replace the element at `index`. Caller guarantees bounds.
    pub fn update(&self, index: usize, value: T) -> Self {
        debug_assert!(index < self.len);
        if index >= self.tail_offset() {
            let mut tail = self.tail.clone();
            tail[index - self.tail_offset()] = value;
            return Trie {
                root: self.root.clone(),
                shift: self.shift,
                tail,
                len: self.len,
            };
        }
        let root = self.root.as_ref().expect("index below tail offset");
        Trie {
            root: Some(update_node(root, self.shift, index, value)),
            shift: self.shift,
            tail: self.tail.clone(),
            len: self.len,
        }
    }

    pub fn push(&self, value: T) -> Self {
        if self.tail.len() < WIDTH {
            let mut tail = self.tail.clone();
            tail.push(value);
            return Trie {
                root: self.root.clone(),
                shift: self.shift,
                tail,
                len: self.len + 1,
            };
        }
        // Tail is full: move it into the tree as a new leaf.
        let leaf = Arc::new(TrieNode::Leaf(self.tail.clone()));
        let tree_len = self.tail_offset();
        let (root, shift) = match &self.root {
            None => (leaf, 0),
            Some(root) => {
                if tree_len == WIDTH << self.shift {
                    // Root is full: grow a level.
                    let new_root = TrieNode::Branch(vec![
                        Arc::clone(root),
                        new_path(self.shift, leaf),
                    ]);
                    (Arc::new(new_root), self.shift + BITS)
                } else {
                    (push_leaf(root, self.shift, tree_len, leaf), self.shift)
                }
            }
        };
        Trie {
            root: Some(root),
            shift,
            tail: vec![value],
            len: self.len + 1,
        }
    }

    /// Remove the last element, returning the shorter trie and the
    /// element. `None` on the empty trie.
    pub fn pop(&self) -> Option<(Self, T)> {
        if self.len == 0 {
            return None;
        }
        if self.tail.len() > 1 {
            let mut tail = self.tail.clone();
            let value = tail.pop().expect("tail holds more than one element");
            return Some((
                Trie {
                    root: self.root.clone(),
                    shift: self.shift,
                    tail,
                    len: self.len - 1,
                },
                value,
            ));
        }
        let value = self.tail[0].clone();
        if self.len == 1 {
            return Some((Trie::new(), value));
        }
        // Pull the last full leaf out of the tree to become the tail.
        let tail = self.leaf_for(self.len - 2).clone();
        let root = self.root.as_ref().expect("tree holds remaining elements");
        let mut root = pop_leaf(root, self.shift, self.len - 2);
        let mut shift = self.shift;
        while shift > 0 {
            match root.as_deref() {
                Some(TrieNode::Branch(children)) if children.len() == 1 => {
                    let child = Arc::clone(&children[0]);
                    root = Some(child);
                    shift -= BITS;
                }
                _ => break,
            }
        }
        Some((
            Trie {
                root,
                shift,
                tail,
                len: self.len - 1,
            },
            value,
        ))
    }

    pub fn iter(&self) -> TrieIter<'_, T> {
        TrieIter {
            trie: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<T: Clone> FromIterator<T> for Trie<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut trie = Trie::new();
        for item in iter {
            trie = trie.push(item);
        }
        trie
    }
}

fn update_node<T: Clone>(node: &Arc<TrieNode<T>>, shift: u32, index: usize, value: T) -> Arc<TrieNode<T>> {
    match node.as_ref() {
        TrieNode::Branch(children) => {
            let sub = (index >> shift) & MASK;
            let mut children = children.clone();
            children[sub] = update_node(&children[sub], shift - BITS, index, value);
            Arc::new(TrieNode::Branch(children))
        }
        TrieNode::Leaf(values) => {
            let mut values = values.clone();
            values[index & MASK] = value;
            Arc::new(TrieNode::Leaf(values))
        }
    }
}

/// Wrap `node` in branch nodes so it sits at depth `shift`.
fn new_path<T>(shift: u32, node: Arc<TrieNode<T>>) -> Arc<TrieNode<T>> {
    if shift == 0 {
        node
    } else {
        Arc::new(TrieNode::Branch(vec![new_path(shift - BITS, node)]))
    }
}

/// Insert a full leaf whose first element index is `index`.
fn push_leaf<T: Clone>(
    node: &Arc<TrieNode<T>>,
    shift: u32,
    index: usize,
    leaf: Arc<TrieNode<T>>,
) -> Arc<TrieNode<T>> {
    match node.as_ref() {
        TrieNode::Branch(children) => {
            let sub = (index >> shift) & MASK;
            let mut children = children.clone();
            if sub < children.len() {
                children[sub] = push_leaf(&children[sub], shift - BITS, index, leaf);
            } else {
                debug_assert_eq!(sub, children.len());
                children.push(new_path(shift - BITS, leaf));
            }
            Arc::new(TrieNode::Branch(children))
        }
        TrieNode::Leaf(_) => unreachable!("push_leaf never descends into a leaf"),
    }
}

/// Remove the leaf containing `index` (the rightmost leaf). Returns
/// `None` when the subtree becomes empty.
fn pop_leaf<T: Clone>(node: &Arc<TrieNode<T>>, shift: u32, index: usize) -> Option<Arc<TrieNode<T>>> {
    match node.as_ref() {
        TrieNode::Leaf(_) => None,
        TrieNode::Branch(children) => {
            let sub = (index >> shift) & MASK;
            let mut children = children.clone();
            match pop_leaf(&children[sub], shift - BITS, index) {
                Some(child) => children[sub] = child,
                None => {
                    children.pop();
                    debug_assert_eq!(children.len(), sub);
                }
            }
            if children.is_empty() {
                None
            } else {
                Some(Arc::new(TrieNode::Branch(children)))
            }
        }
    }
}

/// Index-walking iterator over a [`Trie`]. Double-ended so reversed
/// views (the front half of a `List`) come for free.
pub(crate) struct TrieIter<'a, T> {
    trie: &'a Trie<T>,
    front: usize,
    back: usize,
}

impl<'a, T: Clone> Iterator for TrieIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.trie.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Clone> DoubleEndedIterator for TrieIter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.trie.get(self.back)
    }
}

impl<'a, T: Clone> ExactSizeIterator for TrieIter<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn trie_push_get_across_leaf_boundaries() {
        let mut trie: Trie<Value> = Trie::new();
        for i in 0..1100 {
            trie = trie.push(Value::int(i));
        }
        assert_eq!(trie.len(), 1100);
        for i in 0..1100 {
            assert_eq!(trie.get(i as usize), Some(&Value::int(i)));
        }
        assert_eq!(trie.get(1100), None);
    }

    #[test]
    fn trie_pop_unwinds_to_empty() {
        let mut trie: Trie<Value> = (0..200).map(Value::int).collect();
        for i in (0..200).rev() {
            let (rest, value) = trie.pop().unwrap();
            assert_eq!(value, Value::int(i));
            trie = rest;
        }
        assert!(trie.is_empty());
        assert!(trie.pop().is_none());
    }

    #[test]
    fn trie_update_shares_old_version() {
        let trie: Trie<Value> = (0..100).map(Value::int).collect();
        let updated = trie.update(40, Value::int(-1));
        assert_eq!(trie.get(40), Some(&Value::int(40)));
        assert_eq!(updated.get(40), Some(&Value::int(-1)));
        assert_eq!(updated.get(41), Some(&Value::int(41)));
    }

    #[test]
    fn hamt_insert_remove_roundtrip() {
        let mut hamt: Hamt<Value> = Hamt::new();
        for i in 0..500 {
            hamt = hamt.insert(Value::int(i), Value::int(i * 10));
        }
        assert_eq!(hamt.len(), 500);
        for i in 0..500 {
            assert_eq!(hamt.get(&Value::int(i)), Some(&Value::int(i * 10)));
        }
        let removed = hamt.remove(&Value::int(250));
        assert_eq!(removed.len(), 499);
        assert_eq!(removed.get(&Value::int(250)), None);
        // The original version is untouched.
        assert_eq!(hamt.get(&Value::int(250)), Some(&Value::int(2500)));
    }

    #[test]
    fn hamt_remove_absent_is_identity() {
        let hamt: Hamt<Value> = Hamt::new().insert(Value::int(1), Value::int(1));
        let same = hamt.remove(&Value::int(2));
        assert_eq!(same.len(), 1);
        assert_eq!(same.get(&Value::int(1)), Some(&Value::int(1)));
    }

    #[test]
    fn hamt_iter_visits_every_pair_once() {
        let mut hamt: Hamt<Value> = Hamt::new();
        for i in 0..100 {
            hamt = hamt.insert(Value::int(i), Value::int(-i));
        }
        let mut seen: Vec<i64> = hamt
            .iter()
            .map(|(k, _)| match k {
                Value::Int(n) => *n,
                _ => unreachable!(),
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn hamt_iter_order_is_insertion_independent() {
        let mut a: Hamt<Value> = Hamt::new();
        let mut b: Hamt<Value> = Hamt::new();
        for i in 0..50 {
            a = a.insert(Value::int(i), Value::Nil);
        }
        for i in (0..50).rev() {
            b = b.insert(Value::int(i), Value::Nil);
        }
        let order_a: Vec<Value> = a.iter().map(|(k, _)| k.clone()).collect();
        let order_b: Vec<Value> = b.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(order_a, order_b);
    }
}
