// perma - Persistent list
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Persistent ordered sequence with push/pop at both ends.
//!
//! [`List`] is a pair of vector tries: a reversed front half and a
//! back half (logical order is `reverse(front) ++ back`). Pushing at
//! either end is an O(1) amortised push onto the matching trie; popping
//! an empty half moves the other half across, the classic two-stack
//! deque amortisation. Indexed access stays O(log32 n).

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::map::Map;
use crate::node::Trie;
use crate::ordered_map::OrderedMap;
use crate::seq::Seq;
use crate::set::Set;
use crate::stack::Stack;
use crate::value::Value;

/// A persistent ordered sequence of values.
#[derive(Clone)]
pub struct List {
    /// First part of the list, stored in reverse order.
    front: Trie<Value>,
    /// Second part of the list, stored in order.
    back: Trie<Value>,
}

impl Default for List {
    fn default() -> Self {
        List::new()
    }
}

impl List {
    /// The empty list.
    pub fn new() -> Self {
        List {
            front: Trie::new(),
            back: Trie::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }

    /// Indexed access. Out-of-range indexes are `None`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        if index < self.front.len() {
            self.front.get(self.front.len() - 1 - index)
        } else {
            self.back.get(index - self.front.len())
        }
    }

    /// First element, if any.
    pub fn first(&self) -> Option<&Value> {
        self.get(0)
    }

    /// Last element, if any.
    pub fn last(&self) -> Option<&Value> {
        match self.len() {
            0 => None,
            n => self.get(n - 1),
        }
    }

    /// Replace the element at `index`, failing with
    /// [`Error::IndexOutOfRange`] outside `[0, len)`.
    pub fn set(&self, index: usize, value: Value) -> Result<List> {
        if index >= self.len() {
            return Err(Error::index_out_of_range(index as i64, self.len()));
        }
        if index < self.front.len() {
            Ok(List {
                front: self.front.update(self.front.len() - 1 - index, value),
                back: self.back.clone(),
            })
        } else {
            Ok(List {
                front: self.front.clone(),
                back: self.back.update(index - self.front.len(), value),
            })
        }
    }

    /// Append to the end.
    pub fn push_back(&self, value: Value) -> List {
        List {
            front: self.front.clone(),
            back: self.back.push(value),
        }
    }

    /// Prepend to the start.
    pub fn push_front(&self, value: Value) -> List {
        List {
            front: self.front.push(value),
            back: self.back.clone(),
        }
    }

    /// Remove the last element. On the empty list the value slot is
    /// `None` and the list is returned unchanged.
    pub fn pop_back(&self) -> (List, Option<Value>) {
        if let Some((back, value)) = self.back.pop() {
            return (
                List {
                    front: self.front.clone(),
                    back,
                },
                Some(value),
            );
        }
        if self.front.is_empty() {
            return (self.clone(), None);
        }
        // Back half empty: shift the front half across.
        let back: Trie<Value> = self.front.iter().rev().cloned().collect();
        let (back, value) = back.pop().expect("front half was non-empty");
        (
            List {
                front: Trie::new(),
                back,
            },
            Some(value),
        )
    }

    /// Remove the first element. On the empty list the value slot is
    /// `None` and the list is returned unchanged.
    pub fn pop_front(&self) -> (List, Option<Value>) {
        if let Some((front, value)) = self.front.pop() {
            return (
                List {
                    front,
                    back: self.back.clone(),
                },
                Some(value),
            );
        }
        if self.back.is_empty() {
            return (self.clone(), None);
        }
        // Front half empty: shift the back half across, reversed.
        let front: Trie<Value> = self.back.iter().rev().cloned().collect();
        let (front, value) = front.pop().expect("back half was non-empty");
        (
            List {
                front,
                back: Trie::new(),
            },
            Some(value),
        )
    }

    /// Group elements by `f`, preserving first-seen group order and
    /// source order within each group.
    pub fn group_by(&self, f: impl Fn(&Value) -> Value) -> OrderedMap {
        let mut groups = OrderedMap::new();
        for value in self.iter() {
            let key = f(value);
            let group = match groups.get(&key) {
                Some(Value::List(members)) => members.push_back(value.clone()),
                _ => List::new().push_back(value.clone()),
            };
            groups = groups.set(key, Value::List(group));
        }
        groups
    }

    /// Elementwise value equality.
    pub fn equals(&self, other: &List) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Iterate front to back.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.front.iter().rev().chain(self.back.iter())
    }

    /// Lazy indexed view of the elements.
    pub fn to_seq(&self) -> Seq {
        Seq::from_list(self.clone())
    }

    /// Lazy view of the elements keyed by index.
    pub fn to_keyed_seq(&self) -> Seq {
        Seq::from_list(self.clone()).to_keyed()
    }

    /// Map from index to element.
    pub fn to_map(&self) -> Map {
        self.iter()
            .enumerate()
            .map(|(i, v)| (Value::int(i as i64), v.clone()))
            .collect()
    }

    pub fn to_set(&self) -> Set {
        self.iter().cloned().collect()
    }

    /// The elements as a stack (head = first element).
    pub fn to_stack(&self) -> Stack {
        Stack::from_ordered(self.iter().cloned())
    }

    /// Shallow conversion to a native `Vec` (one level).
    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    pub(crate) fn ordered_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for value in self.iter() {
            value.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        items.into_iter().collect()
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List {
            front: Trie::new(),
            back: iter.into_iter().collect(),
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for List {}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "List []");
        }
        write!(f, "List [ ")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, " ]")
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
