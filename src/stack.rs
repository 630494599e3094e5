// perma - Persistent stack
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Persistent LIFO stack of shared cons cells. Pushing allocates one
//! cell; every older version keeps its own view of the chain.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::list::List;
use crate::seq::Seq;
use crate::value::Value;

#[derive(Debug)]
struct StackNode {
    value: Value,
    next: Option<Arc<StackNode>>,
}

/// A persistent stack; the head is the most recently pushed element.
#[derive(Clone)]
pub struct Stack {
    head: Option<Arc<StackNode>>,
    len: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Stack::new()
    }
}

impl Stack {
    /// The empty stack.
    pub fn new() -> Self {
        Stack { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The top of the stack, if any.
    pub fn peek(&self) -> Option<&Value> {
        self.head.as_ref().map(|node| &node.value)
    }

    /// Push onto the top.
    pub fn push(&self, value: Value) -> Stack {
        Stack {
            head: Some(Arc::new(StackNode {
                value,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Remove the top element. On the empty stack the value slot is
    /// `None` and the stack is returned unchanged.
    pub fn pop(&self) -> (Stack, Option<Value>) {
        match &self.head {
            Some(node) => (
                Stack {
                    head: node.next.clone(),
                    len: self.len - 1,
                },
                Some(node.value.clone()),
            ),
            None => (self.clone(), None),
        }
    }

    /// Elementwise value equality, head first.
    pub fn equals(&self, other: &Stack) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Iterate head first.
    pub fn iter(&self) -> StackIter<'_> {
        StackIter {
            node: self.head.as_deref(),
        }
    }

    /// Build a stack that iterates in the order of `items` (the first
    /// item becomes the head).
    pub fn from_ordered(items: impl Iterator<Item = Value>) -> Stack {
        let collected: Vec<Value> = items.collect();
        let mut stack = Stack::new();
        for value in collected.into_iter().rev() {
            stack = stack.push(value);
        }
        stack
    }

    /// Lazy indexed view, head first.
    pub fn to_seq(&self) -> Seq {
        Seq::from_stack(self.clone())
    }

    /// The elements, head first, as a list.
    pub fn to_list(&self) -> List {
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

/// Iterator over a [`Stack`], head first.
pub struct StackIter<'a> {
    node: Option<&'a StackNode>,
}

impl<'a> Iterator for StackIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        self.node = node.next.as_deref();
        Some(&node.value)
    }
}

impl FromIterator<Value> for Stack {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Stack::from_ordered(iter.into_iter())
    }
}

impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Stack {}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Stack []");
        }
        write!(f, "Stack [ ")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, " ]")
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
