// perma - Common collection trait
// Copyright (c) 2026 perma contributors. MIT licensed.

//! A minimal common surface over the persistent containers, for code
//! that handles any of them uniformly (printing, sizing, seq-ing)
//! without matching on [`Value`] itself.

use crate::list::List;
use crate::map::Map;
use crate::ordered_map::OrderedMap;
use crate::record::Record;
use crate::seq::Seq;
use crate::set::Set;
use crate::stack::Stack;
use crate::value::Value;

/// Operations shared by every persistent container.
pub trait Collection {
    /// Number of entries or elements.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// A lazy seq view over this container's contents.
    fn seq(&self) -> Seq;

    /// Wrap this container as a [`Value`].
    fn to_value(&self) -> Value;
}

impl Collection for Map {
    fn size(&self) -> usize {
        self.len()
    }

    fn seq(&self) -> Seq {
        self.to_seq()
    }

    fn to_value(&self) -> Value {
        Value::Map(self.clone())
    }
}

impl Collection for OrderedMap {
    fn size(&self) -> usize {
        self.len()
    }

    fn seq(&self) -> Seq {
        self.to_seq()
    }

    fn to_value(&self) -> Value {
        Value::OrderedMap(self.clone())
    }
}

impl Collection for List {
    fn size(&self) -> usize {
        self.len()
    }

    fn seq(&self) -> Seq {
        self.to_seq()
    }

    fn to_value(&self) -> Value {
        Value::List(self.clone())
    }
}

impl Collection for Set {
    fn size(&self) -> usize {
        self.len()
    }

    fn seq(&self) -> Seq {
        self.to_seq()
    }

    fn to_value(&self) -> Value {
        Value::Set(self.clone())
    }
}

impl Collection for Stack {
    fn size(&self) -> usize {
        self.len()
    }

    fn seq(&self) -> Seq {
        self.to_seq()
    }

    fn to_value(&self) -> Value {
        Value::Stack(self.clone())
    }
}

impl Collection for Record {
    fn size(&self) -> usize {
        self.len()
    }

    fn seq(&self) -> Seq {
        self.to_seq()
    }

    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }
}
