// perma - Core value type for perma collections
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Core value type for perma.
//!
//! [`Value`] is the closed element type every perma container stores and
//! every container handle lives inside. Values are immutable and cheap
//! to clone: scalars are copied, containers are `Arc`-backed handles
//! that share structure with every version derived from them.
//!
//! Equality is value equality throughout. Two maps holding the same
//! pairs are equal however they were built; the free function [`is`]
//! extends the same comparison to scalars.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::list::List;
use crate::map::Map;
use crate::ordered_map::OrderedMap;
use crate::record::Record;
use crate::set::Set;
use crate::stack::Stack;

/// The element type for all perma containers.
///
/// Any `Value` can serve as a map key: floats compare and hash by bit
/// pattern (with every NaN equal to every NaN), and containers hash by
/// their contents.
#[derive(Clone)]
pub enum Value {
    /// The absent/nothing value
    Nil,
    /// Boolean true or false
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// Immutable string
    Str(Arc<str>),
    /// Persistent ordered sequence
    List(List),
    /// Persistent hash map
    Map(Map),
    /// Persistent insertion-ordered map
    OrderedMap(OrderedMap),
    /// Persistent hash set
    Set(Set),
    /// Persistent LIFO stack
    Stack(Stack),
    /// Fixed-shape record value
    Record(Record),
}

impl Value {
    /// Create an integer value.
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create a float value.
    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    /// Create a boolean value.
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create a string value.
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Create a list value from elements.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(List::from(items))
    }

    /// Create a map value from key/value pairs.
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(Map::from(entries))
    }

    /// A short name for the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::OrderedMap(_) => "ordered-map",
            Value::Set(_) => "set",
            Value::Stack(_) => "stack",
            Value::Record(_) => "record",
        }
    }

    /// True for every container variant.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Value::List(_)
                | Value::Map(_)
                | Value::OrderedMap(_)
                | Value::Set(_)
                | Value::Stack(_)
                | Value::Record(_)
        )
    }

    /// Value equality, identical to `==`.
    ///
    /// Provided so call sites reading `a.equals(&b)` line up with the
    /// container methods of the same name.
    pub fn equals(&self, other: &Value) -> bool {
        self == other
    }
}

/// Value equality over any two values, collection or scalar.
///
/// Equivalent to `a == b`; scalars fall back to primitive equality
/// (floats by bit pattern, NaN equal to NaN).
pub fn is(a: &Value, b: &Value) -> bool {
    a == b
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => {
                a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a.equals(b),
            (Value::Map(a), Value::Map(b)) => a.equals(b),
            (Value::OrderedMap(a), Value::OrderedMap(b)) => a.equals(b),
            // An ordered map equals a plain map holding the same pairs;
            // the fixed order only matters between two ordered maps.
            (Value::Map(a), Value::OrderedMap(b)) => b.pairs_equal(a),
            (Value::OrderedMap(a), Value::Map(b)) => a.pairs_equal(b),
            (Value::Set(a), Value::Set(b)) => a.equals(b),
            (Value::Stack(a), Value::Stack(b)) => a.equals(b),
            (Value::Record(a), Value::Record(b)) => a.equals(b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Nil => state.write_u8(0),
            Value::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            }
            Value::Int(n) => {
                state.write_u8(2);
                n.hash(state);
            }
            Value::Float(n) => {
                state.write_u8(3);
                // Canonicalise NaN so equal floats hash equally.
                let bits = if n.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    n.to_bits()
                };
                bits.hash(state);
            }
            Value::Str(s) => {
                state.write_u8(4);
                s.hash(state);
            }
            Value::List(l) => {
                state.write_u8(5);
                state.write_u64(l.ordered_hash());
            }
            // Map and OrderedMap share a tag: equal contents must hash
            // equally across the two shapes.
            Value::Map(m) => {
                state.write_u8(6);
                state.write_u64(m.unordered_hash());
            }
            Value::OrderedMap(m) => {
                state.write_u8(6);
                state.write_u64(m.unordered_hash());
            }
            Value::Set(s) => {
                state.write_u8(7);
                state.write_u64(s.unordered_hash());
            }
            Value::Stack(s) => {
                state.write_u8(8);
                state.write_u64(s.ordered_hash());
            }
            Value::Record(r) => {
                state.write_u8(9);
                state.write_u64(r.content_hash());
            }
        }
    }
}

/// Hash a value to a 64-bit code with the standard hasher. This is the
/// hash function the node store keys its tries by.
pub(crate) fn value_hash(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Combine a key/value pair into one order-insensitive contribution.
pub(crate) fn pair_hash(key: &Value, value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s.as_ref()),
            Value::List(l) => write!(f, "{}", l),
            Value::Map(m) => write!(f, "{}", m),
            Value::OrderedMap(m) => write!(f, "{}", m),
            Value::Set(s) => write!(f, "{}", s),
            Value::Stack(s) => write!(f, "{}", s),
            Value::Record(r) => write!(f, "{}", r),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<List> for Value {
    fn from(l: List) -> Self {
        Value::List(l)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<OrderedMap> for Value {
    fn from(m: OrderedMap) -> Self {
        Value::OrderedMap(m)
    }
}

impl From<Set> for Value {
    fn from(s: Set) -> Self {
        Value::Set(s)
    }
}

impl From<Stack> for Value {
    fn from(s: Stack) -> Self {
        Value::Stack(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_is_semantics() {
        assert!(is(&Value::int(1), &Value::int(1)));
        assert!(!is(&Value::int(1), &Value::float(1.0)));
        assert!(is(&Value::float(f64::NAN), &Value::float(f64::NAN)));
        assert!(!is(&Value::float(0.0), &Value::float(-0.0)));
        assert!(is(&Value::string("a"), &Value::string("a")));
        assert!(is(&Value::Nil, &Value::Nil));
        assert!(!is(&Value::Nil, &Value::bool(false)));
    }

    #[test]
    fn nan_hashes_consistently() {
        let a = value_hash(&Value::float(f64::NAN));
        let b = value_hash(&Value::float(-f64::NAN));
        assert_eq!(a, b);
    }
}
