// perma - Native type conversions and JSON bridging
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Conversions between native Rust types and [`Value`], plus deep
//! JSON bridging.
//!
//! [`IntoValue`] and [`FromValue`] are the trait seams for moving data
//! across the boundary: scalars, strings, `Vec`, `HashMap`, `Option`
//! and tuples all convert structurally. [`from_json`] / [`to_json`]
//! convert whole `serde_json` trees, turning JSON objects into maps
//! and arrays into lists at every depth.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::list::List;
use crate::map::Map;
use crate::ordered_map::OrderedMap;
use crate::set::Set;
use crate::stack::Stack;
use crate::value::Value;

// ======================================================================
// Rust -> Value
// ======================================================================

/// Conversion from a native Rust type into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Nil
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(self as f64)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for List {
    fn into_value(self) -> Value {
        Value::List(self)
    }
}

impl IntoValue for Map {
    fn into_value(self) -> Value {
        Value::Map(self)
    }
}

impl IntoValue for OrderedMap {
    fn into_value(self) -> Value {
        Value::OrderedMap(self)
    }
}

impl IntoValue for Set {
    fn into_value(self) -> Value {
        Value::Set(self)
    }
}

impl IntoValue for Stack {
    fn into_value(self) -> Value {
        Value::Stack(self)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Nil,
        }
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for HashMap<K, V> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }
}

impl<A: IntoValue, B: IntoValue> IntoValue for (A, B) {
    fn into_value(self) -> Value {
        Value::List(
            vec![self.0.into_value(), self.1.into_value()]
                .into_iter()
                .collect(),
        )
    }
}

/// Convert any [`IntoValue`] type into a [`Value`].
pub fn to_value<T: IntoValue>(v: T) -> Value {
    v.into_value()
}

// ======================================================================
// Value -> Rust
// ======================================================================

/// Conversion from a [`Value`] back into a native Rust type.
/// Fails with [`Error::TypeError`] on shape mismatch.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::type_error("bool", other.type_name())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Int(n) => Ok(*n),
            other => Err(Error::type_error("int", other.type_name())),
        }
    }
}

impl FromValue for usize {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Int(n) if *n >= 0 => Ok(*n as usize),
            other => Err(Error::type_error("non-negative int", other.type_name())),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(n) => Ok(*n as f64),
            other => Err(Error::type_error("float", other.type_name())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(Error::type_error("string", other.type_name())),
        }
    }
}

impl FromValue for List {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::List(list) => Ok(list.clone()),
            other => Err(Error::type_error("list", other.type_name())),
        }
    }
}

impl FromValue for Map {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Map(map) => Ok(map.clone()),
            Value::OrderedMap(map) => Ok(map.to_map()),
            other => Err(Error::type_error("map", other.type_name())),
        }
    }
}

impl FromValue for Set {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Set(set) => Ok(set.clone()),
            other => Err(Error::type_error("set", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::List(list) => list.iter().map(T::from_value).collect(),
            other => Err(Error::type_error("list", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Convert a [`Value`] into any [`FromValue`] type.
pub fn from_value<T: FromValue>(value: &Value) -> Result<T> {
    T::from_value(value)
}

// ======================================================================
// JSON bridging
// ======================================================================

/// Deeply convert a JSON tree into a [`Value`]: objects become maps
/// (keys as strings), arrays become lists, at every depth.
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                // u64 beyond i64::MAX or a float literal
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::string(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(fields) => Value::Map(
            fields
                .into_iter()
                .map(|(k, v)| (Value::string(k), from_json(v)))
                .collect(),
        ),
    }
}

/// Deeply convert a [`Value`] into a JSON tree. Maps and records
/// become objects (non-string keys are stringified), lists, sets and
/// stacks become arrays. Non-finite floats become `null`, matching
/// JSON's number model.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Nil => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::from(*n),
        Value::Float(x) => serde_json::Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::List(list) => {
            serde_json::Value::Array(list.iter().map(to_json).collect())
        }
        Value::Set(set) => serde_json::Value::Array(set.iter().map(to_json).collect()),
        Value::Stack(stack) => {
            serde_json::Value::Array(stack.iter().map(to_json).collect())
        }
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (json_key(k), to_json(v)))
                .collect(),
        ),
        Value::OrderedMap(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (json_key(k), to_json(v)))
                .collect(),
        ),
        Value::Record(record) => serde_json::Value::Object(
            record
                .iter()
                .map(|(name, v)| (name.to_string(), to_json(v)))
                .collect(),
        ),
    }
}

/// Parse a JSON string straight into a [`Value`].
pub fn from_json_str(text: &str) -> Result<Value> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| Error::InvalidJson(e.to_string()))?;
    Ok(from_json(json))
}

fn json_key(key: &Value) -> String {
    match key {
        Value::Str(s) => s.to_string(),
        other => other.to_string(),
    }
}
