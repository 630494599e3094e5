// perma - Record types
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Fixed-shape typed values with named fields and defaults.
//!
//! A [`RecordSchema`] declares an ordered set of field names with
//! default values and acts as a factory: [`RecordSchema::build`] takes
//! a partial set of overrides and produces a [`Record`] with every
//! field populated (explicit override beats default). Fields outside
//! the schema are rejected with [`Error::UnknownField`], on
//! construction and on access alike.
//!
//! Records built from one schema share it; updating a field shares all
//! unchanged field values with the source record.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::map::Map;
use crate::seq::Seq;
use crate::value::Value;

#[derive(Debug)]
struct SchemaInner {
    /// Optional record type name, for display and error messages.
    name: Option<String>,
    /// Field names with their defaults, in declaration order.
    fields: Vec<(String, Value)>,
}

/// The schema (and factory) for a record type.
#[derive(Clone, Debug)]
pub struct RecordSchema {
    inner: Arc<SchemaInner>,
}

impl RecordSchema {
    /// Declare a record shape from `(field name, default value)` pairs.
    pub fn new<S: Into<String>>(fields: Vec<(S, Value)>) -> Self {
        RecordSchema {
            inner: Arc::new(SchemaInner {
                name: None,
                fields: fields.into_iter().map(|(n, d)| (n.into(), d)).collect(),
            }),
        }
    }

    /// Declare a named record shape.
    pub fn with_name<S: Into<String>>(name: impl Into<String>, fields: Vec<(S, Value)>) -> Self {
        RecordSchema {
            inner: Arc::new(SchemaInner {
                name: Some(name.into()),
                fields: fields.into_iter().map(|(n, d)| (n.into(), d)).collect(),
            }),
        }
    }

    /// The record type name shown in errors and display output.
    pub fn display_name(&self) -> &str {
        self.inner.name.as_deref().unwrap_or("Record")
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.inner.fields.iter().position(|(n, _)| n == field)
    }

    /// Instantiate the record with the given overrides; every other
    /// field takes its default. An override naming an undeclared field
    /// fails with [`Error::UnknownField`].
    pub fn build<S: Into<String>>(&self, overrides: Vec<(S, Value)>) -> Result<Record> {
        let mut values: Vec<Value> = self.inner.fields.iter().map(|(_, d)| d.clone()).collect();
        for (field, value) in overrides {
            let field = field.into();
            match self.position(&field) {
                Some(pos) => values[pos] = value,
                None => return Err(Error::unknown_field(field, self.display_name())),
            }
        }
        Ok(Record {
            schema: self.clone(),
            values: Arc::new(values),
        })
    }

    /// Instantiate the record with all defaults.
    pub fn build_default(&self) -> Record {
        Record {
            schema: self.clone(),
            values: Arc::new(self.inner.fields.iter().map(|(_, d)| d.clone()).collect()),
        }
    }

    fn same_shape(&self, other: &RecordSchema) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.inner.name == other.inner.name
            && self.inner.fields.len() == other.inner.fields.len()
            && self
                .field_names()
                .zip(other.field_names())
                .all(|(a, b)| a == b)
    }
}

/// An instance of a record type: a fixed field set, fully populated.
#[derive(Clone)]
pub struct Record {
    schema: RecordSchema,
    values: Arc<Vec<Value>>,
}

impl Record {
    /// The schema this record was built from.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a field. An undeclared field is [`Error::UnknownField`].
    pub fn get(&self, field: &str) -> Result<&Value> {
        match self.schema.position(field) {
            Some(pos) => Ok(&self.values[pos]),
            None => Err(Error::unknown_field(field, self.schema.display_name())),
        }
    }

    /// Return a new record with `field` replaced. An undeclared field
    /// is [`Error::UnknownField`].
    pub fn set(&self, field: &str, value: Value) -> Result<Record> {
        let pos = self
            .schema
            .position(field)
            .ok_or_else(|| Error::unknown_field(field, self.schema.display_name()))?;
        let mut values = (*self.values).clone();
        values[pos] = value;
        Ok(Record {
            schema: self.schema.clone(),
            values: Arc::new(values),
        })
    }

    /// Iterate `(field name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.schema
            .inner
            .fields
            .iter()
            .map(|(n, _)| n.as_str())
            .zip(self.values.iter())
    }

    /// Map-style value equality over the fixed field set. Records with
    /// different schemas are never equal.
    pub fn equals(&self, other: &Record) -> bool {
        self.schema.same_shape(&other.schema)
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a == b)
    }

    /// The fields as a plain map from field name to value.
    pub fn to_map(&self) -> Map {
        self.iter()
            .map(|(n, v)| (Value::string(n), v.clone()))
            .collect()
    }

    /// Lazy keyed view of the fields, in declaration order.
    pub fn to_seq(&self) -> Seq {
        Seq::from_entries(
            self.iter()
                .map(|(n, v)| (Value::string(n), v.clone()))
                .collect(),
        )
    }

    pub(crate) fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for (name, value) in self.iter() {
            name.hash(&mut hasher);
            value.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Record {}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.schema.display_name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", name, value)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
