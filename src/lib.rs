// perma - Persistent, structurally-shared collections
// Copyright (c) 2026 perma contributors. MIT licensed.

//! # perma
//!
//! Persistent (immutable) collections with structural sharing: [`Map`],
//! [`OrderedMap`], [`List`], [`Set`], [`Stack`], [`Record`], and a lazy
//! [`Seq`] pipeline over all of them.
//!
//! Every update operation returns a new collection and leaves the
//! original untouched; unchanged subtrees are shared between the old
//! and new versions, so updates cost O(log32 n) space rather than a
//! full copy. Equality is deep and structural throughout.
//!
//! ```
//! use perma::{Map, Value};
//!
//! let a = Map::new().set(Value::string("b"), Value::int(2));
//! let b = a.set(Value::string("c"), Value::int(3));
//!
//! assert_eq!(a.get(&Value::string("c")), None);
//! assert_eq!(b.get(&Value::string("c")), Some(&Value::int(3)));
//! assert_eq!(a.len(), 1);
//! ```
//!
//! Seqs defer their work until a terminal operation forces them, and
//! evaluate in a single fused pass:
//!
//! ```
//! use perma::{Seq, Value};
//!
//! let seq = Seq::from_values((1..=10).map(Value::int).collect())
//!     .filter(|v| matches!(v, Value::Int(n) if n % 2 == 1))
//!     .map(|v| match v {
//!         Value::Int(n) => Value::int(n * n),
//!         other => other.clone(),
//!     });
//!
//! // Nothing has run yet; get(1) walks just far enough.
//! assert_eq!(seq.get(1).unwrap(), Some(Value::int(9)));
//! ```

pub mod collection;
pub mod convert;
pub mod error;
pub mod list;
pub mod map;
mod node;
pub mod ordered_map;
pub mod record;
pub mod seq;
pub mod set;
pub mod stack;
pub mod value;

pub use collection::Collection;
pub use convert::{from_json, from_json_str, from_value, to_json, to_value, FromValue, IntoValue};
pub use error::{Error, Result};
pub use list::List;
pub use map::Map;
pub use ordered_map::OrderedMap;
pub use record::{Record, RecordSchema};
pub use seq::{Seq, SeqKind};
pub use set::Set;
pub use stack::Stack;
pub use value::{is, Value};
