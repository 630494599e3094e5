// perma - Lazy sequence engine
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Lazy, chainable sequence views over perma containers.
//!
//! A [`Seq`] is a deferred computation descriptor: a source plus an
//! ordered list of pending steps. Chaining `filter`/`map` records a
//! step and evaluates nothing. A terminal operation (`get`, `first`,
//! `count`, any `to_*` conversion, `reduce`, `group_by`) drives a
//! single pass over the source: each element flows through every
//! pending step in registration order, short-circuiting to the next
//! element as soon as a filter rejects it. No intermediate container is
//! built between steps, and `get(i)` stops walking the source the
//! moment the i-th surviving element is produced.
//!
//! Sources come in two flavours. A stored container (`Map`, `List`,
//! ...) is re-walkable: the seq may be forced repeatedly with identical
//! results. A generator ([`Seq::from_iter_once`]) is single-use: its
//! first terminal operation consumes it, and any later one fails with
//! [`Error::SequenceExhausted`]. A terminal over an unbounded generator
//! needs a bounding operation (`get`, `first`) to terminate; that bound
//! is the caller's to supply.
//!
//! `Seq` is a single-threaded view object, unlike the containers it
//! wraps (which are freely shareable across threads).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::list::List;
use crate::map::Map;
use crate::ordered_map::OrderedMap;
use crate::set::Set;
use crate::stack::Stack;
use crate::value::Value;

type MapFn = Rc<dyn Fn(&Value) -> Value>;
type PredFn = Rc<dyn Fn(&Value) -> bool>;

#[derive(Clone)]
enum Step {
    Map(MapFn),
    /// Keep elements for which `pred(v) == keep`.
    Filter { pred: PredFn, keep: bool },
}

/// Which view of its entries a seq presents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeqKind {
    /// Key/value entries keyed by the source keys
    Keyed,
    /// Values keyed by their position among the survivors
    Indexed,
    /// Deduplicated values
    SetLike,
}

#[derive(Clone)]
enum SeqSource {
    List(List),
    Map(Map),
    OrderedMap(OrderedMap),
    Set(Set),
    Stack(Stack),
    Values(Rc<Vec<Value>>),
    Entries(Rc<Vec<(Value, Value)>>),
    /// Single-use generator; `None` once consumed.
    Generator(Rc<RefCell<Option<Box<dyn Iterator<Item = Value>>>>>),
}

/// A lazy sequence: a source plus pending transformation steps.
#[derive(Clone)]
pub struct Seq {
    source: SeqSource,
    steps: Vec<Step>,
    kind: SeqKind,
}

impl Seq {
    fn over(source: SeqSource, kind: SeqKind) -> Self {
        Seq {
            source,
            steps: Vec::new(),
            kind,
        }
    }

    /// Indexed seq over a list.
    pub fn from_list(list: List) -> Self {
        Seq::over(SeqSource::List(list), SeqKind::Indexed)
    }

    /// Keyed seq over a map's entries.
    pub fn from_map(map: Map) -> Self {
        Seq::over(SeqSource::Map(map), SeqKind::Keyed)
    }

    /// Keyed seq over an ordered map's entries, in insertion order.
    pub fn from_ordered_map(map: OrderedMap) -> Self {
        Seq::over(SeqSource::OrderedMap(map), SeqKind::Keyed)
    }

    /// Set seq over a set's elements.
    pub fn from_set(set: Set) -> Self {
        Seq::over(SeqSource::Set(set), SeqKind::SetLike)
    }

    /// Indexed seq over a stack, head first.
    pub fn from_stack(stack: Stack) -> Self {
        Seq::over(SeqSource::Stack(stack), SeqKind::Indexed)
    }

    /// Indexed seq over plain values.
    pub fn from_values(values: Vec<Value>) -> Self {
        Seq::over(SeqSource::Values(Rc::new(values)), SeqKind::Indexed)
    }

    /// Keyed seq over explicit key/value entries.
    pub fn from_entries(entries: Vec<(Value, Value)>) -> Self {
        Seq::over(SeqSource::Entries(Rc::new(entries)), SeqKind::Keyed)
    }

    /// Indexed seq over a single-use generator. The first terminal
    /// operation exhausts it; later ones fail with
    /// [`Error::SequenceExhausted`].
    pub fn from_iter_once(iter: impl Iterator<Item = Value> + 'static) -> Self {
        Seq::over(
            SeqSource::Generator(Rc::new(RefCell::new(Some(Box::new(iter))))),
            SeqKind::Indexed,
        )
    }

    /// The view kind this seq presents.
    pub fn kind(&self) -> SeqKind {
        self.kind
    }

    /// True while the seq still holds pending steps and no terminal
    /// operation has materialised it (seqs are stateless between
    /// forcings; this just reports whether steps are queued).
    pub fn has_pending_steps(&self) -> bool {
        !self.steps.is_empty()
    }

    // ------------------------------------------------------------------
    // Chaining (deferred; nothing evaluates here)
    // ------------------------------------------------------------------

    /// Record a map step.
    pub fn map(mut self, f: impl Fn(&Value) -> Value + 'static) -> Seq {
        self.steps.push(Step::Map(Rc::new(f)));
        self
    }

    /// Record a filter step keeping elements satisfying `pred`.
    pub fn filter(mut self, pred: impl Fn(&Value) -> bool + 'static) -> Seq {
        self.steps.push(Step::Filter {
            pred: Rc::new(pred),
            keep: true,
        });
        self
    }

    /// Record a filter step dropping elements satisfying `pred`.
    pub fn filter_not(mut self, pred: impl Fn(&Value) -> bool + 'static) -> Seq {
        self.steps.push(Step::Filter {
            pred: Rc::new(pred),
            keep: false,
        });
        self
    }

    /// Re-view as an indexed seq (values keyed by position).
    pub fn to_indexed(mut self) -> Seq {
        self.kind = SeqKind::Indexed;
        self
    }

    /// Re-view as a keyed seq (source keys preserved).
    pub fn to_keyed(mut self) -> Seq {
        self.kind = SeqKind::Keyed;
        self
    }

    /// Re-view as a set seq (deduplicated values).
    pub fn to_set_seq(mut self) -> Seq {
        self.kind = SeqKind::SetLike;
        self
    }

    // ------------------------------------------------------------------
    // Forcing
    // ------------------------------------------------------------------

    /// Walk the source once, feeding each surviving `(key, value)` to
    /// `sink` until the source ends or `sink` returns false.
    fn drive(&self, sink: &mut dyn FnMut(Value, Value) -> bool) -> Result<()> {
        let steps = &self.steps;
        let kind = self.kind;
        let mut seen = match kind {
            SeqKind::SetLike => Some(Set::new()),
            _ => None,
        };
        let mut out_index = 0i64;
        let mut emit = |key: Value,
                        value: Value,
                        sink: &mut dyn FnMut(Value, Value) -> bool|
         -> bool {
            if let Some(seen_set) = &mut seen {
                if seen_set.contains(&value) {
                    return true;
                }
                *seen_set = seen_set.insert(value.clone());
            }
            let mut current = value;
            for step in steps {
                match step {
                    Step::Map(f) => current = f(&current),
                    Step::Filter { pred, keep } => {
                        if pred(&current) != *keep {
                            // Rejected: move on to the next element.
                            return true;
                        }
                    }
                }
            }
            let out_key = match kind {
                SeqKind::Keyed => key,
                SeqKind::Indexed | SeqKind::SetLike => {
                    let k = Value::int(out_index);
                    out_index += 1;
                    k
                }
            };
            sink(out_key, current)
        };
        match &self.source {
            SeqSource::List(list) => {
                for (i, v) in list.iter().enumerate() {
                    if !emit(Value::int(i as i64), v.clone(), sink) {
                        return Ok(());
                    }
                }
            }
            SeqSource::Map(map) => {
                for (k, v) in map.iter() {
                    if !emit(k.clone(), v.clone(), sink) {
                        return Ok(());
                    }
                }
            }
            SeqSource::OrderedMap(map) => {
                for (k, v) in map.iter() {
                    if !emit(k.clone(), v.clone(), sink) {
                        return Ok(());
                    }
                }
            }
            SeqSource::Set(set) => {
                for v in set.iter() {
                    if !emit(v.clone(), v.clone(), sink) {
                        return Ok(());
                    }
                }
            }
            SeqSource::Stack(stack) => {
                for (i, v) in stack.iter().enumerate() {
                    if !emit(Value::int(i as i64), v.clone(), sink) {
                        return Ok(());
                    }
                }
            }
            SeqSource::Values(values) => {
                for (i, v) in values.iter().enumerate() {
                    if !emit(Value::int(i as i64), v.clone(), sink) {
                        return Ok(());
                    }
                }
            }
            SeqSource::Entries(entries) => {
                for (k, v) in entries.iter() {
                    if !emit(k.clone(), v.clone(), sink) {
                        return Ok(());
                    }
                }
            }
            SeqSource::Generator(slot) => {
                let iter = slot
                    .borrow_mut()
                    .take()
                    .ok_or(Error::SequenceExhausted)?;
                for (i, v) in iter.enumerate() {
                    if !emit(Value::int(i as i64), v, sink) {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    /// The i-th surviving value, or `None` past the end.
    ///
    /// Walks the source only far enough to produce the i-th survivor.
    /// Map steps queued after the last filter run only for the element
    /// actually delivered, so `seq.filter(p).map(f).get(1)` invokes `p`
    /// as often as it takes to find the second passing element and `f`
    /// exactly once.
    pub fn get(&self, index: usize) -> Result<Option<Value>> {
        let split = self
            .steps
            .iter()
            .rposition(|s| matches!(s, Step::Filter { .. }))
            .map_or(0, |i| i + 1);
        let head = Seq {
            source: self.source.clone(),
            steps: self.steps[..split].to_vec(),
            kind: self.kind,
        };
        let mut found = None;
        let mut count = 0usize;
        head.drive(&mut |_k, v| {
            if count == index {
                found = Some(v);
                false
            } else {
                count += 1;
                true
            }
        })?;
        Ok(found.map(|v| {
            let mut current = v;
            for step in &self.steps[split..] {
                if let Step::Map(f) = step {
                    current = f(&current);
                }
            }
            current
        }))
    }

    /// The first surviving value.
    pub fn first(&self) -> Result<Option<Value>> {
        self.get(0)
    }

    /// Number of surviving elements.
    pub fn count(&self) -> Result<usize> {
        let mut count = 0usize;
        self.drive(&mut |_k, _v| {
            count += 1;
            true
        })?;
        Ok(count)
    }

    /// Fold the surviving values in order.
    pub fn reduce(&self, init: Value, f: impl Fn(Value, &Value) -> Value) -> Result<Value> {
        let mut acc = init;
        self.drive(&mut |_k, v| {
            let current = std::mem::replace(&mut acc, Value::Nil);
            acc = f(current, &v);
            true
        })?;
        Ok(acc)
    }

    /// Materialise the surviving `(key, value)` entries.
    pub fn entries(&self) -> Result<Vec<(Value, Value)>> {
        let mut out = Vec::new();
        self.drive(&mut |k, v| {
            out.push((k, v));
            true
        })?;
        Ok(out)
    }

    /// The surviving values as a native `Vec`.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        self.drive(&mut |_k, v| {
            out.push(v);
            true
        })?;
        Ok(out)
    }

    /// The surviving values as a list, in source order.
    pub fn to_list(&self) -> Result<List> {
        Ok(self.to_vec()?.into_iter().collect())
    }

    /// The surviving entries as a map.
    pub fn to_map(&self) -> Result<Map> {
        Ok(self.entries()?.into_iter().collect())
    }

    /// The surviving entries as an ordered map, in source order.
    pub fn to_ordered_map(&self) -> Result<OrderedMap> {
        Ok(self.entries()?.into_iter().collect())
    }

    /// The distinct surviving values as a set.
    pub fn to_set(&self) -> Result<Set> {
        Ok(self.to_vec()?.into_iter().collect())
    }

    /// The surviving values as a stack (head = first survivor).
    pub fn to_stack(&self) -> Result<Stack> {
        Ok(Stack::from_ordered(self.to_vec()?.into_iter()))
    }

    /// Group the surviving values by `f`, preserving first-seen group
    /// order and source order within each group.
    pub fn group_by(&self, f: impl Fn(&Value) -> Value) -> Result<OrderedMap> {
        let mut groups = OrderedMap::new();
        self.drive(&mut |_k, v| {
            let key = f(&v);
            let group = match groups.get(&key) {
                Some(Value::List(members)) => members.push_back(v.clone()),
                _ => List::new().push_back(v.clone()),
            };
            groups = groups.set(key, Value::List(group));
            true
        })?;
        Ok(groups)
    }

    /// Materialise into the container value matching this seq's kind:
    /// a map for keyed seqs, a set for set seqs, a list otherwise.
    pub fn to_value(&self) -> Result<Value> {
        match self.kind {
            SeqKind::Keyed => Ok(Value::Map(self.to_map()?)),
            SeqKind::SetLike => Ok(Value::Set(self.to_set()?)),
            SeqKind::Indexed => Ok(Value::List(self.to_list()?)),
        }
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seq(<{:?}, {} pending step{}>)",
            self.kind,
            self.steps.len(),
            if self.steps.len() == 1 { "" } else { "s" }
        )
    }
}

impl From<List> for Seq {
    fn from(list: List) -> Self {
        Seq::from_list(list)
    }
}

impl From<Map> for Seq {
    fn from(map: Map) -> Self {
        Seq::from_map(map)
    }
}

impl From<OrderedMap> for Seq {
    fn from(map: OrderedMap) -> Self {
        Seq::from_ordered_map(map)
    }
}

impl From<Set> for Seq {
    fn from(set: Set) -> Self {
        Seq::from_set(set)
    }
}

impl From<Stack> for Seq {
    fn from(stack: Stack) -> Self {
        Seq::from_stack(stack)
    }
}

impl From<Vec<Value>> for Seq {
    fn from(values: Vec<Value>) -> Self {
        Seq::from_values(values)
    }
}
