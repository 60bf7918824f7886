// SPDX-License-Identifier: Apache-2.0

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::escape_processor::EscapeProcessor;
use crate::{EltnNumber, ErrorKind, Event};

/// A key with its value normalized for duplicate detection.
///
/// Integral floats compare equal to integers, so `[1]`, `[1.0]` and the
/// first implicit index all collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum KeyValue {
    Boolean(bool),
    Integer(i64),
    /// Bit pattern of a non-integral float.
    Float(u64),
    String(Vec<u8>),
}

impl KeyValue {
    pub fn from_number(number: EltnNumber) -> Self {
        match number {
            EltnNumber::Integer(val) => KeyValue::Integer(val),
            EltnNumber::Float(val) if is_integral(val) => KeyValue::Integer(val as i64),
            EltnNumber::Float(val) => KeyValue::Float(val.to_bits()),
        }
    }
}

/// Whether `val` is a whole number an `i64` holds exactly.
fn is_integral(val: f64) -> bool {
    // 2^63 itself is out of range; -2^63 is in
    (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&val)
        && val as i64 as f64 == val
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Key {
    /// The key event, or [`Event::TableKeyInteger`] for implicit keys.
    pub kind: Event,
    /// Name, decoded string, number as written, or implicit index.
    pub text: String,
    pub value: KeyValue,
}

impl Key {
    pub fn new(kind: Event, text: String, value: KeyValue) -> Self {
        Self { kind, text, value }
    }

    fn write_segment(&self, first: bool, out: &mut String) {
        match &self.value {
            KeyValue::String(bytes) => EscapeProcessor::key_segment(bytes, first, out),
            KeyValue::Integer(val) => {
                let _ = write!(out, "[{val}]");
            }
            KeyValue::Float(_) => {
                let _ = write!(out, "[{}]", self.text);
            }
            KeyValue::Boolean(val) => {
                let _ = write!(out, "[{val}]");
            }
        }
    }
}

/// Key bookkeeping for one open table, or for the top level.
#[derive(Debug)]
struct TableContext {
    /// The key the table was assigned to; `None` for the top level.
    owner: Option<Key>,
    seen: BTreeSet<KeyValue>,
    next_index: i64,
}

impl TableContext {
    fn new(owner: Option<Key>) -> Self {
        Self {
            owner,
            seen: BTreeSet::new(),
            next_index: 1,
        }
    }
}

/// Stack of table contexts, top level first, plus the key of the entry
/// being parsed.
#[derive(Debug)]
pub(crate) struct TableStack {
    contexts: Vec<TableContext>,
    entry_key: Option<Key>,
}

impl TableStack {
    pub fn new() -> Self {
        Self {
            contexts: vec![TableContext::new(None)],
            entry_key: None,
        }
    }

    pub fn depth(&self) -> usize {
        self.contexts.len().saturating_sub(1)
    }

    /// Records an explicit key for the current table.
    pub fn claim_key(&mut self, key: Key) -> Result<(), ErrorKind> {
        let fresh = match self.contexts.last_mut() {
            Some(context) => context.seen.insert(key.value.clone()),
            None => true,
        };
        self.entry_key = Some(key);
        if fresh {
            Ok(())
        } else {
            Err(ErrorKind::DuplicateKey)
        }
    }

    /// Records the next positional key for an entry written without one.
    pub fn claim_implicit_key(&mut self) -> Result<(), ErrorKind> {
        let index = match self.contexts.last_mut() {
            Some(context) => {
                let index = context.next_index;
                context.next_index = index.saturating_add(1);
                index
            }
            None => 1,
        };
        self.claim_key(Key::new(
            Event::TableKeyInteger,
            index.to_string(),
            KeyValue::Integer(index),
        ))
    }

    /// Opens a table owned by the current entry's key.
    pub fn enter_table(&mut self) {
        let owner = self.entry_key.take();
        self.contexts.push(TableContext::new(owner));
    }

    /// Closes the innermost table; its key becomes the current key again.
    pub fn exit_table(&mut self) -> Result<(), ErrorKind> {
        if self.depth() == 0 {
            return Err(ErrorKind::UnexpectedToken);
        }
        self.entry_key = self.contexts.pop().and_then(|context| context.owner);
        Ok(())
    }

    /// Forgets the finished entry's key.
    pub fn end_entry(&mut self) {
        self.entry_key = None;
    }

    /// The current entry's key, or the key of the innermost open table.
    pub fn current_key(&self) -> Option<&Key> {
        self.entry_key
            .as_ref()
            .or_else(|| self.contexts.last().and_then(|c| c.owner.as_ref()))
    }

    pub fn path(&self) -> String {
        let mut path = String::new();
        let keys = self
            .contexts
            .iter()
            .filter_map(|context| context.owner.as_ref())
            .chain(self.entry_key.as_ref());
        for (i, key) in keys.enumerate() {
            key.write_segment(i == 0, &mut path);
        }
        path
    }
}
