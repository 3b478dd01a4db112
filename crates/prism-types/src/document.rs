//! The nested, insertion-ordered record container.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::DataQuery;

/// A value stored in a [`Document`].
///
/// Timestamps serialise as RFC 3339 strings and therefore deserialise back
/// as [`Value::String`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    List(Vec<Value>),
    Document(Document),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Document(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Self::Document(d) => Some(d),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

impl From<Document> for Value {
    fn from(d: Document) -> Self {
        Self::Document(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

/// An insertion-ordered mapping from keys to [`Value`]s.
///
/// Keys are unique within one document. Replacing an existing key keeps its
/// original position, so serialisation order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the top-level entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Sets `value` at `path`, creating intermediate documents as needed.
    ///
    /// A non-document value found where an intermediate document is needed
    /// is replaced. Setting an empty path does nothing.
    pub fn set(&mut self, path: impl Into<DataQuery>, value: impl Into<Value>) {
        let path = path.into();
        if let Some((last, parents)) = path.split_last() {
            self.set_in(parents, last, value.into());
        }
    }

    /// Returns the value at `path`, or `None` if any segment is missing.
    pub fn get(&self, path: impl Into<DataQuery>) -> Option<&Value> {
        let path = path.into();
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.entries.get(segment)?.as_document()?;
        }
        current.entries.get(last)
    }

    pub fn get_document(&self, path: impl Into<DataQuery>) -> Option<&Document> {
        self.get(path).and_then(Value::as_document)
    }

    pub fn get_str(&self, path: impl Into<DataQuery>) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn contains(&self, path: impl Into<DataQuery>) -> bool {
        self.get(path).is_some()
    }

    /// Removes and returns the value at `path`. Missing paths are a no-op.
    ///
    /// The remaining entries keep their relative order.
    pub fn remove(&mut self, path: impl Into<DataQuery>) -> Option<Value> {
        let path = path.into();
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.entries.get_mut(segment)?.as_document_mut()?;
        }
        current.entries.shift_remove(last)
    }

    fn set_in(&mut self, parents: &[String], last: &str, value: Value) {
        match parents.split_first() {
            None => {
                self.entries.insert(last.to_string(), value);
            }
            Some((head, rest)) => {
                let mut child = self.take_child(head);
                child.set_in(rest, last, value);
                self.entries.insert(head.clone(), Value::Document(child));
            }
        }
    }

    /// Takes the nested document stored under `key`, leaving an empty one
    /// in its slot so the key keeps its position.
    fn take_child(&mut self, key: &str) -> Document {
        let Some(slot) = self.entries.get_mut(key) else {
            return Document::new();
        };
        match std::mem::replace(slot, Value::Document(Document::new())) {
            Value::Document(doc) => doc,
            _ => Document::new(),
        }
    }
}
