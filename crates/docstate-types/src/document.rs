//! Document and identifier types.
//!
//! A `Document` is a non-empty JSON object supplied by the caller. The same
//! value serves two roles: as the match filter when probing the store, and
//! as the insertion payload when the store must be corrected. Beyond
//! top-level subset matching the content is opaque -- no schema.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RequestError;

/// Length in characters of a store-assigned identifier (24 lowercase hex).
pub const ID_LEN: usize = 24;

/// Opaque store-assigned identifier of a document.
///
/// The store mints these; everything else only carries them through.
/// Store-native id types are converted to this string form immediately on
/// retrieval, before the value crosses any component boundary.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The all-zero sentinel reported for a check-mode insert, standing in
    /// for the identifier the store would have assigned.
    pub fn placeholder() -> Self {
        Self("0".repeat(ID_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId(\"{}\")", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-empty JSON object used as both match filter and insert payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Document(Map<String, Value>);

impl Document {
    /// Validate a JSON value into a Document.
    ///
    /// Rejects non-objects and empty objects: an empty filter would match
    /// every document in the collection, which is never what a caller
    /// declaring a single desired document means.
    pub fn new(value: Value) -> Result<Self, RequestError> {
        match value {
            Value::Object(map) if map.is_empty() => Err(RequestError::EmptyDocument),
            Value::Object(map) => Ok(Self(map)),
            other => Err(RequestError::NotAnObject(kind_of(&other))),
        }
    }

    /// The document's fields, in caller-supplied order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Top-level subset match: every field of `self` (the filter) must be
    /// present in `candidate` with a deep-equal value. Nested objects and
    /// arrays are compared whole; there is no operator language.
    pub fn matches(&self, candidate: &Document) -> bool {
        self.0
            .iter()
            .all(|(key, value)| candidate.0.get(key) == Some(value))
    }
}

impl TryFrom<Value> for Document {
    type Error = RequestError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.0)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
