//! Document addressing and untyped document values.
//!
//! A collection path is a slash-separated string with an odd number of
//! segments (`beats`, `beats/{id}/likes`); a document path appends an id.
//! Document contents are JSON object maps; timestamps are RFC 3339 strings,
//! which order chronologically under plain lexical comparison.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Untyped document contents.
pub type Fields = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// A collection path (`beats`, `beats/{id}/comments`, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The path of a document inside this collection.
    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.into(),
        }
    }

    /// A subcollection under one of this collection's documents.
    pub fn child(&self, doc_id: &str, sub: &str) -> CollectionPath {
        Self(format!("{}/{}/{}", self.0, doc_id, sub))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final segment, which names the collection group this path
    /// belongs to (`beats/x/likes` → `likes`).
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The id of the parent document, if this is a subcollection.
    pub fn parent_doc(&self) -> Option<DocPath> {
        let mut parts: Vec<&str> = self.0.split('/').collect();
        if parts.len() < 3 {
            return None;
        }
        parts.pop();
        let id = parts.pop().unwrap_or_default().to_string();
        Some(DocPath {
            collection: CollectionPath(parts.join("/")),
            id,
        })
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully qualified document path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: CollectionPath,
    pub id: String,
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

// ---------------------------------------------------------------------------
// Doc
// ---------------------------------------------------------------------------

/// A document snapshot: its path plus its fields at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc {
    pub path: DocPath,
    pub fields: Fields,
}

impl Doc {
    pub fn id(&self) -> &str {
        &self.path.id
    }

    /// Read a numeric field, tolerating absence and non-numeric junk.
    /// Counters on legacy documents are read through this.
    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            _ => default,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Parse an RFC 3339 timestamp field.
    pub fn time(&self, key: &str) -> Option<DateTime<Utc>> {
        self.text(key)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Decode the fields into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }
}

/// Serialize a typed model into document fields.
pub fn fields_of<T: Serialize>(model: &T) -> Result<Fields, serde_json::Error> {
    match serde_json::to_value(model)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom(
            "model did not serialize to an object",
        )),
    }
}
