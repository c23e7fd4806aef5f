//! Queries: a collection (or collection group), filters, at most one
//! order key, and a result limit.
//!
//! One order key per query is a deliberate constraint carried over from the
//! product: a single-key order only needs the backend's automatic per-field
//! indexes, while combining filters with an order on a different field
//! requires a provisioned composite index (surfaced as
//! `BackendError::MissingIndex` by conforming stores).

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::doc::CollectionPath;

/// What a query runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    Collection(CollectionPath),
    /// Every collection whose final path segment matches (e.g. all `likes`
    /// subcollections across all beats).
    Group(String),
}

impl QueryTarget {
    /// The name composite indexes are registered under.
    pub fn index_name(&self) -> &str {
        match self {
            QueryTarget::Collection(p) => p.leaf(),
            QueryTarget::Group(g) => g,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A single field constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals value.
    Eq(String, Value),
    /// Field is greater than or equal to value (timestamp windows).
    Gte(String, Value),
    /// Array field contains value (DM inbox participant lookup).
    ArrayContains(String, Value),
    /// Document id is one of the given ids (batched profile lookups).
    IdIn(Vec<String>),
}

impl Filter {
    fn field(&self) -> Option<&str> {
        match self {
            Filter::Eq(f, _) | Filter::Gte(f, _) | Filter::ArrayContains(f, _) => Some(f),
            Filter::IdIn(_) => None,
        }
    }
}

/// An immutable query value built with the fluent constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub target: QueryTarget,
    pub filters: Vec<Filter>,
    pub order: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(path: CollectionPath) -> Self {
        Self {
            target: QueryTarget::Collection(path),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            target: QueryTarget::Group(name.into()),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.into(), value.into()));
        self
    }

    pub fn where_gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(field.into(), value.into()));
        self
    }

    pub fn array_contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters
            .push(Filter::ArrayContains(field.into(), value.into()));
        self
    }

    pub fn id_in(mut self, ids: Vec<String>) -> Self {
        self.filters.push(Filter::IdIn(ids));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order = Some((field.into(), direction));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// The field set a composite index must cover, or `None` if the query is
    /// served by automatic single-field indexes.
    ///
    /// Rule: ordering by a field while filtering on any *other* field needs
    /// a composite index. Filter-only and single-field queries never do.
    pub fn composite_index_fields(&self) -> Option<BTreeSet<String>> {
        let (order_field, _) = self.order.as_ref()?;
        let mut fields: BTreeSet<String> = self
            .filters
            .iter()
            .filter_map(|f| f.field().map(str::to_string))
            .collect();
        if fields.is_empty() || (fields.len() == 1 && fields.contains(order_field.as_str())) {
            return None;
        }
        fields.insert(order_field.clone());
        Some(fields)
    }

    /// Whether a document's fields satisfy every filter. Id-based filters
    /// are evaluated against `doc_id`.
    pub fn matches(&self, doc_id: &str, fields: &crate::doc::Fields) -> bool {
        self.filters.iter().all(|filter| match filter {
            Filter::Eq(f, v) => fields.get(f) == Some(v),
            Filter::Gte(f, v) => fields
                .get(f)
                .map(|actual| compare_values(actual, v) != Ordering::Less)
                .unwrap_or(false),
            Filter::ArrayContains(f, v) => fields
                .get(f)
                .and_then(Value::as_array)
                .map(|arr| arr.contains(v))
                .unwrap_or(false),
            Filter::IdIn(ids) => ids.iter().any(|id| id == doc_id),
        })
    }
}

/// Total order over the JSON values the store holds: null < bool < number <
/// string. Strings that parse as RFC 3339 timestamps are ordered as
/// instants, so different encodings of the same moment (`Z` vs `+00:00`,
/// varying fractional widths) compare correctly — the backend's native
/// timestamp type behaves this way.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    fn as_instant(s: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        chrono::DateTime::parse_from_rfc3339(s).ok()
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let fx = x.as_f64().unwrap_or(0.0);
            let fy = y.as_f64().unwrap_or(0.0);
            fx.partial_cmp(&fy).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => match (as_instant(x), as_instant(y)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty),
            _ => x.cmp(y),
        },
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> crate::doc::Fields {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn eq_and_gte_filters() {
        let q = Query::collection(CollectionPath::new("beats"))
            .where_eq("visibility", "public")
            .where_gte("timestamp", "2024-01-01T00:00:00Z");

        assert!(q.matches(
            "b1",
            &fields(json!({ "visibility": "public", "timestamp": "2024-06-01T00:00:00Z" }))
        ));
        assert!(!q.matches(
            "b1",
            &fields(json!({ "visibility": "private", "timestamp": "2024-06-01T00:00:00Z" }))
        ));
        // missing range field never matches
        assert!(!q.matches("b1", &fields(json!({ "visibility": "public" }))));
    }

    #[test]
    fn array_contains_and_id_in() {
        let q = Query::collection(CollectionPath::new("dms")).array_contains("participants", "me");
        assert!(q.matches("t", &fields(json!({ "participants": ["me", "you"] }))));
        assert!(!q.matches("t", &fields(json!({ "participants": ["you"] }))));

        let q = Query::collection(CollectionPath::new("users")).id_in(vec!["u1".into()]);
        assert!(q.matches("u1", &fields(json!({}))));
        assert!(!q.matches("u2", &fields(json!({}))));
    }

    #[test]
    fn composite_index_detection() {
        // order on the filtered field: automatic index suffices
        let q = Query::collection(CollectionPath::new("beats"))
            .where_gte("timestamp", "x")
            .order_by("timestamp", Direction::Desc);
        assert!(q.composite_index_fields().is_none());

        // no order at all: fine
        let q = Query::collection(CollectionPath::new("beats")).where_eq("userId", "u");
        assert!(q.composite_index_fields().is_none());

        // equality on one field, order on another: composite required
        let q = Query::collection(CollectionPath::new("beats"))
            .where_eq("visibility", "public")
            .order_by("timestamp", Direction::Desc);
        let needed = q.composite_index_fields().unwrap();
        assert!(needed.contains("visibility") && needed.contains("timestamp"));
    }

    #[test]
    fn rfc3339_strings_order_chronologically() {
        assert_eq!(
            compare_values(
                &json!("2024-01-02T00:00:00Z"),
                &json!("2024-01-10T00:00:00Z")
            ),
            Ordering::Less
        );
        // encodings differ, instants still order correctly
        assert_eq!(
            compare_values(
                &json!("2024-01-02T00:00:00.12Z"),
                &json!("2024-01-02T00:00:00.123+00:00")
            ),
            Ordering::Less
        );
        assert_eq!(
            compare_values(
                &json!("2024-01-02T00:00:00Z"),
                &json!("2024-01-02T00:00:00+00:00")
            ),
            Ordering::Equal
        );
        // non-timestamp strings fall back to lexical order
        assert_eq!(
            compare_values(&json!("Afrobeat"), &json!("House")),
            Ordering::Less
        );
    }
}
