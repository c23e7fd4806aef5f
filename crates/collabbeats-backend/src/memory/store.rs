//! In-memory document store with versioned commits and live watches.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use crate::doc::{CollectionPath, Doc, DocPath, Fields};
use crate::error::{BackendError, Result};
use crate::query::{compare_values, Direction, Query, QueryTarget};
use crate::store::{DocumentStore, QueryWatch};
use crate::txn::{ReadGuard, Version, WriteOp};

struct StoredDoc {
    fields: Fields,
    version: u64,
    seq: u64,
}

struct WatchEntry {
    query: Query,
    tx: watch::Sender<Vec<Doc>>,
}

#[derive(Default)]
struct Inner {
    /// collection path string -> doc id -> stored document
    collections: BTreeMap<String, BTreeMap<String, StoredDoc>>,
    watches: Vec<WatchEntry>,
    /// (collection-group name, covered field set)
    indexes: Vec<(String, BTreeSet<String>)>,
    next_version: u64,
    next_seq: u64,
}

/// The in-memory [`DocumentStore`].
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_version: 1,
                next_seq: 1,
                ..Default::default()
            }),
        }
    }

    /// Provision a composite index. Queries needing an index that was not
    /// registered fail with [`BackendError::MissingIndex`], like the real
    /// backend before its index is built.
    pub fn register_index(&self, group: &str, fields: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        inner.indexes.push((
            group.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        ));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Query evaluation
// ---------------------------------------------------------------------------

fn eval_query(inner: &Inner, query: &Query) -> Result<Vec<Doc>> {
    if let Some(needed) = query.composite_index_fields() {
        let name = query.target.index_name();
        let covered = inner
            .indexes
            .iter()
            .any(|(group, fields)| group == name && needed.is_subset(fields));
        if !covered {
            return Err(BackendError::MissingIndex {
                collection: name.to_string(),
                fields: needed.into_iter().collect::<Vec<_>>().join(", "),
            });
        }
    }

    let mut hits: Vec<(&String, &String, &StoredDoc)> = Vec::new();
    match &query.target {
        QueryTarget::Collection(path) => {
            if let Some((key, docs)) = inner.collections.get_key_value(path.as_str()) {
                hits.extend(docs.iter().map(|(id, d)| (key, id, d)));
            }
        }
        QueryTarget::Group(group) => {
            for (coll, docs) in &inner.collections {
                if coll.rsplit('/').next() == Some(group.as_str()) {
                    hits.extend(docs.iter().map(|(id, d)| (coll, id, d)));
                }
            }
        }
    }

    let mut hits: Vec<(&String, &String, &StoredDoc)> = hits
        .into_iter()
        .filter(|(_, id, d)| query.matches(id, &d.fields))
        .collect();

    match &query.order {
        Some((field, dir)) => {
            // documents missing the order key are excluded, as the backend does
            hits.retain(|(_, _, d)| d.fields.contains_key(field));
            hits.sort_by(|a, b| {
                let va = a.2.fields.get(field).unwrap_or(&Value::Null);
                let vb = b.2.fields.get(field).unwrap_or(&Value::Null);
                let ord = match dir {
                    Direction::Asc => compare_values(va, vb),
                    Direction::Desc => compare_values(vb, va),
                };
                ord.then(a.2.seq.cmp(&b.2.seq))
            });
        }
        None => hits.sort_by_key(|(_, _, d)| d.seq),
    }

    if let Some(limit) = query.limit {
        hits.truncate(limit);
    }

    Ok(hits
        .into_iter()
        .map(|(coll, id, d)| Doc {
            path: CollectionPath::new(coll.clone()).doc(id.clone()),
            fields: d.fields.clone(),
        })
        .collect())
}

fn merge_fields(dest: &mut Fields, src: Fields) {
    for (key, value) in src {
        match value {
            Value::Object(incoming) => match dest.get_mut(&key) {
                Some(Value::Object(existing)) => merge_fields(existing, incoming),
                _ => {
                    dest.insert(key, Value::Object(incoming));
                }
            },
            other => {
                dest.insert(key, other);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mutation plumbing
// ---------------------------------------------------------------------------

impl Inner {
    fn write_doc(&mut self, path: &DocPath, fields: Fields) {
        let version = self.next_version;
        self.next_version += 1;

        let docs = self
            .collections
            .entry(path.collection.as_str().to_string())
            .or_default();
        let seq = match docs.get(&path.id) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        docs.insert(
            path.id.clone(),
            StoredDoc {
                fields,
                version,
                seq,
            },
        );
    }

    fn merge_doc(&mut self, path: &DocPath, fields: Fields) {
        let mut merged = self
            .collections
            .get(path.collection.as_str())
            .and_then(|docs| docs.get(&path.id))
            .map(|d| d.fields.clone())
            .unwrap_or_default();
        merge_fields(&mut merged, fields);
        self.write_doc(path, merged);
    }

    fn delete_doc(&mut self, path: &DocPath) {
        if let Some(docs) = self.collections.get_mut(path.collection.as_str()) {
            docs.remove(&path.id);
        }
    }

    fn current_version(&self, path: &DocPath) -> Version {
        self.collections
            .get(path.collection.as_str())
            .and_then(|docs| docs.get(&path.id))
            .map(|d| Version(d.version))
            .unwrap_or(Version::ABSENT)
    }

    fn apply(&mut self, write: WriteOp) {
        match write {
            WriteOp::Set { path, fields } => self.write_doc(&path, fields),
            WriteOp::Merge { path, fields } => self.merge_doc(&path, fields),
            WriteOp::Delete { path } => self.delete_doc(&path),
        }
    }

    /// Push fresh result sets to every live watch; prune dead ones.
    fn notify_watches(&mut self) {
        let mut results = Vec::with_capacity(self.watches.len());
        for entry in &self.watches {
            // index validity was checked when the watch was created
            results.push(eval_query(self, &entry.query).unwrap_or_default());
        }
        for (entry, docs) in self.watches.iter().zip(results) {
            entry.tx.send_if_modified(|current| {
                if *current != docs {
                    *current = docs;
                    true
                } else {
                    false
                }
            });
        }
        self.watches.retain(|entry| entry.tx.receiver_count() > 0);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Doc>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .collections
            .get(path.collection.as_str())
            .and_then(|docs| docs.get(&path.id))
            .map(|d| Doc {
                path: path.clone(),
                fields: d.fields.clone(),
            }))
    }

    async fn get_for_update(&self, path: &DocPath) -> Result<(Option<Doc>, Version)> {
        let inner = self.inner.lock().unwrap();
        let doc = inner
            .collections
            .get(path.collection.as_str())
            .and_then(|docs| docs.get(&path.id));
        Ok((
            doc.map(|d| Doc {
                path: path.clone(),
                fields: d.fields.clone(),
            }),
            doc.map(|d| Version(d.version)).unwrap_or(Version::ABSENT),
        ))
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<Doc> {
        let path = collection.doc(Uuid::new_v4().to_string());
        let mut inner = self.inner.lock().unwrap();
        inner.write_doc(&path, fields.clone());
        inner.notify_watches();
        Ok(Doc { path, fields })
    }

    async fn set(&self, path: &DocPath, fields: Fields) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.write_doc(path, fields);
        inner.notify_watches();
        Ok(())
    }

    async fn merge(&self, path: &DocPath, fields: Fields) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.merge_doc(path, fields);
        inner.notify_watches();
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.delete_doc(path);
        inner.notify_watches();
        Ok(())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Doc>> {
        let inner = self.inner.lock().unwrap();
        eval_query(&inner, query)
    }

    async fn commit(&self, reads: &[ReadGuard], writes: Vec<WriteOp>) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        for guard in reads {
            if inner.current_version(&guard.path) != guard.version {
                return Err(BackendError::Conflict);
            }
        }
        for write in writes {
            inner.apply(write);
        }
        inner.notify_watches();
        Ok(())
    }

    async fn watch(&self, query: &Query) -> Result<QueryWatch> {
        let mut inner = self.inner.lock().unwrap();
        let initial = eval_query(&inner, query)?;
        let (tx, rx) = watch::channel(initial);
        inner.watches.push(WatchEntry {
            query: query.clone(),
            tx,
        });
        Ok(QueryWatch::new(rx))
    }
}
