//! The document-store capability trait and the live query watch handle.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::doc::{CollectionPath, Doc, DocPath, Fields};
use crate::error::Result;
use crate::query::Query;
use crate::txn::{ReadGuard, Version, WriteOp};

/// A document-oriented store with queries, live subscriptions, and a
/// versioned commit primitive for optimistic transactions.
///
/// Implementations must treat `commit` as atomic: either every write
/// applies, or (on a version mismatch) none do and
/// [`BackendError::Conflict`](crate::BackendError::Conflict) is returned.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document.
    async fn get(&self, path: &DocPath) -> Result<Option<Doc>>;

    /// Fetch a document together with its version, for transactional reads.
    /// Absent documents report [`Version::ABSENT`] so create races are
    /// detected at commit time.
    async fn get_for_update(&self, path: &DocPath) -> Result<(Option<Doc>, Version)>;

    /// Create a document with a generated id.
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<Doc>;

    /// Create or fully replace a document.
    async fn set(&self, path: &DocPath, fields: Fields) -> Result<()>;

    /// Create or merge into a document. Maps merge recursively, so
    /// `{read: {uid: ts}}` updates one participant's read mark without
    /// clobbering the others'.
    async fn merge(&self, path: &DocPath, fields: Fields) -> Result<()>;

    /// Delete a document. Deleting an absent document is a no-op.
    async fn delete(&self, path: &DocPath) -> Result<()>;

    /// Run a one-shot query.
    async fn query(&self, query: &Query) -> Result<Vec<Doc>>;

    /// Atomically verify the read guards and apply the writes.
    async fn commit(&self, reads: &[ReadGuard], writes: Vec<WriteOp>) -> Result<()>;

    /// Establish a live subscription: the returned handle is seeded with
    /// the current result set and updated whenever a mutation changes it.
    async fn watch(&self, query: &Query) -> Result<QueryWatch>;
}

/// Handle to a live query subscription.
///
/// Dropping the handle cancels the subscription; the store prunes it on the
/// next notification pass.
#[derive(Debug)]
pub struct QueryWatch {
    rx: watch::Receiver<Vec<Doc>>,
}

impl QueryWatch {
    pub fn new(rx: watch::Receiver<Vec<Doc>>) -> Self {
        Self { rx }
    }

    /// The most recently delivered result set.
    pub fn snapshot(&self) -> Vec<Doc> {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. Returns `false` once the store side has
    /// gone away and no further updates will arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
