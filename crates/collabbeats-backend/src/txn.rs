//! Optimistic read-check-write transactions.
//!
//! A [`Transaction`] records the version of every document it reads and
//! stages its writes. [`run_transaction`] executes the body, then asks the
//! store to commit: the store re-checks every recorded version and applies
//! the writes atomically, or fails with `Conflict` if any read document was
//! modified in the meantime. Conflicts are retried with a fresh transaction,
//! so the read-check-write of a counted toggle never loses an update.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::doc::{Doc, DocPath, Fields};
use crate::error::{BackendError, Result};
use crate::store::DocumentStore;

/// Retry budget for conflicting transactions.
pub const DEFAULT_TXN_ATTEMPTS: u32 = 8;

/// A document version observed at read time. Monotonically increasing per
/// store; absent documents read as [`Version::ABSENT`], which is how a
/// create race is detected at commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version(pub u64);

impl Version {
    pub const ABSENT: Version = Version(0);
}

/// A read recorded by a transaction, validated at commit.
#[derive(Debug, Clone)]
pub struct ReadGuard {
    pub path: DocPath,
    pub version: Version,
}

/// A staged write.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Set { path: DocPath, fields: Fields },
    Merge { path: DocPath, fields: Fields },
    Delete { path: DocPath },
}

/// In-flight transaction state: recorded reads plus staged writes.
pub struct Transaction {
    store: Arc<dyn DocumentStore>,
    reads: Vec<ReadGuard>,
    writes: Vec<WriteOp>,
}

impl Transaction {
    fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Transactional read: the document's version is checked at commit.
    pub async fn get(&mut self, path: &DocPath) -> Result<Option<Doc>> {
        let (doc, version) = self.store.get_for_update(path).await?;
        self.reads.push(ReadGuard {
            path: path.clone(),
            version,
        });
        Ok(doc)
    }

    /// Stage a full document write.
    pub fn set(&mut self, path: &DocPath, fields: Fields) {
        self.writes.push(WriteOp::Set {
            path: path.clone(),
            fields,
        });
    }

    /// Stage a merge into a document.
    pub fn merge(&mut self, path: &DocPath, fields: Fields) {
        self.writes.push(WriteOp::Merge {
            path: path.clone(),
            fields,
        });
    }

    /// Stage a document deletion.
    pub fn delete(&mut self, path: &DocPath) {
        self.writes.push(WriteOp::Delete { path: path.clone() });
    }
}

/// Run `body` as an atomic transaction with the default retry budget.
pub async fn run_transaction<T, F>(store: &Arc<dyn DocumentStore>, body: F) -> Result<T>
where
    F: for<'t> Fn(&'t mut Transaction) -> BoxFuture<'t, Result<T>>,
{
    run_transaction_with(store, DEFAULT_TXN_ATTEMPTS, body).await
}

/// Run `body` as an atomic transaction, retrying up to `attempts` times on
/// commit conflicts. Errors raised by the body itself are not retried.
pub async fn run_transaction_with<T, F>(
    store: &Arc<dyn DocumentStore>,
    attempts: u32,
    body: F,
) -> Result<T>
where
    F: for<'t> Fn(&'t mut Transaction) -> BoxFuture<'t, Result<T>>,
{
    for attempt in 0..attempts.max(1) {
        if attempt > 0 {
            // linear backoff keeps contending toggles from lock-stepping
            tokio::time::sleep(Duration::from_millis(2 * attempt as u64)).await;
        }

        let mut txn = Transaction::new(Arc::clone(store));
        let value = body(&mut txn).await?;
        let Transaction { reads, writes, .. } = txn;

        match store.commit(&reads, writes).await {
            Ok(()) => return Ok(value),
            Err(BackendError::Conflict) => {
                tracing::debug!(attempt, "transaction conflict, retrying");
                continue;
            }
            Err(other) => return Err(other),
        }
    }

    tracing::warn!(attempts, "transaction retries exhausted");
    Err(BackendError::Conflict)
}
