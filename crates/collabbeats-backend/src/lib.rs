//! # collabbeats-backend
//!
//! The data-access capability set the client logic is written against: a
//! document store with queries, atomic read-check-write transactions and
//! live query subscriptions, an authentication gateway, and a binary blob
//! store. Production deployments bind these traits to the hosted backend
//! SDK; tests and offline development bind them to the in-memory
//! implementation in [`memory`].
//!
//! The store is schemaless: a document is a JSON object map addressed by a
//! `collection/id` path. Typed decoding lives with the callers.

pub mod auth;
pub mod blob;
pub mod doc;
pub mod error;
pub mod memory;
pub mod query;
pub mod store;
pub mod txn;

pub use auth::{AuthGateway, AuthUser};
pub use blob::BlobStore;
pub use doc::{fields_of, CollectionPath, Doc, DocPath, Fields};
pub use error::{AuthError, BackendError, Result};
pub use memory::{MemoryAuth, MemoryBackend, MemoryBlobs, MemoryStore};
pub use query::{Direction, Filter, Query, QueryTarget};
pub use store::{DocumentStore, QueryWatch};
pub use txn::{
    run_transaction, run_transaction_with, ReadGuard, Transaction, Version, WriteOp,
    DEFAULT_TXN_ATTEMPTS,
};
