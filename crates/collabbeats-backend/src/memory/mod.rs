//! In-memory implementations of the backend capabilities.
//!
//! Used by the test suites and by offline development. Per-document version
//! numbers make concurrent transactions genuinely conflict and retry, so the
//! lost-update behaviour of the real backend is reproduced rather than
//! papered over by a lock.

mod auth;
mod blobs;
mod store;

pub use auth::MemoryAuth;
pub use blobs::MemoryBlobs;
pub use store::MemoryStore;

use std::sync::Arc;

/// The three capabilities bundled for convenient wiring.
pub struct MemoryBackend {
    pub store: Arc<MemoryStore>,
    pub auth: Arc<MemoryAuth>,
    pub blobs: Arc<MemoryBlobs>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            auth: Arc::new(MemoryAuth::new()),
            blobs: Arc::new(MemoryBlobs::new()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
