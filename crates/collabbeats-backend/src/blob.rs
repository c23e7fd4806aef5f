//! The binary object store capability (audio files, cover art, avatars).

use async_trait::async_trait;

use crate::error::Result;

/// Upload / retrieve-by-reference / delete, addressed by slash-separated
/// storage paths (`audio/{uid}/{name}`).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under a path, replacing any previous object.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// A URL that serves the object. Fails with `NotFound` for unknown
    /// paths.
    async fn download_url(&self, path: &str) -> Result<String>;

    /// Remove an object. Fails with `NotFound` for unknown paths.
    async fn delete(&self, path: &str) -> Result<()>;
}
