//! In-memory blob store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::blob::BlobStore;
use crate::error::{BackendError, Result};

struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
}

/// The in-memory [`BlobStore`]. Download URLs use a `memory://` scheme.
pub struct MemoryBlobs {
    objects: Mutex<HashMap<String, StoredBlob>>,
}

impl MemoryBlobs {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored bytes, for assertions in tests.
    pub fn bytes_of(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|b| b.bytes.clone())
    }

    /// The stored content type, for assertions in tests.
    pub fn content_type_of(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|b| b.content_type.clone())
    }
}

impl Default for MemoryBlobs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.objects.lock().unwrap().insert(
            path.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let objects = self.objects.lock().unwrap();
        if objects.contains_key(path) {
            Ok(format!("memory://{path}"))
        } else {
            Err(BackendError::NotFound)
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        match self.objects.lock().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => Err(BackendError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_url_delete_cycle() {
        let blobs = MemoryBlobs::new();
        blobs
            .put("avatars/u1.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(
            blobs.download_url("avatars/u1.png").await.unwrap(),
            "memory://avatars/u1.png"
        );
        assert_eq!(
            blobs.content_type_of("avatars/u1.png").as_deref(),
            Some("image/png")
        );

        blobs.delete("avatars/u1.png").await.unwrap();
        assert!(matches!(
            blobs.download_url("avatars/u1.png").await,
            Err(BackendError::NotFound)
        ));
    }
}
