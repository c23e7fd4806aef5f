//! Beat uploads: blobs first, then the document with zeroed counters.

use std::sync::Arc;

use chrono::Utc;

use collabbeats_backend::{fields_of, AuthGateway, BlobStore, DocumentStore};
use collabbeats_shared::constants::CATEGORIES;
use collabbeats_shared::{Beat, BeatId, Visibility};

use crate::error::{ClientError, Result};
use crate::paths;
use crate::session::require_user;

/// A file picked by the user.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The upload form contents.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub visibility: Visibility,
    pub audio: FilePayload,
    pub cover: Option<FilePayload>,
}

pub struct UploadService {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    auth: Arc<dyn AuthGateway>,
}

impl UploadService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        auth: Arc<dyn AuthGateway>,
    ) -> Self {
        Self { store, blobs, auth }
    }

    /// Validate, upload the audio (and optional cover), then create the
    /// beat document. Returns the new id and the stored record, so the
    /// caller can route to the genre's explore page.
    pub async fn upload(&self, request: UploadRequest) -> Result<(BeatId, Beat)> {
        let me = require_user(&*self.auth)?;

        let title = request.title.trim();
        if title.is_empty() {
            return Err(ClientError::validation("Title is required."));
        }
        let genre = request.genre.trim();
        if genre.is_empty() {
            return Err(ClientError::validation("Please select a category."));
        }
        if !CATEGORIES.contains(&genre) {
            return Err(ClientError::validation("Unknown category."));
        }
        if request.audio.bytes.is_empty() {
            return Err(ClientError::validation("Choose an audio file."));
        }

        // keep storage paths flat
        let safe_title = title.replace(['/', '\\'], "-");
        let millis = Utc::now().timestamp_millis();

        let cover_url = match &request.cover {
            Some(cover) => {
                let path = format!("covers/{}/{}_{}", me.uid, millis, cover.name);
                self.blobs
                    .put(&path, cover.bytes.clone(), &cover.content_type)
                    .await?;
                Some(self.blobs.download_url(&path).await?)
            }
            None => None,
        };

        let storage_path = format!("audio/{}/{}_{}", me.uid, millis, request.audio.name);
        self.blobs
            .put(
                &storage_path,
                request.audio.bytes.clone(),
                &request.audio.content_type,
            )
            .await?;
        let audio_url = self.blobs.download_url(&storage_path).await?;

        let beat = Beat {
            user_id: me.uid.clone(),
            title: safe_title,
            description: request.description.trim().to_string(),
            genre: genre.to_string(),
            visibility: request.visibility,
            audio_url: Some(audio_url),
            cover_url,
            storage_path: Some(storage_path),
            like_count: 0,
            comment_count: 0,
            timestamp: Some(Utc::now()),
            ..Default::default()
        };

        let doc = self.store.add(&paths::beats(), fields_of(&beat)?).await?;
        tracing::info!(beat = doc.id(), genre, "beat uploaded");
        Ok((BeatId::new(doc.id()), beat))
    }
}
