//! Beat lookups, URL resolution across legacy field spellings, and
//! owner-initiated deletion.

use std::sync::Arc;

use collabbeats_backend::{
    AuthGateway, BackendError, BlobStore, Direction, DocumentStore, Query,
};
use collabbeats_shared::{Beat, BeatId};

use crate::error::{ClientError, Result};
use crate::paths;
use crate::session::require_user;

pub struct BeatService {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    auth: Arc<dyn AuthGateway>,
}

impl BeatService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        auth: Arc<dyn AuthGateway>,
    ) -> Self {
        Self { store, blobs, auth }
    }

    pub async fn get(&self, beat: &BeatId) -> Result<Option<Beat>> {
        match self.store.get(&paths::beats().doc(beat.as_str())).await? {
            Some(doc) => Ok(Some(doc.decode::<Beat>().map_err(BackendError::from)?)),
            None => Ok(None),
        }
    }

    /// A user's public beats, newest first. While the composite index is
    /// building, fall back to an unordered owner query so the profile still
    /// shows something.
    pub async fn beats_of(&self, owner: &str) -> Result<Vec<(BeatId, Beat)>> {
        let ordered = Query::collection(paths::beats())
            .where_eq("userId", owner)
            .where_eq("visibility", "public")
            .order_by("timestamp", Direction::Desc);

        let docs = match self.store.query(&ordered).await {
            Ok(docs) => docs,
            Err(BackendError::MissingIndex { .. }) => {
                let fallback = Query::collection(paths::beats()).where_eq("userId", owner);
                self.store.query(&fallback).await?
            }
            Err(e) => return Err(e.into()),
        };

        Ok(docs
            .iter()
            .filter_map(|doc| {
                let beat = doc.decode::<Beat>().ok()?;
                Some((BeatId::new(doc.id()), beat))
            })
            .collect())
    }

    /// Delete my beat: the audio object is removed best-effort, then the
    /// document. Likes and comments are not cascaded here.
    pub async fn delete(&self, beat: &BeatId) -> Result<()> {
        let me = require_user(&*self.auth)?;

        let path = paths::beats().doc(beat.as_str());
        let Some(doc) = self.store.get(&path).await? else {
            return Ok(());
        };
        if doc.text("userId") != Some(me.uid.as_str()) {
            return Err(ClientError::Forbidden("Not your beat.".into()));
        }

        if let Some(storage_path) = doc.text("storagePath") {
            if let Err(e) = self.blobs.delete(storage_path).await {
                tracing::warn!(path = storage_path, error = %e, "audio object delete failed");
            }
        }

        self.store.delete(&path).await?;
        tracing::info!(beat = %beat, "beat deleted");
        Ok(())
    }

    /// A playable URL for a beat.
    pub async fn audio_url(&self, beat: &Beat) -> Option<String> {
        resolve_audio_url(&self.blobs, beat).await
    }

    /// Cover art URL for a beat.
    pub async fn cover_url(&self, beat: &Beat) -> Option<String> {
        resolve_cover_url(&self.blobs, beat).await
    }
}

/// A playable URL: current field, then the legacy field, then a download
/// URL minted from the storage path.
pub async fn resolve_audio_url(blobs: &Arc<dyn BlobStore>, beat: &Beat) -> Option<String> {
    if let Some(url) = &beat.audio_url {
        return Some(url.clone());
    }
    if let Some(url) = &beat.download_url {
        return Some(url.clone());
    }
    if let Some(path) = &beat.storage_path {
        return blobs.download_url(path).await.ok();
    }
    None
}

/// Cover art URL with the same fallback chain.
pub async fn resolve_cover_url(blobs: &Arc<dyn BlobStore>, beat: &Beat) -> Option<String> {
    if let Some(url) = &beat.cover_url {
        return Some(url.clone());
    }
    if let Some(path) = &beat.cover_path {
        return blobs.download_url(path).await.ok();
    }
    None
}
