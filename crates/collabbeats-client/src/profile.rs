//! Profile header state, avatar upload, "looking for" tags, and the
//! likes-received / likes-given lists.

use std::sync::Arc;

use serde_json::json;

use collabbeats_backend::{
    AuthGateway, BlobStore, Direction, DocumentStore, Fields, Query,
};
use collabbeats_shared::constants::{AVATAR_CONTENT_TYPES, LOOKING_FOR_OPTIONS};
use collabbeats_shared::{Beat, BeatId, UserId, UserProfile};

use crate::error::{ClientError, Result};
use crate::follows::FollowService;
use crate::likes::LikeService;
use crate::paths;
use crate::session::require_user;
use crate::upload::FilePayload;
use crate::users;
use crate::views::profile_header::ProfileHeader;

/// One beat with its recent likers, for the "likes received" modal.
#[derive(Debug, Clone)]
pub struct LikesReceivedEntry {
    pub beat_id: BeatId,
    pub title: String,
    pub like_count: i64,
    /// (uid, username, photo URL)
    pub likers: Vec<(String, String, String)>,
}

pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    auth: Arc<dyn AuthGateway>,
}

impl ProfileService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        auth: Arc<dyn AuthGateway>,
    ) -> Self {
        Self { store, blobs, auth }
    }

    pub async fn get(&self, target: &UserId) -> Result<Option<UserProfile>> {
        match self.store.get(&paths::users().doc(target.as_str())).await? {
            Some(doc) => Ok(doc.decode::<UserProfile>().ok()),
            None => Ok(None),
        }
    }

    /// Everything the profile header renders, for the current viewer.
    pub async fn header(&self, target: &UserId) -> Result<ProfileHeader> {
        let profile = self.get(target).await?.unwrap_or_default();

        let follow_service =
            FollowService::new(Arc::clone(&self.store), Arc::clone(&self.auth));
        let counts = follow_service.counts_for(target).await?;

        let me = self.auth.current_user();
        let is_owner = me
            .as_ref()
            .map(|u| u.uid == target.as_str())
            .unwrap_or(false);
        let am_following = if me.is_some() && !is_owner {
            follow_service.is_following(target).await?
        } else {
            false
        };

        Ok(ProfileHeader {
            uid: target.as_str().to_string(),
            username: if profile.username.is_empty() {
                "user".to_string()
            } else {
                profile.username
            },
            photo_url: profile.photo_url,
            looking_for: profile.looking_for,
            followers: counts.followers,
            following: counts.following,
            is_owner,
            am_following,
            signed_in: me.is_some(),
        })
    }

    /// Replace my "looking for" tag set. Tags come from the fixed option
    /// list; anything else is rejected before the write.
    pub async fn set_looking_for(&self, tags: Vec<String>) -> Result<()> {
        let me = require_user(&*self.auth)?;

        let mut cleaned = Vec::with_capacity(tags.len());
        for tag in tags {
            let tag = tag.to_lowercase();
            if !LOOKING_FOR_OPTIONS.contains(&tag.as_str()) {
                return Err(ClientError::validation(format!("Unknown tag: {tag}")));
            }
            if !cleaned.contains(&tag) {
                cleaned.push(tag);
            }
        }

        let mut fields = Fields::new();
        fields.insert("lookingFor".to_string(), json!(cleaned));
        self.store
            .merge(&paths::users().doc(&me.uid), fields)
            .await?;
        Ok(())
    }

    /// Store a new avatar and point my profile at it. Returns the
    /// authoritative URL for the view to reconcile its optimistic preview
    /// against.
    pub async fn upload_avatar(&self, image: FilePayload) -> Result<String> {
        let me = require_user(&*self.auth)?;

        if !AVATAR_CONTENT_TYPES.contains(&image.content_type.as_str()) {
            return Err(ClientError::validation(
                "Please choose a PNG, JPG, WEBP, or GIF.",
            ));
        }
        let ext = image
            .content_type
            .split('/')
            .nth(1)
            .unwrap_or("jpg")
            .replace("jpeg", "jpg");

        let path = format!("avatars/{}.{}", me.uid, ext);
        self.blobs
            .put(&path, image.bytes, &image.content_type)
            .await?;
        let url = self.blobs.download_url(&path).await?;

        let mut fields = Fields::new();
        fields.insert("photoURL".to_string(), json!(url));
        self.store
            .merge(&paths::users().doc(&me.uid), fields)
            .await?;

        tracing::info!(uid = %me.uid, "avatar updated");
        Ok(url)
    }

    /// Who liked this profile's recent beats, per beat.
    pub async fn likes_received(&self, owner: &UserId) -> Result<Vec<LikesReceivedEntry>> {
        let beats = crate::beats::BeatService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.blobs),
            Arc::clone(&self.auth),
        )
        .beats_of(owner.as_str())
        .await?;

        let like_service = LikeService::new(Arc::clone(&self.store), Arc::clone(&self.auth));
        let mut entries = Vec::new();
        for (beat_id, beat) in beats.into_iter().take(20) {
            let liker_ids = like_service.recent_likers(&beat_id, 20).await?;
            if liker_ids.is_empty() {
                continue;
            }
            let profiles = users::by_ids(&self.store, &liker_ids).await?;
            let likers = liker_ids
                .into_iter()
                .map(|uid| {
                    let (name, photo) = profiles
                        .get(&uid)
                        .map(|p| (p.username.clone(), p.photo_url.clone()))
                        .unwrap_or_default();
                    let name = if name.is_empty() { uid.clone() } else { name };
                    (uid, name, photo)
                })
                .collect();
            entries.push(LikesReceivedEntry {
                beat_id,
                title: beat.title,
                like_count: beat.like_count,
                likers,
            });
        }
        Ok(entries)
    }

    /// Beats I have liked across the whole catalogue, resolved from the
    /// like relations' parent documents. Falls back to an unordered group
    /// query while the index builds.
    pub async fn likes_given(&self) -> Result<Vec<(BeatId, Beat)>> {
        let me = require_user(&*self.auth)?;

        let ordered = Query::group("likes")
            .where_eq("userId", me.uid.as_str())
            .order_by("createdAt", Direction::Desc)
            .limit(30);
        let docs = match self.store.query(&ordered).await {
            Ok(docs) => docs,
            Err(collabbeats_backend::BackendError::MissingIndex { .. }) => {
                let fallback = Query::group("likes")
                    .where_eq("userId", me.uid.as_str())
                    .limit(30);
                self.store.query(&fallback).await?
            }
            Err(e) => return Err(e.into()),
        };

        let mut beats = Vec::new();
        for like in docs {
            let Some(parent) = like.path.collection.parent_doc() else {
                continue;
            };
            if let Some(doc) = self.store.get(&parent).await? {
                if let Ok(beat) = doc.decode::<Beat>() {
                    beats.push((BeatId::new(doc.id()), beat));
                }
            }
        }
        Ok(beats)
    }
}
