//! Comments on beats: a child collection plus a denormalized count on the
//! parent, adjusted in the same transaction as every insert/delete.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use collabbeats_backend::{
    fields_of, run_transaction, AuthGateway, BackendError, Direction, Doc, DocumentStore, Fields,
    Query, QueryWatch,
};
use collabbeats_shared::constants::{COMMENT_MAX_LEN, COMMENT_PAGE_LIMIT};
use collabbeats_shared::{BeatId, Comment, CommentId, UserProfile};

use crate::error::{ClientError, Result};
use crate::paths;
use crate::session::{fallback_username, require_user};
use crate::views::comments::CommentRow;

pub struct CommentService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthGateway>,
}

impl CommentService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self { store, auth }
    }

    /// Post a comment. The comment document and the `commentCount` bump are
    /// one transaction; a parent beat without the counter field counts from
    /// zero.
    pub async fn post(&self, beat: &BeatId, text: &str) -> Result<CommentId> {
        let me = require_user(&*self.auth)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::validation("Write a comment first."));
        }
        if text.chars().count() > COMMENT_MAX_LEN {
            return Err(ClientError::validation("Comment is too long."));
        }

        // username snapshot, resolved once before the transaction
        let username = match self.store.get(&paths::users().doc(&me.uid)).await? {
            Some(doc) => match doc.decode::<UserProfile>() {
                Ok(p) if !p.username.is_empty() => p.username,
                _ => fallback_username(&me),
            },
            None => fallback_username(&me),
        };

        let beat_path = paths::beats().doc(beat.as_str());
        let comment_path = paths::beat_comments(beat).doc(Uuid::new_v4().to_string());
        let comment = Comment {
            user_id: me.uid.clone(),
            username,
            text: text.to_string(),
            created_at: Some(Utc::now()),
        };
        let comment_fields = fields_of(&comment)?;

        run_transaction(&self.store, |tx| {
            let beat_path = beat_path.clone();
            let comment_path = comment_path.clone();
            let comment_fields = comment_fields.clone();
            Box::pin(async move {
                let beat_doc = tx.get(&beat_path).await?.ok_or(BackendError::NotFound)?;
                let count = beat_doc.i64_or("commentCount", 0);
                tx.set(&comment_path, comment_fields);
                tx.merge(&beat_path, count_fields(count + 1));
                Ok(())
            })
        })
        .await?;

        tracing::info!(beat = %beat, "comment posted");
        Ok(CommentId::new(comment_path.id))
    }

    /// Delete a comment. Allowed to the comment author and to the beat
    /// owner; the count decrement is floored at 0.
    pub async fn delete(&self, beat: &BeatId, comment: &CommentId) -> Result<()> {
        let me = require_user(&*self.auth)?;

        let beat_path = paths::beats().doc(beat.as_str());
        let comment_path = paths::beat_comments(beat).doc(comment.as_str());

        run_transaction(&self.store, |tx| {
            let me_uid = me.uid.clone();
            let beat_path = beat_path.clone();
            let comment_path = comment_path.clone();
            Box::pin(async move {
                let beat_doc = tx.get(&beat_path).await?.ok_or(BackendError::NotFound)?;
                let comment_doc = tx.get(&comment_path).await?.ok_or(BackendError::NotFound)?;

                let author = comment_doc.text("userId").unwrap_or_default();
                let owner = beat_doc.text("userId").unwrap_or_default();
                if me_uid != author && me_uid != owner {
                    return Err(BackendError::PermissionDenied(
                        "only the author or the beat owner can delete a comment".into(),
                    ));
                }

                let count = beat_doc.i64_or("commentCount", 0);
                tx.delete(&comment_path);
                tx.merge(&beat_path, count_fields((count - 1).max(0)));
                Ok(())
            })
        })
        .await?;

        tracing::info!(beat = %beat, comment = %comment, "comment deleted");
        Ok(())
    }

    /// The live query a comments view subscribes to: oldest first, bounded.
    pub fn feed_query(beat: &BeatId) -> Query {
        Query::collection(paths::beat_comments(beat))
            .order_by("createdAt", Direction::Asc)
            .limit(COMMENT_PAGE_LIMIT)
    }

    /// One-shot subscription handle for callers not using a
    /// [`crate::SubscriptionSlot`].
    pub async fn watch(&self, beat: &BeatId) -> Result<QueryWatch> {
        Ok(self.store.watch(&Self::feed_query(beat)).await?)
    }

    /// Build renderable rows from a feed snapshot, computing the delete
    /// affordance for the current viewer.
    pub fn rows(docs: &[Doc], viewer: Option<&str>, beat_owner: Option<&str>) -> Vec<CommentRow> {
        docs.iter()
            .filter_map(|doc| {
                let comment = doc.decode::<Comment>().ok()?;
                Some(CommentRow {
                    id: doc.id().to_string(),
                    author_uid: comment.user_id.clone(),
                    author_name: if comment.username.is_empty() {
                        comment.user_id.clone()
                    } else {
                        comment.username.clone()
                    },
                    text: comment.text.clone(),
                    created_at: comment.created_at,
                    can_delete: comment.can_delete(viewer, beat_owner),
                })
            })
            .collect()
    }
}

fn count_fields(value: i64) -> Fields {
    let mut fields = Fields::new();
    fields.insert("commentCount".to_string(), json!(value));
    fields
}
