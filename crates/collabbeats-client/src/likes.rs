//! Like toggling and lookups.

use std::sync::Arc;

use chrono::Utc;

use collabbeats_backend::{
    fields_of, AuthGateway, Direction, DocumentStore, Query,
};
use collabbeats_shared::{BeatId, Like};

use crate::error::Result;
use crate::paths;
use crate::relation::{self, CountedRelation, ToggleOutcome};
use crate::session::require_user;

pub struct LikeService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthGateway>,
}

impl LikeService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self { store, auth }
    }

    /// Flip my like on a beat and return the new state + counter for the
    /// button and badge.
    pub async fn toggle(&self, beat: &BeatId) -> Result<ToggleOutcome> {
        let me = require_user(&*self.auth)?;

        let spec = CountedRelation {
            relation: paths::beat_likes(beat).doc(&me.uid),
            target: paths::beats().doc(beat.as_str()),
            counter_field: "likeCount",
        };
        let like = Like {
            user_id: me.uid.clone(),
            created_at: Some(Utc::now()),
        };

        let outcome = relation::toggle(&self.store, &spec, fields_of(&like)?).await?;
        tracing::info!(beat = %beat, liked = outcome.engaged, count = outcome.count, "like toggled");
        Ok(outcome)
    }

    /// Whether I have liked this beat. `false` when signed out.
    pub async fn state(&self, beat: &BeatId) -> Result<bool> {
        let Some(me) = self.auth.current_user() else {
            return Ok(false);
        };
        let doc = self
            .store
            .get(&paths::beat_likes(beat).doc(&me.uid))
            .await?;
        Ok(doc.is_some())
    }

    /// The uids of the most recent likers of a beat.
    pub async fn recent_likers(&self, beat: &BeatId, limit: usize) -> Result<Vec<String>> {
        let query = Query::collection(paths::beat_likes(beat))
            .order_by("createdAt", Direction::Desc)
            .limit(limit);
        let docs = self.store.query(&query).await?;
        Ok(docs.into_iter().map(|d| d.id().to_string()).collect())
    }
}
