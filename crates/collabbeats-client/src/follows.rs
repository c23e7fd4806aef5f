//! Follow relations between users.
//!
//! Same counted-relation shape as likes, except a follow adjusts two
//! counters in the one transaction: the follower's `followingCount` and the
//! followee's `followersCount`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use collabbeats_backend::{
    fields_of, run_transaction, AuthGateway, BackendError, Direction, DocumentStore, Fields, Query,
};
use collabbeats_shared::constants::{FOLLOW_FETCH_LIMIT, FOLLOW_LIST_LIMIT};
use collabbeats_shared::{follow_doc_id, Follow, UserId};

use crate::error::{ClientError, Result};
use crate::paths;
use crate::session::require_user;

/// Follower/following totals for a profile header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FollowCounts {
    pub followers: i64,
    pub following: i64,
}

/// The state after a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowChange {
    pub following: bool,
    /// The followee's follower count after the change.
    pub followers_count: i64,
}

pub struct FollowService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthGateway>,
}

impl FollowService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self { store, auth }
    }

    /// Follow/unfollow a user. Both counters move with the relation
    /// document in a single transaction.
    pub async fn toggle(&self, target: &UserId) -> Result<FollowChange> {
        let me = require_user(&*self.auth)?;
        if me.uid == target.as_str() {
            return Err(ClientError::validation("You cannot follow yourself."));
        }

        let my_id = UserId::new(me.uid.clone());
        let relation = paths::follows().doc(follow_doc_id(&my_id, target));
        let me_doc = paths::users().doc(&me.uid);
        let target_doc = paths::users().doc(target.as_str());

        let follow = Follow {
            follower_id: me.uid.clone(),
            following_id: target.as_str().to_string(),
            ts: Some(Utc::now()),
        };
        let follow_fields = fields_of(&follow)?;

        let change = run_transaction(&self.store, |tx| {
            let relation = relation.clone();
            let me_doc = me_doc.clone();
            let target_doc = target_doc.clone();
            let follow_fields = follow_fields.clone();
            Box::pin(async move {
                let existing = tx.get(&relation).await?;
                let target = tx.get(&target_doc).await?.ok_or(BackendError::NotFound)?;
                let my_profile = tx.get(&me_doc).await?;

                let followers = target.i64_or("followersCount", 0);
                let following = my_profile
                    .as_ref()
                    .map(|d| d.i64_or("followingCount", 0))
                    .unwrap_or(0);

                if existing.is_some() {
                    let followers = (followers - 1).max(0);
                    tx.delete(&relation);
                    tx.merge(&target_doc, count_fields("followersCount", followers));
                    tx.merge(&me_doc, count_fields("followingCount", (following - 1).max(0)));
                    Ok(FollowChange {
                        following: false,
                        followers_count: followers,
                    })
                } else {
                    let followers = followers + 1;
                    tx.set(&relation, follow_fields);
                    tx.merge(&target_doc, count_fields("followersCount", followers));
                    tx.merge(&me_doc, count_fields("followingCount", following + 1));
                    Ok(FollowChange {
                        following: true,
                        followers_count: followers,
                    })
                }
            })
        })
        .await?;

        tracing::info!(followee = %target, following = change.following, "follow toggled");
        Ok(change)
    }

    /// Whether I follow the given user. `false` when signed out or asking
    /// about myself.
    pub async fn is_following(&self, target: &UserId) -> Result<bool> {
        let Some(me) = self.auth.current_user() else {
            return Ok(false);
        };
        if me.uid == target.as_str() {
            return Ok(false);
        }
        let my_id = UserId::new(me.uid);
        let doc = self
            .store
            .get(&paths::follows().doc(follow_doc_id(&my_id, target)))
            .await?;
        Ok(doc.is_some())
    }

    /// Totals from the denormalized counters on the profile document.
    /// A missing profile or missing counters read as zero.
    pub async fn counts_for(&self, target: &UserId) -> Result<FollowCounts> {
        let doc = self.store.get(&paths::users().doc(target.as_str())).await?;
        Ok(match doc {
            Some(d) => FollowCounts {
                followers: d.i64_or("followersCount", 0),
                following: d.i64_or("followingCount", 0),
            },
            None => FollowCounts::default(),
        })
    }

    /// Recent followers of a profile.
    pub async fn followers_of(&self, target: &UserId) -> Result<Vec<Follow>> {
        let query = Query::collection(paths::follows())
            .where_eq("followingId", target.as_str())
            .order_by("ts", Direction::Desc)
            .limit(FOLLOW_LIST_LIMIT);
        self.relation_list(query).await
    }

    /// Accounts a profile follows, most recent first.
    pub async fn following_of(&self, target: &UserId) -> Result<Vec<Follow>> {
        let query = Query::collection(paths::follows())
            .where_eq("followerId", target.as_str())
            .order_by("ts", Direction::Desc)
            .limit(FOLLOW_LIST_LIMIT);
        self.relation_list(query).await
    }

    /// The set of uids I follow, for the explore "following only" filter.
    /// Errors degrade to an empty set so the feed still renders.
    pub async fn following_ids(&self) -> HashSet<String> {
        let Some(me) = self.auth.current_user() else {
            return HashSet::new();
        };
        let query = Query::collection(paths::follows())
            .where_eq("followerId", me.uid)
            .order_by("ts", Direction::Desc)
            .limit(FOLLOW_FETCH_LIMIT);
        match self.store.query(&query).await {
            Ok(docs) => docs
                .iter()
                .filter_map(|d| d.text("followingId").map(str::to_string))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "following lookup failed, filter disabled");
                HashSet::new()
            }
        }
    }

    async fn relation_list(&self, query: Query) -> Result<Vec<Follow>> {
        let docs = self.store.query(&query).await?;
        let mut follows = Vec::with_capacity(docs.len());
        for doc in &docs {
            follows.push(doc.decode::<Follow>().map_err(BackendError::from)?);
        }
        Ok(follows)
    }
}

fn count_fields(field: &str, value: i64) -> Fields {
    let mut fields = Fields::new();
    fields.insert(field.to_string(), json!(value));
    fields
}
