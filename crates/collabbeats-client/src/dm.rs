//! Direct messages: sorted-pair threads, the conversation feed, and the
//! inbox with unread tracking.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use collabbeats_backend::{
    fields_of, run_transaction, AuthGateway, BackendError, Direction, DocumentStore, Fields,
    Query,
};
use collabbeats_shared::constants::{DM_PAGE_LIMIT, DM_PREVIEW_MAX_LEN, INBOX_LIMIT};
use collabbeats_shared::{DmMessage, DmThread, ThreadId, UserId};

use crate::error::{ClientError, Result};
use crate::paths;
use crate::session::require_user;
use crate::users;
use crate::views::inbox::InboxEntry;

/// An open conversation: the thread id plus the query its message feed
/// subscribes to.
#[derive(Debug, Clone)]
pub struct DmConversation {
    pub thread: ThreadId,
    pub messages: Query,
}

pub struct DmService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthGateway>,
}

impl DmService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self { store, auth }
    }

    /// Create the thread document if it does not exist yet.
    ///
    /// Runs as a transaction so two participants opening the conversation
    /// for the first time concurrently end up with exactly one document,
    /// under the sorted-pair id both of them derive.
    pub async fn ensure_thread(&self, other: &UserId) -> Result<ThreadId> {
        let me = require_user(&*self.auth)?;
        if me.uid == other.as_str() {
            return Err(ClientError::validation("You cannot message yourself."));
        }

        let my_id = UserId::new(me.uid.clone());
        let thread = ThreadId::between(&my_id, other);
        let thread_path = paths::dms().doc(thread.as_str());

        let fresh = DmThread {
            participants: ThreadId::participants(&my_id, other),
            created_at: Some(Utc::now()),
            ..Default::default()
        };
        let fresh_fields = fields_of(&fresh)?;

        run_transaction(&self.store, |tx| {
            let thread_path = thread_path.clone();
            let fresh_fields = fresh_fields.clone();
            Box::pin(async move {
                if tx.get(&thread_path).await?.is_none() {
                    tx.set(&thread_path, fresh_fields);
                }
                // an existing thread is left untouched
                Ok(())
            })
        })
        .await?;

        self.mark_read(&thread).await?;
        Ok(thread)
    }

    /// Open (and if needed create) the conversation with another user.
    pub async fn open(&self, other: &UserId) -> Result<DmConversation> {
        let thread = self.ensure_thread(other).await?;
        Ok(DmConversation {
            messages: Self::messages_query(&thread),
            thread,
        })
    }

    /// The live query a conversation view subscribes to.
    pub fn messages_query(thread: &ThreadId) -> Query {
        Query::collection(paths::dm_messages(thread))
            .order_by("createdAt", Direction::Asc)
            .limit(DM_PAGE_LIMIT)
    }

    /// Send a text message and refresh the thread's inbox metadata
    /// (ordering key, preview, my read mark).
    pub async fn send_text(&self, thread: &ThreadId, text: &str) -> Result<()> {
        let me = require_user(&*self.auth)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::validation("Message is empty."));
        }

        let now = Utc::now();
        let message = DmMessage {
            user_id: me.uid.clone(),
            text: Some(text.to_string()),
            gif_url: None,
            created_at: Some(now),
        };
        self.store
            .add(&paths::dm_messages(thread), fields_of(&message)?)
            .await?;

        let preview: String = text.chars().take(DM_PREVIEW_MAX_LEN).collect();
        let mut meta = Fields::new();
        meta.insert("lastMessageAt".to_string(), json!(now.to_rfc3339()));
        meta.insert("lastText".to_string(), json!(preview));
        meta.insert("read".to_string(), json!({ (me.uid.clone()): now.to_rfc3339() }));
        self.store
            .merge(&paths::dms().doc(thread.as_str()), meta)
            .await?;
        Ok(())
    }

    /// Send a GIF. Bumps the ordering key and my read mark; the text
    /// preview is left as-is.
    pub async fn send_gif(&self, thread: &ThreadId, gif_url: &str) -> Result<()> {
        let me = require_user(&*self.auth)?;
        if gif_url.is_empty() {
            return Err(ClientError::validation("Missing GIF."));
        }

        let now = Utc::now();
        let message = DmMessage {
            user_id: me.uid.clone(),
            text: None,
            gif_url: Some(gif_url.to_string()),
            created_at: Some(now),
        };
        self.store
            .add(&paths::dm_messages(thread), fields_of(&message)?)
            .await?;

        let mut meta = Fields::new();
        meta.insert("lastMessageAt".to_string(), json!(now.to_rfc3339()));
        meta.insert("read".to_string(), json!({ (me.uid.clone()): now.to_rfc3339() }));
        self.store
            .merge(&paths::dms().doc(thread.as_str()), meta)
            .await?;
        Ok(())
    }

    /// Merge my read timestamp into the thread.
    pub async fn mark_read(&self, thread: &ThreadId) -> Result<()> {
        let me = require_user(&*self.auth)?;
        let mut fields = Fields::new();
        fields.insert(
            "read".to_string(),
            json!({ (me.uid.clone()): Utc::now().to_rfc3339() }),
        );
        self.store
            .merge(&paths::dms().doc(thread.as_str()), fields)
            .await?;
        Ok(())
    }

    /// My conversations, most recently active first, joined against the
    /// other participants' profiles. Falls back to an unordered fetch
    /// while the index builds.
    pub async fn inbox(&self) -> Result<Vec<InboxEntry>> {
        let me = require_user(&*self.auth)?;

        let ordered = Query::collection(paths::dms())
            .array_contains("participants", me.uid.as_str())
            .order_by("lastMessageAt", Direction::Desc)
            .limit(INBOX_LIMIT);
        let docs = match self.store.query(&ordered).await {
            Ok(docs) => docs,
            Err(BackendError::MissingIndex { .. }) => {
                let fallback = Query::collection(paths::dms())
                    .array_contains("participants", me.uid.as_str())
                    .limit(INBOX_LIMIT);
                self.store.query(&fallback).await?
            }
            Err(e) => return Err(e.into()),
        };

        let threads: Vec<DmThread> = docs
            .iter()
            .filter_map(|d| d.decode::<DmThread>().ok())
            .collect();

        let others: Vec<String> = threads
            .iter()
            .filter_map(|t| t.other_participant(&me.uid).map(str::to_string))
            .collect();
        let profiles = users::by_ids(&self.store, &others).await?;

        Ok(threads
            .iter()
            .filter_map(|thread| {
                let other = thread.other_participant(&me.uid)?.to_string();
                let profile = profiles.get(&other);
                let name = profile
                    .map(|p| p.username.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| other.clone());
                Some(InboxEntry {
                    other_uid: other,
                    other_name: name,
                    other_photo: profile.map(|p| p.photo_url.clone()).unwrap_or_default(),
                    last_text: thread
                        .last_text
                        .clone()
                        .unwrap_or_else(|| "Start the conversation".to_string()),
                    last_at: thread.last_message_at.or(thread.created_at),
                    unread: thread.is_unread(&me.uid),
                })
            })
            .collect())
    }
}
