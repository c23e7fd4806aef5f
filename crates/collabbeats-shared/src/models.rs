//! Domain model structs mirroring the documents held by the external store.
//!
//! Field names follow the wire spelling of the original collections
//! (`likeCount`, `photoURL`, `audioURL`, …). Counters default to zero so a
//! legacy document missing a counter field decodes cleanly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Visibility of a beat or chat room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user profile document (`users/{uid}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(rename = "usernameLower", default, skip_serializing_if = "Option::is_none")]
    pub username_lower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    /// Collaboration tags ("looking for" set), drawn from
    /// [`crate::constants::LOOKING_FOR_OPTIONS`].
    #[serde(rename = "lookingFor", default)]
    pub looking_for: Vec<String>,
    /// Denormalized counter, kept consistent with `follows` relation docs.
    #[serde(rename = "followersCount", default)]
    pub followers_count: i64,
    #[serde(rename = "followingCount", default)]
    pub following_count: i64,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Beat
// ---------------------------------------------------------------------------

/// An uploaded track (`beats/{beatId}`).
///
/// `audio_url`/`cover_url` are the current fields; `download_url`,
/// `storage_path` and `cover_path` survive from older uploads and are only
/// read as fallbacks when resolving playable URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Beat {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(rename = "audioURL", default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(rename = "coverURL", default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(rename = "downloadURL", default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(rename = "storagePath", default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(rename = "coverPath", default, skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
    /// Denormalized cache of `beats/{id}/likes` size; mutated only inside the
    /// same transaction as the relation document.
    #[serde(rename = "likeCount", default)]
    pub like_count: i64,
    #[serde(rename = "commentCount", default)]
    pub comment_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Beat {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

// ---------------------------------------------------------------------------
// Like / Follow
// ---------------------------------------------------------------------------

/// A like relation (`beats/{beatId}/likes/{uid}`). Existence encodes "liked".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A follow relation (`follows/{follower}_{followee}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Follow {
    #[serde(rename = "followerId")]
    pub follower_id: String,
    #[serde(rename = "followingId")]
    pub following_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A comment on a beat (`beats/{beatId}/comments/{commentId}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Username snapshot taken at post time, so rendering does not require a
    /// user lookup per row.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// A comment can be deleted by its author or by the owner of the beat.
    pub fn can_delete(&self, viewer: Option<&str>, beat_owner: Option<&str>) -> bool {
        match viewer {
            Some(me) => self.user_id == me || beat_owner == Some(me),
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Chat rooms
// ---------------------------------------------------------------------------

/// A chat room (`chatRooms/{roomId}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatRoom {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privacy: Visibility,
    #[serde(rename = "membersCount", default)]
    pub members_count: i64,
    #[serde(rename = "coverUrl", default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "lastMessageAt", default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
}

impl ChatRoom {
    /// Most recent activity timestamp, preferring the last message.
    pub fn last_active(&self) -> Option<DateTime<Utc>> {
        self.last_message_at.or(self.updated_at).or(self.created_at)
    }
}

/// A room message (`chatRooms/{roomId}/messages/{msgId}`): text or a GIF.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "gifUrl", default, skip_serializing_if = "Option::is_none")]
    pub gif_url: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Direct messages
// ---------------------------------------------------------------------------

/// A direct-message thread (`dms/{threadId}`), keyed by the sorted pair of
/// participant uids. Holds the inbox preview and per-participant read marks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DmThread {
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "lastMessageAt", default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
    /// Truncated preview of the last message (see
    /// [`crate::constants::DM_PREVIEW_MAX_LEN`]).
    #[serde(rename = "lastText", default, skip_serializing_if = "Option::is_none")]
    pub last_text: Option<String>,
    /// Per-participant read timestamps, merged in on open/send.
    #[serde(default)]
    pub read: BTreeMap<String, DateTime<Utc>>,
}

impl DmThread {
    /// The uid of the participant that is not `me`.
    pub fn other_participant(&self, me: &str) -> Option<&str> {
        self.participants
            .iter()
            .map(String::as_str)
            .find(|p| *p != me)
    }

    /// Unread for `me` if a message exists and my read mark is absent or
    /// older than it.
    pub fn is_unread(&self, me: &str) -> bool {
        match self.last_message_at {
            None => false,
            Some(last) => match self.read.get(me) {
                None => true,
                Some(mine) => *mine < last,
            },
        }
    }
}

/// A direct message (`dms/{threadId}/messages/{msgId}`): text or a GIF.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DmMessage {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "gifUrl", default, skip_serializing_if = "Option::is_none")]
    pub gif_url: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
