//! Identifier newtypes.
//!
//! All identities are opaque strings handed out by the backend (auth uids,
//! auto-generated document ids). The newtypes exist so a beat id cannot be
//! passed where a user id is expected, and so composite identifiers (thread
//! ids, follow ids) are derived in exactly one place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used for direct-message thread ids. Backend identities never
/// contain it, so a thread id can never collide with a single identity.
pub const THREAD_ID_SEPARATOR: &str = "__";

/// Separator used for follow relation ids.
pub const FOLLOW_ID_SEPARATOR: &str = "_";

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// An authenticated identity (backend auth uid).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BeatId
// ---------------------------------------------------------------------------

/// An uploaded track document id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BeatId(pub String);

impl BeatId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RoomId
// ---------------------------------------------------------------------------

/// A chat room document id (a short slug such as `rap` or `edm`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CommentId / MessageId
// ---------------------------------------------------------------------------

/// A comment document id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat or direct message document id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ThreadId
// ---------------------------------------------------------------------------

/// A direct-message thread id: the sorted pair of participant uids joined
/// with [`THREAD_ID_SEPARATOR`].
///
/// Both participants derive the same id independently, regardless of who
/// opens the conversation first. Callers must reject self-pairing before
/// deriving a thread id; this function does not guard against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn between(a: &UserId, b: &UserId) -> Self {
        let mut pair = [a.as_str(), b.as_str()];
        pair.sort_unstable();
        Self(pair.join(THREAD_ID_SEPARATOR))
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical (sorted) participant array for a new thread document.
    pub fn participants(a: &UserId, b: &UserId) -> Vec<String> {
        let mut pair = vec![a.as_str().to_string(), b.as_str().to_string()];
        pair.sort_unstable();
        pair
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Follow relation document id: `{follower}_{followee}`.
///
/// Directional, unlike thread ids: `a_b` and `b_a` are distinct relations.
pub fn follow_doc_id(follower: &UserId, followee: &UserId) -> String {
    format!(
        "{}{}{}",
        follower.as_str(),
        FOLLOW_ID_SEPARATOR,
        followee.as_str()
    )
}
