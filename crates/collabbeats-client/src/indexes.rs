//! Composite indexes the application's queries depend on.
//!
//! The deployment provisions these on the hosted backend; the in-memory
//! backend registers them via [`crate::App::in_memory`]. Queries written
//! with a fallback path (leaderboard, inbox, likes-given) still work while
//! an index is building.

/// One provisioned composite index.
#[derive(Debug, Clone, Copy)]
pub struct CompositeIndex {
    /// Collection-group name.
    pub group: &'static str,
    pub fields: &'static [&'static str],
}

/// Every composite index the client's queries can use.
pub const REQUIRED_INDEXES: &[CompositeIndex] = &[
    CompositeIndex {
        group: "beats",
        fields: &["visibility", "timestamp"],
    },
    CompositeIndex {
        group: "beats",
        fields: &["visibility", "genre", "timestamp"],
    },
    CompositeIndex {
        group: "beats",
        fields: &["userId", "visibility", "timestamp"],
    },
    CompositeIndex {
        group: "chatRooms",
        fields: &["privacy", "name"],
    },
    CompositeIndex {
        group: "chatRooms",
        fields: &["privacy", "lastMessageAt"],
    },
    CompositeIndex {
        group: "chatRooms",
        fields: &["privacy", "createdAt"],
    },
    CompositeIndex {
        group: "dms",
        fields: &["participants", "lastMessageAt"],
    },
    CompositeIndex {
        group: "follows",
        fields: &["followerId", "ts"],
    },
    CompositeIndex {
        group: "follows",
        fields: &["followingId", "ts"],
    },
    CompositeIndex {
        group: "likes",
        fields: &["userId", "createdAt"],
    },
];
