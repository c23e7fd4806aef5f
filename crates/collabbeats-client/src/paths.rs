//! Collection layout of the external store, in one place.

use collabbeats_backend::CollectionPath;
use collabbeats_shared::{BeatId, RoomId, ThreadId};

pub fn users() -> CollectionPath {
    CollectionPath::new("users")
}

/// Username reservations, keyed by the lowercased username.
pub fn usernames() -> CollectionPath {
    CollectionPath::new("usernames")
}

pub fn beats() -> CollectionPath {
    CollectionPath::new("beats")
}

pub fn beat_likes(beat: &BeatId) -> CollectionPath {
    beats().child(beat.as_str(), "likes")
}

pub fn beat_comments(beat: &BeatId) -> CollectionPath {
    beats().child(beat.as_str(), "comments")
}

pub fn follows() -> CollectionPath {
    CollectionPath::new("follows")
}

pub fn dms() -> CollectionPath {
    CollectionPath::new("dms")
}

pub fn dm_messages(thread: &ThreadId) -> CollectionPath {
    dms().child(thread.as_str(), "messages")
}

pub fn chat_rooms() -> CollectionPath {
    CollectionPath::new("chatRooms")
}

pub fn room_messages(room: &RoomId) -> CollectionPath {
    chat_rooms().child(room.as_str(), "messages")
}
