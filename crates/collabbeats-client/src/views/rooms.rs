//! Lobby room cards.

use chrono::{DateTime, Utc};

use collabbeats_shared::constants::DefaultRoom;
use collabbeats_shared::ChatRoom;

use super::esc;
use super::fmt;

/// One lobby card.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members_count: i64,
    pub cover_url: String,
    pub last_active: Option<DateTime<Utc>>,
}

impl RoomCard {
    pub fn from_room(id: &str, room: &ChatRoom) -> Self {
        Self {
            id: id.to_string(),
            name: if room.name.is_empty() {
                id.to_string()
            } else {
                room.name.clone()
            },
            description: room.description.clone(),
            members_count: room.members_count,
            cover_url: room
                .cover_url
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("img/rooms/{id}.jpg")),
            last_active: room.last_active(),
        }
    }

    pub fn from_default(room: &DefaultRoom) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name.to_string(),
            description: room.description.to_string(),
            members_count: 0,
            cover_url: room.cover_url.to_string(),
            last_active: None,
        }
    }
}

pub fn room_card_html(card: &RoomCard, now: DateTime<Utc>) -> String {
    let members = match card.members_count {
        1 => "1 member".to_string(),
        n => format!("{n} members"),
    };

    format!(
        "<a class=\"room-card\" href=\"chat-room.html?room={id}\" title=\"{name}\" style=\"--cover:url('{cover}')\">\
<div class=\"room-title\">{name}</div>\
<div class=\"room-desc\">{desc}</div>\
<div class=\"room-meta\"><span>{members}</span><span>&bull;</span><span>active {active}</span></div>\
</a>",
        id = esc(&card.id),
        name = esc(&card.name),
        cover = esc(&card.cover_url),
        desc = esc(&card.description),
        active = esc(&fmt::from_now(card.last_active, now)),
    )
}

/// The lobby grid; zero cards renders the designated empty state.
pub fn room_list_html(cards: &[RoomCard], now: DateTime<Utc>) -> String {
    if cards.is_empty() {
        return "<div class=\"muted center\">No rooms match your search.</div>".to_string();
    }
    cards.iter().map(|c| room_card_html(c, now)).collect()
}
