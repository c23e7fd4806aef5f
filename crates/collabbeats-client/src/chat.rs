//! Genre chat rooms: the lobby (live room list with built-in fallback) and
//! per-room message feeds.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use collabbeats_backend::{
    fields_of, AuthGateway, Direction, Doc, DocumentStore, Fields, Query,
};
use collabbeats_shared::constants::{CHAT_PAGE_LIMIT, DEFAULT_ROOMS, LOBBY_LIMIT};
use collabbeats_shared::{ChatMessage, ChatRoom, RoomId, UserProfile};

use crate::error::{ClientError, Result};
use crate::paths;
use crate::session::{fallback_username, require_user};
use crate::views::rooms::RoomCard;

/// Lobby sort modes; each uses exactly one order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LobbySort {
    #[default]
    Name,
    Active,
    Newest,
}

/// The username/photo snapshot stamped onto every message I send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAuthor {
    pub username: String,
    pub photo_url: String,
}

pub struct ChatService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthGateway>,
}

impl ChatService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self { store, auth }
    }

    /// The live query behind the lobby.
    pub fn lobby_query(sort: LobbySort) -> Query {
        let base = Query::collection(paths::chat_rooms()).where_eq("privacy", "public");
        match sort {
            LobbySort::Name => base.order_by("name", Direction::Asc).limit(LOBBY_LIMIT),
            LobbySort::Active => base
                .order_by("lastMessageAt", Direction::Desc)
                .limit(LOBBY_LIMIT),
            LobbySort::Newest => base
                .order_by("createdAt", Direction::Desc)
                .limit(LOBBY_LIMIT),
        }
    }

    /// Turn a lobby snapshot into cards, substituting the built-in rooms
    /// when the store has none. Also the fallback when the subscription
    /// itself fails.
    pub fn rooms_or_default(docs: &[Doc]) -> Vec<RoomCard> {
        let cards: Vec<RoomCard> = docs
            .iter()
            .filter_map(|doc| {
                let room = doc.decode::<ChatRoom>().ok()?;
                Some(RoomCard::from_room(doc.id(), &room))
            })
            .collect();
        if cards.is_empty() {
            Self::default_rooms()
        } else {
            cards
        }
    }

    pub fn default_rooms() -> Vec<RoomCard> {
        DEFAULT_ROOMS.iter().map(RoomCard::from_default).collect()
    }

    /// Client-side lobby search over name + description.
    pub fn filter_rooms(cards: Vec<RoomCard>, term: &str) -> Vec<RoomCard> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return cards;
        }
        cards
            .into_iter()
            .filter(|c| {
                format!("{} {}", c.name.to_lowercase(), c.description.to_lowercase())
                    .contains(&term)
            })
            .collect()
    }

    /// The live query a room's message pane subscribes to.
    pub fn messages_query(room: &RoomId) -> Query {
        Query::collection(paths::room_messages(room))
            .order_by("createdAt", Direction::Asc)
            .limit(CHAT_PAGE_LIMIT)
    }

    /// Bump the room's activity key so the lobby's "active" sort notices.
    /// Best-effort: failures are logged, not surfaced.
    pub async fn touch_room(&self, room: &RoomId) {
        let mut fields = Fields::new();
        fields.insert(
            "lastMessageAt".to_string(),
            json!(Utc::now().to_rfc3339()),
        );
        if let Err(e) = self
            .store
            .merge(&paths::chat_rooms().doc(room.as_str()), fields)
            .await
        {
            tracing::warn!(room = %room, error = %e, "room activity bump failed");
        }
    }

    /// My username/photo snapshot for message authorship: profile document
    /// first, then auth fallbacks.
    pub async fn author_info(&self) -> Result<MessageAuthor> {
        let me = require_user(&*self.auth)?;
        let profile = match self.store.get(&paths::users().doc(&me.uid)).await {
            Ok(Some(doc)) => doc.decode::<UserProfile>().ok(),
            _ => None,
        };
        let (username, photo_url) = match profile {
            Some(p) => (
                if p.username.is_empty() {
                    fallback_username(&me)
                } else {
                    p.username
                },
                p.photo_url,
            ),
            None => (fallback_username(&me), String::new()),
        };
        Ok(MessageAuthor {
            username,
            photo_url,
        })
    }

    pub async fn send_text(&self, room: &RoomId, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::validation("Message is empty."));
        }
        self.send(room, Some(text.to_string()), None).await
    }

    pub async fn send_gif(&self, room: &RoomId, gif_url: &str) -> Result<()> {
        if gif_url.is_empty() {
            return Err(ClientError::validation("Missing GIF."));
        }
        self.send(room, None, Some(gif_url.to_string())).await
    }

    async fn send(
        &self,
        room: &RoomId,
        text: Option<String>,
        gif_url: Option<String>,
    ) -> Result<()> {
        let me = require_user(&*self.auth)?;
        let author = self.author_info().await?;

        let message = ChatMessage {
            user_id: me.uid,
            username: author.username,
            photo_url: author.photo_url,
            text,
            gif_url,
            created_at: Some(Utc::now()),
        };
        self.store
            .add(&paths::room_messages(room), fields_of(&message)?)
            .await?;

        self.touch_room(room).await;
        Ok(())
    }
}
