//! Beat cards (explore grid) and beat rows (profile / leaderboard lists).

use chrono::{DateTime, Utc};

use collabbeats_shared::{Beat, BeatId};

use super::esc;
use super::fmt;

/// Everything an explore card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatCard {
    pub id: String,
    pub owner_uid: String,
    pub title: String,
    pub genre: String,
    pub when: Option<DateTime<Utc>>,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

impl BeatCard {
    pub fn from_beat(id: &BeatId, beat: &Beat) -> Self {
        Self {
            id: id.as_str().to_string(),
            owner_uid: beat.user_id.clone(),
            title: if beat.title.is_empty() {
                "Untitled".to_string()
            } else {
                beat.title.clone()
            },
            genre: if beat.genre.is_empty() {
                "Uncategorised".to_string()
            } else {
                beat.genre.clone()
            },
            when: beat.timestamp,
            audio_url: beat.audio_url.clone(),
            cover_url: beat.cover_url.clone(),
            like_count: beat.like_count,
            comment_count: beat.comment_count,
        }
    }
}

/// The explore grid card.
pub fn track_card_html(card: &BeatCard) -> String {
    let title = esc(&card.title);
    let genre = esc(&card.genre);
    let when = card.when.map(fmt::stamp).unwrap_or_default();
    let cover = card
        .cover_url
        .as_deref()
        .map(|url| format!("<img src=\"{}\" alt=\"\">", esc(url)))
        .unwrap_or_default();
    let audio = card
        .audio_url
        .as_deref()
        .map(|url| format!("<audio controls preload=\"none\" src=\"{}\"></audio>", esc(url)))
        .unwrap_or_default();

    format!(
        "<div class=\"track-card\">\
<div class=\"track-cover\">{cover}</div>\
<div class=\"track-body\">\
<div class=\"track-title-row\">\
<div class=\"track-title\" title=\"{title}\">{title}</div>\
<span class=\"badge\">{genre}</span>\
</div>\
<div class=\"track-meta\">{when}</div>\
{audio}\
<div class=\"track-cta\">\
<button class=\"pill like-btn\" data-id=\"{id}\" aria-label=\"Like\"><span>&#10084;</span> <span>{likes}</span></button>\
<button class=\"pill cmt-btn\" data-id=\"{id}\" aria-label=\"Comments\"><span>&#128172;</span> <span data-cmt-count=\"{id}\">{comments}</span></button>\
<a class=\"pill\" href=\"profile.html?uid={owner}\">Profile</a>\
</div>\
</div>\
</div>",
        id = esc(&card.id),
        owner = esc(&card.owner_uid),
        likes = card.like_count,
        comments = card.comment_count,
    )
}

/// Per-viewer state for a profile row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowState {
    pub liked: bool,
    pub is_owner: bool,
}

/// The profile-page row, with like/comment/delete affordances.
pub fn track_row_html(card: &BeatCard, state: RowState) -> String {
    let art = card
        .cover_url
        .as_deref()
        .map(|url| format!("<img class=\"track-art\" src=\"{}\" alt=\"\">", esc(url)))
        .unwrap_or_else(|| {
            "<div class=\"track-art\" style=\"background:#eef1f4\"></div>".to_string()
        });
    let audio = card
        .audio_url
        .as_deref()
        .map(|url| format!("<audio controls src=\"{}\" preload=\"none\"></audio>", esc(url)))
        .unwrap_or_default();
    let like_label = if state.liked {
        "&#9829; Liked"
    } else {
        "&#9825; Like"
    };
    let like_class = if state.liked {
        "btn btn-like liked"
    } else {
        "btn btn-like"
    };
    let download = card
        .audio_url
        .as_deref()
        .map(|url| format!("<a class=\"pill\" href=\"{}\" download>Download</a>", esc(url)))
        .unwrap_or_default();
    let delete = if state.is_owner {
        format!(
            "<button class=\"btn btn-ghost danger\" data-del=\"{}\" type=\"button\">Delete</button>",
            esc(&card.id)
        )
    } else {
        String::new()
    };

    format!(
        "<article class=\"track-row\" data-id=\"{id}\">\
{art}\
<div class=\"track-main\">\
<div class=\"track-title\"><span>{title}</span></div>\
<div class=\"track-sub\">{genre}</div>\
{audio}\
</div>\
<div class=\"track-actions\">\
<div class=\"actions-row\">\
<button class=\"{like_class}\" data-like=\"{id}\">{like_label}</button>\
<button class=\"pill cmt-btn\" data-cmt=\"{id}\">&#128172; <span data-cmt-count=\"{id}\">{comments}</span></button>\
{download}\
{delete}\
</div>\
<div class=\"track-sub\" data-like-count=\"{id}\">{likes} likes</div>\
</div>\
</article>",
        id = esc(&card.id),
        title = esc(&card.title),
        genre = esc(&card.genre),
        likes = card.like_count,
        comments = card.comment_count,
    )
}

/// A leaderboard row with resolved media URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderRow {
    pub id: String,
    pub owner_uid: String,
    pub title: String,
    pub genre: String,
    pub like_count: i64,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
}

impl LeaderRow {
    pub fn from_beat(
        id: &BeatId,
        beat: &Beat,
        audio_url: Option<String>,
        cover_url: Option<String>,
    ) -> Self {
        Self {
            id: id.as_str().to_string(),
            owner_uid: beat.user_id.clone(),
            title: if beat.title.is_empty() {
                "Untitled".to_string()
            } else {
                beat.title.clone()
            },
            genre: beat.genre.clone(),
            like_count: beat.like_count,
            audio_url,
            cover_url,
        }
    }
}

pub fn leader_row_html(row: &LeaderRow) -> String {
    let art = row
        .cover_url
        .as_deref()
        .unwrap_or("https://dummyimage.com/300x300/e5e7eb/9ca3af.png&text=Beat");
    let audio = row
        .audio_url
        .as_deref()
        .map(|url| {
            format!(
                "<audio controls src=\"{}\" preload=\"none\" style=\"margin-top:6px\"></audio>",
                esc(url)
            )
        })
        .unwrap_or_default();
    let download = row
        .audio_url
        .as_deref()
        .map(|url| format!("<a class=\"pill\" href=\"{}\" download>Download</a>", esc(url)))
        .unwrap_or_default();

    format!(
        "<article class=\"track-row\">\
<img class=\"track-art\" src=\"{art}\" alt=\"\">\
<div class=\"track-main\">\
<div class=\"track-title\"><span>{title}</span></div>\
<div class=\"track-sub\">{genre}</div>\
{audio}\
</div>\
<div class=\"track-actions\">\
<div class=\"track-sub\">{likes} likes</div>\
<a class=\"pill\" href=\"profile.html?uid={owner}\">Artist</a>\
{download}\
</div>\
</article>",
        art = esc(art),
        title = esc(&row.title),
        genre = esc(&row.genre),
        likes = row.like_count,
        owner = esc(&row.owner_uid),
    )
}
