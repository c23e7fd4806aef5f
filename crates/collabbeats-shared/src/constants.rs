//! Application constants: taxonomies, built-in rooms, and page limits.

/// Application name.
pub const APP_NAME: &str = "CollabBeats";

/// Genre categories shown as explore chips and upload options. `All` is a
/// UI pseudo-category, not a valid genre on a beat document.
pub const CATEGORIES: &[&str] = &[
    "Hip Hop",
    "Trap",
    "R&B",
    "Afrobeat",
    "Pop",
    "Drill",
    "Lo-Fi",
    "House",
    "EDM",
    "Reggaeton",
    "Dancehall",
    "Country",
    "Rock",
    "Other",
];

/// Collaboration tags a profile can advertise.
pub const LOOKING_FOR_OPTIONS: &[&str] = &[
    "co-producer",
    "vocalist",
    "topline",
    "drummer",
    "guitar",
    "keys",
    "bass",
    "mix",
    "master",
    "arrangement",
    "sound-design",
    "marketing",
];

/// A built-in room shown when the lobby query fails or returns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRoom {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cover_url: &'static str,
}

/// Fallback lobby contents.
pub const DEFAULT_ROOMS: &[DefaultRoom] = &[
    DefaultRoom {
        id: "rap",
        name: "Rap",
        description: "Talk bars, flows, beats",
        cover_url: "img/rooms/rap.jpg",
    },
    DefaultRoom {
        id: "rnb",
        name: "R&B",
        description: "Groove, vocals, and smooth melodies",
        cover_url: "img/rooms/rnb.jpg",
    },
    DefaultRoom {
        id: "edm",
        name: "EDM",
        description: "House, techno, drops and festivals",
        cover_url: "img/rooms/edm.jpg",
    },
    DefaultRoom {
        id: "house",
        name: "House",
        description: "Deep/Tech/Progressive",
        cover_url: "img/rooms/house.jpg",
    },
    DefaultRoom {
        id: "jazz",
        name: "Jazz",
        description: "Smooth vibes, improvisation, soul",
        cover_url: "img/rooms/jazz.jpg",
    },
    DefaultRoom {
        id: "pop",
        name: "Pop",
        description: "Catchy hooks and chart toppers",
        cover_url: "img/rooms/pop.jpg",
    },
    DefaultRoom {
        id: "afrobeats",
        name: "Afrobeats",
        description: "Dance rhythms, afro-fusion, global vibes",
        cover_url: "img/rooms/afrobeats.jpg",
    },
];

/// Maximum comment length in characters.
pub const COMMENT_MAX_LEN: usize = 500;

/// Page sizes per view.
pub const COMMENT_PAGE_LIMIT: usize = 300;
pub const CHAT_PAGE_LIMIT: usize = 200;
pub const DM_PAGE_LIMIT: usize = 300;
pub const INBOX_LIMIT: usize = 30;
pub const LOBBY_LIMIT: usize = 100;
pub const EXPLORE_LIMIT: usize = 50;
/// Wider window fetched when popularity is sorted client-side.
pub const EXPLORE_POPULAR_WINDOW: usize = 100;
pub const FOLLOW_FETCH_LIMIT: usize = 500;
pub const FOLLOW_LIST_LIMIT: usize = 50;
pub const LEADERBOARD_ROWS: usize = 40;
/// Window fetched before client-side leaderboard sorting.
pub const LEADERBOARD_FETCH_LIMIT: usize = 120;

/// Inbox preview truncation length.
pub const DM_PREVIEW_MAX_LEN: usize = 120;

/// Batch size for id-keyed user lookups (`IdIn` queries).
pub const USERS_LOOKUP_CHUNK: usize = 10;

/// Username constraints enforced at sign-up.
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;

/// Avatar upload content types accepted by the profile editor.
pub const AVATAR_CONTENT_TYPES: &[&str] =
    &["image/png", "image/jpeg", "image/webp", "image/gif"];
