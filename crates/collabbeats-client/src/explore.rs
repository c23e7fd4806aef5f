//! The explore feed: public beats filtered by genre chip, keyword, and
//! "following only", with newest/oldest served by the store and popularity
//! sorted client-side over a bounded window.

use std::sync::Arc;

use collabbeats_backend::{
    AuthGateway, BackendError, Direction, Doc, DocumentStore, Query,
};
use collabbeats_shared::constants::{EXPLORE_LIMIT, EXPLORE_POPULAR_WINDOW};
use collabbeats_shared::{Beat, BeatId};

use crate::error::Result;
use crate::follows::FollowService;
use crate::paths;
use crate::views::beat_card::BeatCard;

/// Sort modes offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExploreSort {
    #[default]
    Newest,
    Oldest,
    /// Fetch a recent window, then order by like count client-side.
    Popular,
}

/// The toolbar state.
#[derive(Debug, Clone, Default)]
pub struct ExploreFilter {
    /// `None` means the "All" chip.
    pub category: Option<String>,
    pub keyword: String,
    pub follow_only: bool,
    pub sort: ExploreSort,
}

/// What the feed view renders: cards, or a designated empty state.
#[derive(Debug, Clone)]
pub struct ExplorePage {
    pub cards: Vec<BeatCard>,
    /// Set when `cards` is empty; never leaves the view blank.
    pub empty_message: Option<String>,
}

impl ExplorePage {
    fn empty(message: &str) -> Self {
        Self {
            cards: Vec::new(),
            empty_message: Some(message.to_string()),
        }
    }
}

pub struct ExploreService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthGateway>,
}

impl ExploreService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self { store, auth }
    }

    /// Load one page of the feed. A missing composite index degrades to an
    /// explanatory empty state rather than an error screen.
    pub async fn load(&self, filter: &ExploreFilter) -> Result<ExplorePage> {
        let query = Self::build_query(filter);

        let docs = match self.store.query(&query).await {
            Ok(docs) => docs,
            Err(BackendError::MissingIndex { .. }) => {
                tracing::warn!(category = ?filter.category, "explore query awaiting index");
                return Ok(ExplorePage::empty(
                    "This filter is setting up its search index. Try again soon.",
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let mut beats: Vec<(BeatId, Beat)> = docs
            .iter()
            .filter_map(|doc: &Doc| {
                let beat = doc.decode::<Beat>().ok()?;
                Some((BeatId::new(doc.id()), beat))
            })
            .collect();

        if filter.follow_only {
            let following =
                FollowService::new(Arc::clone(&self.store), Arc::clone(&self.auth))
                    .following_ids()
                    .await;
            if !following.is_empty() {
                beats.retain(|(_, b)| following.contains(&b.user_id));
            }
        }

        let keyword = filter.keyword.trim().to_lowercase();
        if !keyword.is_empty() {
            beats.retain(|(_, b)| b.title.to_lowercase().contains(&keyword));
        }

        if filter.sort == ExploreSort::Popular {
            beats.sort_by(|a, b| b.1.like_count.cmp(&a.1.like_count));
        }

        if beats.is_empty() {
            return Ok(ExplorePage::empty("No results."));
        }

        Ok(ExplorePage {
            cards: beats
                .into_iter()
                .map(|(id, beat)| BeatCard::from_beat(&id, &beat))
                .collect(),
            empty_message: None,
        })
    }

    fn build_query(filter: &ExploreFilter) -> Query {
        let mut query =
            Query::collection(paths::beats()).where_eq("visibility", "public");
        if let Some(genre) = &filter.category {
            query = query.where_eq("genre", genre.as_str());
        }
        match filter.sort {
            ExploreSort::Newest => query
                .order_by("timestamp", Direction::Desc)
                .limit(EXPLORE_LIMIT),
            ExploreSort::Oldest => query
                .order_by("timestamp", Direction::Asc)
                .limit(EXPLORE_LIMIT),
            // wider window, re-sorted client-side
            ExploreSort::Popular => query
                .order_by("timestamp", Direction::Desc)
                .limit(EXPLORE_POPULAR_WINDOW),
        }
    }
}
