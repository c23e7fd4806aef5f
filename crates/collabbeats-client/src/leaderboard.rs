//! Leaderboard tabs: Top / Trending / New over recent public beats.
//!
//! The store serves a time-windowed page ordered by recency; likes and
//! trending order are computed client-side. While the composite index is
//! building, an unordered fetch plus a client-side window keeps the board
//! alive.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use collabbeats_backend::{BackendError, BlobStore, Direction, DocumentStore, Query};
use collabbeats_shared::constants::{LEADERBOARD_FETCH_LIMIT, LEADERBOARD_ROWS};
use collabbeats_shared::{Beat, BeatId};

use crate::error::Result;
use crate::paths;
use crate::views::beat_card::LeaderRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardTab {
    #[default]
    Top,
    Trending,
    New,
}

pub struct LeaderboardService {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Load a tab. `now` is passed in so freshness weighting is
    /// deterministic for callers and tests alike.
    pub async fn load(&self, tab: LeaderboardTab, now: DateTime<Utc>) -> Result<Vec<LeaderRow>> {
        let mut beats = match tab {
            LeaderboardTab::New => self.fetch_window(60, now).await?,
            LeaderboardTab::Trending => {
                let mut beats = self.fetch_window(30, now).await?;
                beats.sort_by(|a, b| {
                    trending_score(&b.1, now).total_cmp(&trending_score(&a.1, now))
                });
                beats
            }
            LeaderboardTab::Top => {
                let mut beats = self.fetch_window(60, now).await?;
                beats.sort_by(|a, b| b.1.like_count.cmp(&a.1.like_count));
                beats
            }
        };
        beats.truncate(LEADERBOARD_ROWS);

        let mut rows = Vec::with_capacity(beats.len());
        for (id, beat) in beats {
            let audio_url = crate::beats::resolve_audio_url(&self.blobs, &beat).await;
            let cover_url = crate::beats::resolve_cover_url(&self.blobs, &beat).await;
            rows.push(LeaderRow::from_beat(&id, &beat, audio_url, cover_url));
        }
        Ok(rows)
    }

    /// Recent public beats, newest first, bounded window.
    async fn fetch_window(
        &self,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<(BeatId, Beat)>> {
        let since = now - Duration::days(window_days);
        let query = Query::collection(paths::beats())
            .where_eq("visibility", "public")
            .where_gte("timestamp", since.to_rfc3339())
            .order_by("timestamp", Direction::Desc)
            .limit(LEADERBOARD_FETCH_LIMIT);

        let docs = match self.store.query(&query).await {
            Ok(docs) => docs,
            Err(BackendError::MissingIndex { .. }) => {
                // unordered fetch, window applied client-side
                let fallback = Query::collection(paths::beats())
                    .where_eq("visibility", "public")
                    .limit(LEADERBOARD_FETCH_LIMIT);
                self.store
                    .query(&fallback)
                    .await?
                    .into_iter()
                    .filter(|d| d.time("timestamp").map(|t| t >= since).unwrap_or(false))
                    .collect()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(docs
            .iter()
            .filter_map(|doc| {
                let beat = doc.decode::<Beat>().ok()?;
                Some((BeatId::new(doc.id()), beat))
            })
            .collect())
    }
}

/// Likes weighted by freshness: `likes / age_hours^0.6`.
pub fn trending_score(beat: &Beat, now: DateTime<Utc>) -> f64 {
    let likes = beat.like_count as f64;
    let age_hours = match beat.timestamp {
        Some(ts) => ((now - ts).num_seconds() as f64 / 3600.0).max(1.0),
        None => f64::MAX,
    };
    likes / age_hours.powf(0.6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beat(likes: i64, hours_old: i64, now: DateTime<Utc>) -> Beat {
        Beat {
            user_id: "u".into(),
            like_count: likes,
            timestamp: Some(now - Duration::hours(hours_old)),
            ..Default::default()
        }
    }

    #[test]
    fn fresh_beats_outrank_stale_ones_at_equal_likes() {
        let now = Utc::now();
        let fresh = beat(10, 2, now);
        let stale = beat(10, 200, now);
        assert!(trending_score(&fresh, now) > trending_score(&stale, now));
    }

    #[test]
    fn enough_likes_beat_freshness() {
        let now = Utc::now();
        let popular_old = beat(500, 100, now);
        let quiet_new = beat(1, 1, now);
        assert!(trending_score(&popular_old, now) > trending_score(&quiet_new, now));
    }

    #[test]
    fn undated_beats_score_zero() {
        let now = Utc::now();
        let undated = Beat {
            like_count: 50,
            ..Default::default()
        };
        assert_eq!(trending_score(&undated, now), 0.0);
    }
}
