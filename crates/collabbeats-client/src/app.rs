//! Application wiring: the injected capability handles and the service
//! accessors the embedding shell calls.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use collabbeats_backend::{AuthGateway, BlobStore, DocumentStore, MemoryBackend};

use crate::account::AccountService;
use crate::beats::BeatService;
use crate::chat::ChatService;
use crate::comments::CommentService;
use crate::config::AppConfig;
use crate::dm::DmService;
use crate::explore::ExploreService;
use crate::follows::FollowService;
use crate::gif::{GifSearch, GiphyClient, StaticGifSearch};
use crate::indexes::REQUIRED_INDEXES;
use crate::leaderboard::LeaderboardService;
use crate::likes::LikeService;
use crate::profile::ProfileService;
use crate::upload::UploadService;

/// Initialise logging for the embedding process.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("collabbeats_client=debug,collabbeats_backend=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// The capability set every feature service draws from.
#[derive(Clone)]
pub struct App {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthGateway>,
    pub blobs: Arc<dyn BlobStore>,
    pub gifs: Arc<dyn GifSearch>,
    pub config: AppConfig,
}

impl App {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthGateway>,
        blobs: Arc<dyn BlobStore>,
        config: AppConfig,
    ) -> Self {
        let gifs: Arc<dyn GifSearch> = Arc::new(GiphyClient::new(config.gif.clone()));
        Self {
            store,
            auth,
            blobs,
            gifs,
            config,
        }
    }

    /// Fully in-memory wiring with the application's composite indexes
    /// provisioned and a static GIF searcher. Used by tests and offline
    /// development.
    pub fn in_memory() -> Self {
        let backend = MemoryBackend::new();
        for index in REQUIRED_INDEXES {
            backend.store.register_index(index.group, index.fields);
        }
        Self {
            store: backend.store,
            auth: backend.auth,
            blobs: backend.blobs,
            gifs: Arc::new(StaticGifSearch::default()),
            config: AppConfig::default(),
        }
    }

    // ------------------------------------------------------------------
    // Service accessors
    // ------------------------------------------------------------------

    pub fn accounts(&self) -> AccountService {
        AccountService::new(Arc::clone(&self.store), Arc::clone(&self.auth))
    }

    pub fn likes(&self) -> LikeService {
        LikeService::new(Arc::clone(&self.store), Arc::clone(&self.auth))
    }

    pub fn follows(&self) -> FollowService {
        FollowService::new(Arc::clone(&self.store), Arc::clone(&self.auth))
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(Arc::clone(&self.store), Arc::clone(&self.auth))
    }

    pub fn beats(&self) -> BeatService {
        BeatService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.blobs),
            Arc::clone(&self.auth),
        )
    }

    pub fn explore(&self) -> ExploreService {
        ExploreService::new(Arc::clone(&self.store), Arc::clone(&self.auth))
    }

    pub fn leaderboard(&self) -> LeaderboardService {
        LeaderboardService::new(Arc::clone(&self.store), Arc::clone(&self.blobs))
    }

    pub fn uploads(&self) -> UploadService {
        UploadService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.blobs),
            Arc::clone(&self.auth),
        )
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.blobs),
            Arc::clone(&self.auth),
        )
    }

    pub fn dms(&self) -> DmService {
        DmService::new(Arc::clone(&self.store), Arc::clone(&self.auth))
    }

    pub fn chat(&self) -> ChatService {
        ChatService::new(Arc::clone(&self.store), Arc::clone(&self.auth))
    }
}
