//! Shared wiring for the integration suites: one in-memory store, one
//! client `App` per signed-in actor.

// not every suite uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use collabbeats_backend::{
    AuthGateway, DocumentStore, Fields, MemoryAuth, MemoryBlobs, MemoryStore,
};
use collabbeats_client::gif::StaticGifSearch;
use collabbeats_client::indexes::REQUIRED_INDEXES;
use collabbeats_client::{App, AppConfig};

pub struct TestBackend {
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<MemoryBlobs>,
}

/// A store with the application's composite indexes provisioned.
pub fn backend() -> TestBackend {
    let store = Arc::new(MemoryStore::new());
    for index in REQUIRED_INDEXES {
        store.register_index(index.group, index.fields);
    }
    TestBackend {
        store,
        blobs: Arc::new(MemoryBlobs::new()),
    }
}

/// A store with no indexes, for exercising the fallback paths.
pub fn bare_backend() -> TestBackend {
    TestBackend {
        store: Arc::new(MemoryStore::new()),
        blobs: Arc::new(MemoryBlobs::new()),
    }
}

fn app_with_auth(backend: &TestBackend, auth: Arc<MemoryAuth>) -> App {
    App {
        store: backend.store.clone(),
        auth,
        blobs: backend.blobs.clone(),
        gifs: Arc::new(StaticGifSearch::default()),
        config: AppConfig::default(),
    }
}

/// A signed-in client against the shared backend. Each client gets its own
/// auth gateway, modelling a separate browser session.
pub async fn client(backend: &TestBackend, email: &str) -> (App, String) {
    let auth = Arc::new(MemoryAuth::new());
    let user = auth.sign_up(email, "secret1").await.unwrap();
    (app_with_auth(backend, auth), user.uid)
}

/// A signed-out client.
pub fn anonymous(backend: &TestBackend) -> App {
    app_with_auth(backend, Arc::new(MemoryAuth::new()))
}

/// Seed a public beat document directly, like an earlier upload would have.
pub async fn seed_beat(
    backend: &TestBackend,
    id: &str,
    owner: &str,
    title: &str,
    genre: &str,
    like_count: i64,
    age_minutes: i64,
) {
    let ts = Utc::now() - Duration::minutes(age_minutes);
    let fields: Fields = json!({
        "userId": owner,
        "title": title,
        "genre": genre,
        "visibility": "public",
        "audioURL": format!("https://cdn.example/{id}.mp3"),
        "likeCount": like_count,
        "commentCount": 0,
        "timestamp": ts.to_rfc3339(),
    })
    .as_object()
    .cloned()
    .unwrap();

    backend
        .store
        .set(
            &collabbeats_backend::CollectionPath::new("beats").doc(id),
            fields,
        )
        .await
        .unwrap();
}

/// Seed a user profile document directly.
pub async fn seed_profile(backend: &TestBackend, uid: &str, username: &str) {
    let fields: Fields = json!({
        "username": username,
        "photoURL": "",
        "lookingFor": [],
    })
    .as_object()
    .cloned()
    .unwrap();
    backend
        .store
        .set(
            &collabbeats_backend::CollectionPath::new("users").doc(uid),
            fields,
        )
        .await
        .unwrap();
}
