//! Explore, leaderboard, upload, and profile flows.

mod common;

use chrono::Utc;

use collabbeats_backend::{CollectionPath, DocumentStore};
use collabbeats_client::explore::{ExploreFilter, ExploreSort};
use collabbeats_client::leaderboard::LeaderboardTab;
use collabbeats_client::upload::{FilePayload, UploadRequest};
use collabbeats_client::ClientError;
use collabbeats_shared::{BeatId, UserId, Visibility};

use common::{backend, bare_backend, client, seed_beat, seed_profile};

fn audio_file(name: &str) -> FilePayload {
    FilePayload {
        name: name.to_string(),
        content_type: "audio/mpeg".to_string(),
        bytes: vec![0u8; 16],
    }
}

#[tokio::test]
async fn upload_then_explore_round_trip() {
    let be = backend();
    let (app, uid) = client(&be, "producer@example.com").await;

    let (beat_id, beat) = app
        .uploads()
        .upload(UploadRequest {
            title: "Midnight / Run".to_string(),
            description: "late one".to_string(),
            genre: "Trap".to_string(),
            visibility: Visibility::Public,
            audio: audio_file("midnight.mp3"),
            cover: None,
        })
        .await
        .unwrap();

    // path separators are flattened out of the stored title
    assert_eq!(beat.title, "Midnight - Run");
    assert_eq!(beat.user_id, uid);
    assert!(beat.audio_url.as_deref().unwrap().starts_with("memory://"));
    assert!(be
        .blobs
        .bytes_of(beat.storage_path.as_deref().unwrap())
        .is_some());

    // the feed sees it
    let page = app.explore().load(&ExploreFilter::default()).await.unwrap();
    assert_eq!(page.cards.len(), 1);
    assert_eq!(page.cards[0].id, beat_id.as_str());
    assert_eq!(page.cards[0].genre, "Trap");

    // genre chips filter server-side
    let page = app
        .explore()
        .load(&ExploreFilter {
            category: Some("Drill".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page.cards.is_empty());
    assert_eq!(page.empty_message.as_deref(), Some("No results."));
}

#[tokio::test]
async fn upload_validation() {
    let be = backend();
    let (app, _) = client(&be, "producer@example.com").await;

    let request = UploadRequest {
        title: "  ".to_string(),
        description: String::new(),
        genre: "Trap".to_string(),
        visibility: Visibility::Public,
        audio: audio_file("a.mp3"),
        cover: None,
    };
    assert!(matches!(
        app.uploads().upload(request.clone()).await,
        Err(ClientError::Validation(_))
    ));

    let request = UploadRequest {
        title: "ok".to_string(),
        genre: "NotARealGenre".to_string(),
        ..request
    };
    assert!(matches!(
        app.uploads().upload(request.clone()).await,
        Err(ClientError::Validation(_))
    ));

    let request = UploadRequest {
        genre: "Trap".to_string(),
        audio: FilePayload {
            name: "a.mp3".into(),
            content_type: "audio/mpeg".into(),
            bytes: vec![],
        },
        ..request
    };
    assert!(matches!(
        app.uploads().upload(request).await,
        Err(ClientError::Validation(_))
    ));
}

#[tokio::test]
async fn explore_filters_keyword_follows_and_popularity() {
    let be = backend();
    let (alice_app, alice) = client(&be, "alice@example.com").await;
    let (_, bob) = client(&be, "bob@example.com").await;
    let (_, carol) = client(&be, "carol@example.com").await;
    seed_profile(&be, &alice, "alice").await;
    seed_profile(&be, &bob, "bob").await;
    seed_profile(&be, &carol, "carol").await;

    seed_beat(&be, "b1", &bob, "Sunset Drive", "House", 9, 30).await;
    seed_beat(&be, "b2", &carol, "Sunrise Drive", "House", 2, 10).await;
    seed_beat(&be, "b3", &carol, "Completely Else", "House", 30, 5).await;

    // keyword filters client-side on the title
    let page = alice_app
        .explore()
        .load(&ExploreFilter {
            keyword: "drive".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.cards.len(), 2);

    // newest first by default
    let page = alice_app
        .explore()
        .load(&ExploreFilter::default())
        .await
        .unwrap();
    assert_eq!(page.cards[0].id, "b3");

    // popular re-sorts the window by like count
    let page = alice_app
        .explore()
        .load(&ExploreFilter {
            sort: ExploreSort::Popular,
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<&str> = page.cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b3", "b1", "b2"]);

    // follows-only keeps only beats from people I follow
    alice_app
        .follows()
        .toggle(&UserId::new(bob.clone()))
        .await
        .unwrap();
    let page = alice_app
        .explore()
        .load(&ExploreFilter {
            follow_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.cards.len(), 1);
    assert_eq!(page.cards[0].id, "b1");
}

#[tokio::test]
async fn explore_degrades_to_a_notice_while_indexes_build() {
    let be = bare_backend();
    let (app, _) = client(&be, "fan@example.com").await;

    let page = app.explore().load(&ExploreFilter::default()).await.unwrap();
    assert!(page.cards.is_empty());
    assert!(page
        .empty_message
        .as_deref()
        .unwrap()
        .contains("search index"));
}

#[tokio::test]
async fn leaderboard_tabs_order_correctly() {
    let be = backend();
    let (app, _) = client(&be, "fan@example.com").await;
    let now = Utc::now();

    // old but heavily liked / new but quiet / fresh and liked
    seed_beat(&be, "classic", "u1", "Classic", "House", 400, 50 * 24 * 60).await;
    seed_beat(&be, "quiet", "u2", "Quiet", "House", 1, 60).await;
    seed_beat(&be, "riser", "u3", "Riser", "House", 80, 12 * 60).await;

    let top = app.leaderboard().load(LeaderboardTab::Top, now).await.unwrap();
    assert_eq!(top[0].id, "classic");

    let trending = app
        .leaderboard()
        .load(LeaderboardTab::Trending, now)
        .await
        .unwrap();
    // freshness weighting puts the riser ahead of the old classic
    assert_eq!(trending[0].id, "riser");

    let new = app.leaderboard().load(LeaderboardTab::New, now).await.unwrap();
    assert_eq!(new[0].id, "quiet");

    // the unindexed fallback still produces rows
    let bare = bare_backend();
    seed_beat(&bare, "only", "u1", "Only", "House", 3, 30).await;
    let (bare_app, _) = client(&bare, "fan@example.com").await;
    let rows = bare_app
        .leaderboard()
        .load(LeaderboardTab::Top, now)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn avatar_upload_validates_and_updates_the_profile() {
    let be = backend();
    let (app, uid) = client(&be, "nova@example.com").await;
    seed_profile(&be, &uid, "nova").await;

    let err = app
        .profiles()
        .upload_avatar(FilePayload {
            name: "notes.txt".into(),
            content_type: "text/plain".into(),
            bytes: vec![1],
        })
        .await
        .unwrap_err();
    assert!(err.user_message().contains("PNG, JPG, WEBP, or GIF"));

    let url = app
        .profiles()
        .upload_avatar(FilePayload {
            name: "me.jpeg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![1, 2, 3],
        })
        .await
        .unwrap();
    assert_eq!(url, format!("memory://avatars/{uid}.jpg"));

    let profile = app
        .profiles()
        .get(&UserId::new(uid.clone()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.photo_url, url);
}

#[tokio::test]
async fn looking_for_tags_are_validated_against_the_option_list() {
    let be = backend();
    let (app, uid) = client(&be, "nova@example.com").await;
    seed_profile(&be, &uid, "nova").await;

    assert!(matches!(
        app.profiles()
            .set_looking_for(vec!["astronaut".to_string()])
            .await,
        Err(ClientError::Validation(_))
    ));

    app.profiles()
        .set_looking_for(vec!["Vocalist".to_string(), "mix".to_string()])
        .await
        .unwrap();
    let profile = app
        .profiles()
        .get(&UserId::new(uid))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.looking_for, vec!["vocalist", "mix"]);
}

#[tokio::test]
async fn beat_deletion_is_owner_only_and_removes_the_audio_object() {
    let be = backend();
    let (owner_app, _) = client(&be, "owner@example.com").await;
    let (stranger_app, _) = client(&be, "stranger@example.com").await;

    let (beat_id, beat) = owner_app
        .uploads()
        .upload(UploadRequest {
            title: "Keep".to_string(),
            description: String::new(),
            genre: "Pop".to_string(),
            visibility: Visibility::Public,
            audio: audio_file("keep.mp3"),
            cover: None,
        })
        .await
        .unwrap();
    let storage_path = beat.storage_path.unwrap();

    assert!(matches!(
        stranger_app.beats().delete(&beat_id).await,
        Err(ClientError::Forbidden(_))
    ));

    owner_app.beats().delete(&beat_id).await.unwrap();
    assert!(be
        .store
        .get(&CollectionPath::new("beats").doc(beat_id.as_str()))
        .await
        .unwrap()
        .is_none());
    assert!(be.blobs.bytes_of(&storage_path).is_none());

    // deleting a beat that is already gone is quietly fine
    owner_app.beats().delete(&beat_id).await.unwrap();
}

#[tokio::test]
async fn likes_given_resolves_parent_beats_across_the_catalogue() {
    let be = backend();
    let (app, _) = client(&be, "fan@example.com").await;
    seed_beat(&be, "b1", "u1", "One", "Pop", 0, 10).await;
    seed_beat(&be, "b2", "u2", "Two", "Pop", 0, 5).await;

    app.likes().toggle(&BeatId::new("b1")).await.unwrap();
    app.likes().toggle(&BeatId::new("b2")).await.unwrap();

    let given = app.profiles().likes_given().await.unwrap();
    assert_eq!(given.len(), 2);
    let titles: Vec<&str> = given.iter().map(|(_, b)| b.title.as_str()).collect();
    assert!(titles.contains(&"One") && titles.contains(&"Two"));
}

#[tokio::test]
async fn likes_received_groups_likers_by_beat() {
    let be = backend();
    let (owner_app, owner) = client(&be, "owner@example.com").await;
    seed_profile(&be, &owner, "owner").await;
    seed_beat(&be, "hit", &owner, "Hit", "Pop", 0, 10).await;

    for i in 0..3 {
        let (fan_app, fan_uid) = client(&be, &format!("fan{i}@example.com")).await;
        seed_profile(&be, &fan_uid, &format!("fan{i}")).await;
        fan_app.likes().toggle(&BeatId::new("hit")).await.unwrap();
    }

    let received = owner_app
        .profiles()
        .likes_received(&UserId::new(owner))
        .await
        .unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].likers.len(), 3);
    assert!(received[0]
        .likers
        .iter()
        .any(|(_, name, _)| name == "fan0"));
}

#[tokio::test]
async fn profile_header_reflects_the_viewer() {
    let be = backend();
    let (alice_app, alice) = client(&be, "alice@example.com").await;
    let (bob_app, bob) = client(&be, "bob@example.com").await;
    seed_profile(&be, &alice, "alice").await;
    seed_profile(&be, &bob, "bob").await;

    alice_app
        .follows()
        .toggle(&UserId::new(bob.clone()))
        .await
        .unwrap();

    // Alice looking at Bob
    let header = alice_app
        .profiles()
        .header(&UserId::new(bob.clone()))
        .await
        .unwrap();
    assert!(!header.is_owner);
    assert!(header.am_following);
    assert_eq!(header.followers, 1);
    assert_eq!(header.username, "bob");

    // Bob looking at himself
    let header = bob_app
        .profiles()
        .header(&UserId::new(bob))
        .await
        .unwrap();
    assert!(header.is_owner);
    assert!(!header.am_following);
}
