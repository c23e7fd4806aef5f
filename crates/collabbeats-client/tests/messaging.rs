//! Direct messages, chat rooms, and live subscriptions.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use collabbeats_backend::{CollectionPath, Doc, DocumentStore};
use collabbeats_client::chat::{ChatService, LobbySort};
use collabbeats_client::comments::CommentService;
use collabbeats_client::dm::DmService;
use collabbeats_client::{ClientError, SubscriptionSlot};
use collabbeats_shared::{BeatId, RoomId, ThreadId, UserId};

use common::{backend, bare_backend, client, seed_beat, seed_profile};

async fn recv_frame(rx: &mut mpsc::UnboundedReceiver<Vec<Doc>>) -> Vec<Doc> {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a frame")
        .expect("subscription closed")
}

#[tokio::test]
async fn concurrent_first_open_creates_exactly_one_thread() {
    let be = backend();
    let (alice_app, alice) = client(&be, "alice@example.com").await;
    let (bob_app, bob) = client(&be, "bob@example.com").await;

    let to_bob = UserId::new(bob.clone());
    let to_alice = UserId::new(alice.clone());

    let alice_dms = alice_app.dms();
    let bob_dms = bob_app.dms();
    let (a, b) = tokio::join!(
        alice_dms.open(&to_bob),
        bob_dms.open(&to_alice)
    );
    let a = a.unwrap();
    let b = b.unwrap();

    // both sides derived the same sorted-pair id
    assert_eq!(a.thread, b.thread);
    assert_eq!(
        a.thread,
        ThreadId::between(&UserId::new(alice.clone()), &UserId::new(bob.clone()))
    );

    let threads = be
        .store
        .query(&collabbeats_backend::Query::collection(
            CollectionPath::new("dms"),
        ))
        .await
        .unwrap();
    assert_eq!(threads.len(), 1);

    // the stored participant array is the canonical sorted pair
    let mut expected = vec![alice, bob];
    expected.sort();
    let participants: Vec<String> = threads[0].fields["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(participants, expected);
}

#[tokio::test]
async fn messaging_yourself_is_rejected() {
    let be = backend();
    let (app, uid) = client(&be, "alice@example.com").await;
    assert!(matches!(
        app.dms().open(&UserId::new(uid)).await,
        Err(ClientError::Validation(_))
    ));
}

#[tokio::test]
async fn inbox_tracks_previews_and_unread_state() {
    let be = backend();
    let (alice_app, alice) = client(&be, "alice@example.com").await;
    let (bob_app, bob) = client(&be, "bob@example.com").await;
    seed_profile(&be, &alice, "alice").await;
    seed_profile(&be, &bob, "bob").await;

    let thread = alice_app.dms().open(&UserId::new(bob.clone())).await.unwrap().thread;
    alice_app
        .dms()
        .send_text(&thread, "you around tonight?")
        .await
        .unwrap();

    // Bob sees one unread conversation with the preview and Alice's name
    let inbox = bob_app.dms().inbox().await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].unread);
    assert_eq!(inbox[0].other_name, "alice");
    assert_eq!(inbox[0].last_text, "you around tonight?");

    // Alice sent the message, so her own copy is read
    let alice_inbox = alice_app.dms().inbox().await.unwrap();
    assert!(!alice_inbox[0].unread);

    // opening marks it read for Bob
    bob_app.dms().mark_read(&thread).await.unwrap();
    let inbox = bob_app.dms().inbox().await.unwrap();
    assert!(!inbox[0].unread);
}

#[tokio::test]
async fn long_messages_truncate_the_inbox_preview() {
    let be = backend();
    let (alice_app, _) = client(&be, "alice@example.com").await;
    let (bob_app, bob) = client(&be, "bob@example.com").await;

    let thread = alice_app
        .dms()
        .open(&UserId::new(bob.clone()))
        .await
        .unwrap()
        .thread;
    let long = "a".repeat(300);
    alice_app.dms().send_text(&thread, &long).await.unwrap();

    let inbox = bob_app.dms().inbox().await.unwrap();
    assert_eq!(inbox[0].last_text.chars().count(), 120);
}

#[tokio::test]
async fn gif_sends_bump_activity_without_clobbering_the_preview() {
    let be = backend();
    let (alice_app, _) = client(&be, "alice@example.com").await;
    let (bob_app, bob) = client(&be, "bob@example.com").await;

    let thread = alice_app
        .dms()
        .open(&UserId::new(bob.clone()))
        .await
        .unwrap()
        .thread;
    alice_app.dms().send_text(&thread, "look at this").await.unwrap();
    alice_app
        .dms()
        .send_gif(&thread, "https://g/dance.gif")
        .await
        .unwrap();

    let inbox = bob_app.dms().inbox().await.unwrap();
    assert!(inbox[0].unread);
    assert_eq!(inbox[0].last_text, "look at this");

    let messages = be
        .store
        .query(&DmService::messages_query(&thread))
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text("gifUrl"), Some("https://g/dance.gif"));
}

#[tokio::test]
async fn chat_messages_carry_the_author_snapshot() {
    let be = backend();
    let (app, uid) = client(&be, "nova@example.com").await;
    seed_profile(&be, &uid, "nova").await;

    let room = RoomId::new("rap");
    app.chat().send_text(&room, "bars!").await.unwrap();

    let messages = be
        .store
        .query(&ChatService::messages_query(&room))
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text("username"), Some("nova"));
    assert_eq!(messages[0].text("userId"), Some(uid.as_str()));

    // the lobby's "active" ordering key moved
    let room_doc = be
        .store
        .get(&CollectionPath::new("chatRooms").doc("rap"))
        .await
        .unwrap()
        .unwrap();
    assert!(room_doc.time("lastMessageAt").is_some());
}

#[tokio::test]
async fn lobby_falls_back_to_built_in_rooms() {
    // empty result set → default rooms
    let cards = ChatService::rooms_or_default(&[]);
    assert_eq!(cards.len(), 7);
    assert!(cards.iter().any(|c| c.id == "jazz"));

    // search filters whatever list is showing
    let filtered = ChatService::filter_rooms(cards, "drops");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "edm");

    // an unprovisioned index surfaces at bind time, so the view can render
    // the defaults instead
    let be = bare_backend();
    let store: Arc<dyn DocumentStore> = be.store.clone();
    let mut slot = SubscriptionSlot::new();
    let result = slot
        .bind(&store, &ChatService::lobby_query(LobbySort::Active), |_| {})
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn live_comment_feed_renders_every_change() {
    let be = backend();
    let (app, uid) = client(&be, "fan@example.com").await;
    seed_beat(&be, "beat-x", "owner", "x", "Pop", 0, 1).await;
    seed_profile(&be, &uid, "nova").await;

    let store: Arc<dyn DocumentStore> = be.store.clone();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut slot = SubscriptionSlot::new();
    slot.bind(
        &store,
        &CommentService::feed_query(&BeatId::new("beat-x")),
        move |docs| {
            let _ = tx.send(docs);
        },
    )
    .await
    .unwrap();

    // initial load: empty feed (the view renders its empty state)
    assert!(recv_frame(&mut rx).await.is_empty());

    app.comments()
        .post(&BeatId::new("beat-x"), "first!")
        .await
        .unwrap();
    let frame = recv_frame(&mut rx).await;
    assert_eq!(frame.len(), 1);

    let rows = CommentService::rows(&frame, Some(&uid), Some("owner"));
    assert_eq!(rows[0].text, "first!");
    assert!(rows[0].can_delete);

    slot.close().await;
}

#[tokio::test]
async fn replaced_subscriptions_never_render_stale_frames() {
    let be = backend();
    let (app, uid) = client(&be, "fan@example.com").await;
    seed_beat(&be, "beat-a", "owner", "a", "Pop", 0, 1).await;
    seed_beat(&be, "beat-b", "owner", "b", "Pop", 0, 1).await;
    seed_profile(&be, &uid, "nova").await;

    let store: Arc<dyn DocumentStore> = be.store.clone();
    let mut slot = SubscriptionSlot::new();

    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    slot.bind(
        &store,
        &CommentService::feed_query(&BeatId::new("beat-a")),
        move |docs| {
            let _ = tx_a.send(docs);
        },
    )
    .await
    .unwrap();
    assert!(recv_frame(&mut rx_a).await.is_empty());

    // the view switches to beat B; the old subscription must be dead
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    slot.bind(
        &store,
        &CommentService::feed_query(&BeatId::new("beat-b")),
        move |docs| {
            let _ = tx_b.send(docs);
        },
    )
    .await
    .unwrap();
    assert!(recv_frame(&mut rx_b).await.is_empty());

    // a change that matches the *old* query
    app.comments()
        .post(&BeatId::new("beat-a"), "too late")
        .await
        .unwrap();

    // the new subscription stays quiet (different beat), and the replaced
    // one delivers nothing
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx_a.try_recv().is_err());
    assert!(rx_b.try_recv().is_err());

    slot.close().await;
}
