//! Transaction-level guarantees exercised against the in-memory store:
//! counters survive concurrent toggles, and document-creation races leave
//! exactly one winner.

use std::sync::Arc;

use serde_json::json;

use collabbeats_backend::{
    run_transaction, CollectionPath, DocumentStore, Fields, MemoryStore, Query,
};

fn fields(v: serde_json::Value) -> Fields {
    v.as_object().cloned().unwrap()
}

fn store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new())
}

#[tokio::test]
async fn concurrent_increments_never_lose_updates() {
    let store = store();
    let beat = CollectionPath::new("beats").doc("b1");
    store
        .set(&beat, fields(json!({ "likeCount": 3 })))
        .await
        .unwrap();

    // five distinct actors toggle on at the same time
    let mut tasks = Vec::new();
    for actor in ["u1", "u2", "u3", "u4", "u5"] {
        let store = Arc::clone(&store);
        let beat = beat.clone();
        tasks.push(tokio::spawn(async move {
            let like = beat.collection.child(&beat.id, "likes").doc(actor);
            run_transaction(&store, |tx| {
                let beat = beat.clone();
                let like = like.clone();
                Box::pin(async move {
                    let beat_doc = tx.get(&beat).await?;
                    let count = beat_doc.map(|d| d.i64_or("likeCount", 0)).unwrap_or(0);
                    tx.set(&like, fields(json!({ "userId": like.id.as_str() })));
                    tx.merge(&beat, fields(json!({ "likeCount": count + 1 })));
                    Ok(())
                })
            })
            .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let doc = store.get(&beat).await.unwrap().unwrap();
    assert_eq!(doc.i64_or("likeCount", 0), 8);

    let likes = store
        .query(&Query::collection(
            CollectionPath::new("beats").child("b1", "likes"),
        ))
        .await
        .unwrap();
    assert_eq!(likes.len(), 5);
}

#[tokio::test]
async fn toggle_twice_returns_counter_to_original_value() {
    let store = store();
    let beat = CollectionPath::new("beats").doc("b1");
    let like = CollectionPath::new("beats").child("b1", "likes").doc("u1");
    store
        .set(&beat, fields(json!({ "likeCount": 3 })))
        .await
        .unwrap();

    for _ in 0..2 {
        run_transaction(&store, |tx| {
            let beat = beat.clone();
            let like = like.clone();
            Box::pin(async move {
                let like_doc = tx.get(&like).await?;
                let count = tx
                    .get(&beat)
                    .await?
                    .map(|d| d.i64_or("likeCount", 0))
                    .unwrap_or(0);
                if like_doc.is_some() {
                    tx.delete(&like);
                    tx.merge(&beat, fields(json!({ "likeCount": (count - 1).max(0) })));
                } else {
                    tx.set(&like, fields(json!({ "userId": "u1" })));
                    tx.merge(&beat, fields(json!({ "likeCount": count + 1 })));
                }
                Ok(())
            })
        })
        .await
        .unwrap();
    }

    let doc = store.get(&beat).await.unwrap().unwrap();
    assert_eq!(doc.i64_or("likeCount", 0), 3);
    assert!(store.get(&like).await.unwrap().is_none());
}

#[tokio::test]
async fn create_race_leaves_exactly_one_document() {
    let store = store();
    let thread = CollectionPath::new("dms").doc("a__b");

    let mut tasks = Vec::new();
    for _ in 0..2 {
        let store = Arc::clone(&store);
        let thread = thread.clone();
        tasks.push(tokio::spawn(async move {
            run_transaction(&store, |tx| {
                let thread = thread.clone();
                Box::pin(async move {
                    if tx.get(&thread).await?.is_none() {
                        tx.set(&thread, fields(json!({ "participants": ["a", "b"] })));
                        Ok(true)
                    } else {
                        Ok(false)
                    }
                })
            })
            .await
        }));
    }

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap().unwrap() {
            created += 1;
        }
    }
    assert_eq!(created, 1);
    assert!(store.get(&thread).await.unwrap().is_some());
}
