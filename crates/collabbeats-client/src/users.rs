//! Batched user-profile lookups.

use std::collections::HashMap;
use std::sync::Arc;

use collabbeats_backend::{DocumentStore, Query};
use collabbeats_shared::constants::USERS_LOOKUP_CHUNK;
use collabbeats_shared::UserProfile;

use crate::error::Result;
use crate::paths;

/// Fetch profiles for a set of uids, chunked to the backend's id-filter
/// limit. Unknown uids are simply absent from the result; chunk failures
/// are tolerated (rows render with the bare uid instead).
pub async fn by_ids(
    store: &Arc<dyn DocumentStore>,
    uids: &[String],
) -> Result<HashMap<String, UserProfile>> {
    let mut out = HashMap::new();
    if uids.is_empty() {
        return Ok(out);
    }

    for chunk in uids.chunks(USERS_LOOKUP_CHUNK) {
        let query = Query::collection(paths::users()).id_in(chunk.to_vec());
        let docs = match store.query(&query).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!(error = %e, "user lookup chunk failed");
                continue;
            }
        };
        for doc in docs {
            if let Ok(profile) = doc.decode::<UserProfile>() {
                out.insert(doc.id().to_string(), profile);
            }
        }
    }
    Ok(out)
}
