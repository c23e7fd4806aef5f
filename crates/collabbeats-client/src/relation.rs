//! The counted relation toggle.
//!
//! A relation document's existence encodes a boolean fact between two
//! identities (liked, following); a counter on the target document caches
//! the relation count for display. The check, the relation write/delete and
//! the counter adjustment all happen in one transaction, so concurrent
//! toggles from different clients never lose an update.

use std::sync::Arc;

use serde_json::json;

use collabbeats_backend::{run_transaction, BackendError, DocPath, DocumentStore, Fields};

use crate::error::Result;

/// Where the relation lives and which counter it maintains.
#[derive(Debug, Clone)]
pub struct CountedRelation {
    /// The relation document (`beats/{id}/likes/{uid}`).
    pub relation: DocPath,
    /// The target document carrying the counter.
    pub target: DocPath,
    pub counter_field: &'static str,
}

/// The state after a toggle, used to reconcile the UI without a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Whether the relation exists now.
    pub engaged: bool,
    /// The counter value written.
    pub count: i64,
}

/// Atomically flip the relation and adjust the counter.
///
/// The target must exist; the counter field may be absent (legacy
/// documents) and is treated as 0. The decrement is floored at 0.
pub async fn toggle(
    store: &Arc<dyn DocumentStore>,
    spec: &CountedRelation,
    relation_fields: Fields,
) -> Result<ToggleOutcome> {
    let outcome = run_transaction(store, |tx| {
        let spec = spec.clone();
        let relation_fields = relation_fields.clone();
        Box::pin(async move {
            let existing = tx.get(&spec.relation).await?;
            let target = tx.get(&spec.target).await?.ok_or(BackendError::NotFound)?;
            let count = target.i64_or(spec.counter_field, 0);

            if existing.is_some() {
                let count = (count - 1).max(0);
                tx.delete(&spec.relation);
                tx.merge(&spec.target, counter_fields(spec.counter_field, count));
                Ok(ToggleOutcome {
                    engaged: false,
                    count,
                })
            } else {
                let count = count + 1;
                tx.set(&spec.relation, relation_fields);
                tx.merge(&spec.target, counter_fields(spec.counter_field, count));
                Ok(ToggleOutcome {
                    engaged: true,
                    count,
                })
            }
        })
    })
    .await?;

    Ok(outcome)
}

fn counter_fields(field: &str, value: i64) -> Fields {
    let mut fields = Fields::new();
    fields.insert(field.to_string(), json!(value));
    fields
}
