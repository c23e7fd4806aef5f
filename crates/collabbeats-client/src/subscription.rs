//! One live subscription per logical view.
//!
//! A [`SubscriptionSlot`] owns at most one active subscription. Rebinding
//! (the user changed a filter or sort) tears the previous one down *and
//! waits for its forwarding task to finish* before the new one starts, so a
//! replaced subscription can never invoke its callback again — no duplicate
//! or stale renders into a view that has moved on.

use std::sync::Arc;

use collabbeats_backend::{Doc, DocumentStore, Query};

use crate::error::Result;

struct ActiveSub {
    task: tokio::task::JoinHandle<()>,
}

/// Holder for the single active subscription of a view.
#[derive(Default)]
pub struct SubscriptionSlot {
    active: Option<ActiveSub>,
}

impl SubscriptionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `on_change` to the query's result set. The callback fires
    /// synchronously with the initial result set, then on every change.
    /// Any previous subscription held by this slot is cancelled first.
    ///
    /// Query failures (missing index, permission denial) are returned so
    /// the caller can fall back to a default list or empty state.
    pub async fn bind<F>(
        &mut self,
        store: &Arc<dyn DocumentStore>,
        query: &Query,
        mut on_change: F,
    ) -> Result<()>
    where
        F: FnMut(Vec<Doc>) + Send + 'static,
    {
        self.close().await;

        let mut watch = store.watch(query).await?;
        on_change(watch.snapshot());

        let task = tokio::spawn(async move {
            while watch.changed().await {
                on_change(watch.snapshot());
            }
        });
        self.active = Some(ActiveSub { task });
        Ok(())
    }

    /// Tear down the active subscription, waiting until its callback can no
    /// longer fire. Idempotent.
    pub async fn close(&mut self) {
        if let Some(sub) = self.active.take() {
            sub.task.abort();
            let _ = sub.task.await;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for SubscriptionSlot {
    fn drop(&mut self) {
        // best effort on an unawaited drop; `close` is the real teardown
        if let Some(sub) = &self.active {
            sub.task.abort();
        }
    }
}
