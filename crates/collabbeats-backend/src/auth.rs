//! The authentication capability: identity lifecycle plus change
//! notification.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::Result;

/// The signed-in identity as reported by the backend.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Authenticated-identity provider.
///
/// `watch_identity` mirrors the backend SDK's auth-state callback: the
/// receiver yields the current identity immediately and again on every
/// sign-in/sign-out.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Sign in to an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Sign out. Idempotent.
    async fn sign_out(&self);

    /// The identity currently signed in, if any.
    fn current_user(&self) -> Option<AuthUser>;

    /// Subscribe to identity changes.
    fn watch_identity(&self) -> watch::Receiver<Option<AuthUser>>;

    /// Update the signed-in account's display name.
    async fn set_display_name(&self, name: &str) -> Result<()>;

    /// Delete the signed-in account (sign-up rollback path).
    async fn delete_current(&self) -> Result<()>;
}
