//! Account lifecycle: sign-up with username reservation, sign-in, sign-out.

use std::sync::Arc;

use chrono::Utc;

use collabbeats_backend::{
    fields_of, run_transaction, AuthGateway, AuthUser, DocumentStore,
};
use collabbeats_shared::constants::{USERNAME_MAX_LEN, USERNAME_MIN_LEN};
use collabbeats_shared::UserProfile;
use serde_json::json;
use tokio::sync::watch;

use crate::error::{ClientError, Result};
use crate::paths;

/// Strip disallowed characters and clamp the length. Validation of the
/// result happens in [`AccountService::sign_up`].
pub fn clean_username(raw: &str) -> String {
    let mut cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    cleaned.truncate(USERNAME_MAX_LEN);
    cleaned
}

pub struct AccountService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthGateway>,
}

impl AccountService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self { store, auth }
    }

    /// Create the auth account, then reserve the username and write the
    /// profile in a single transaction. If the reservation fails (username
    /// taken, or any backend error), the freshly created auth account is
    /// rolled back so the email stays usable.
    pub async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<AuthUser> {
        let username = clean_username(username);
        if username.len() < USERNAME_MIN_LEN {
            return Err(ClientError::validation(
                "Username must be 3-20 characters using letters, numbers, _ . -",
            ));
        }
        if email.trim().is_empty() {
            return Err(ClientError::validation("Email is required."));
        }
        if password.is_empty() {
            return Err(ClientError::validation("Password is required."));
        }

        let user = self.auth.sign_up(email.trim(), password).await?;

        match self.reserve_and_create_profile(&user, &username).await {
            Ok(true) => {}
            Ok(false) => {
                self.rollback(&user).await;
                return Err(ClientError::validation(
                    "That username is taken. Try another one.",
                ));
            }
            Err(e) => {
                self.rollback(&user).await;
                return Err(e);
            }
        }

        self.auth.set_display_name(&username).await?;
        tracing::info!(uid = %user.uid, %username, "account created");
        Ok(AuthUser {
            display_name: Some(username),
            ..user
        })
    }

    /// Returns `false` when the username was already reserved.
    async fn reserve_and_create_profile(&self, user: &AuthUser, username: &str) -> Result<bool> {
        let lower = username.to_lowercase();
        let reservation = paths::usernames().doc(&lower);
        let profile_path = paths::users().doc(&user.uid);

        let profile = UserProfile {
            username: username.to_string(),
            username_lower: Some(lower.clone()),
            email: Some(user.email.clone()),
            created_at: Some(Utc::now()),
            ..Default::default()
        };
        let profile_fields = fields_of(&profile)?;

        let mut reservation_fields = collabbeats_backend::Fields::new();
        reservation_fields.insert("uid".to_string(), json!(user.uid));
        reservation_fields.insert("createdAt".to_string(), json!(Utc::now().to_rfc3339()));

        let reserved = run_transaction(&self.store, |tx| {
            let reservation = reservation.clone();
            let profile_path = profile_path.clone();
            let reservation_fields = reservation_fields.clone();
            let profile_fields = profile_fields.clone();
            Box::pin(async move {
                if tx.get(&reservation).await?.is_some() {
                    return Ok(false);
                }
                tx.set(&reservation, reservation_fields);
                tx.set(&profile_path, profile_fields);
                Ok(true)
            })
        })
        .await?;
        Ok(reserved)
    }

    async fn rollback(&self, user: &AuthUser) {
        if let Err(e) = self.auth.delete_current().await {
            tracing::error!(uid = %user.uid, error = %e, "sign-up rollback failed");
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        Ok(self.auth.sign_in(email.trim(), password).await?)
    }

    pub async fn sign_out(&self) {
        self.auth.sign_out().await;
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.auth.current_user()
    }

    /// Identity-change notifications, for header state.
    pub fn watch_identity(&self) -> watch::Receiver<Option<AuthUser>> {
        self.auth.watch_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_cleaning() {
        assert_eq!(clean_username("  DJ Nova!  "), "DJNova");
        assert_eq!(clean_username("beat.maker_99-x"), "beat.maker_99-x");
        assert_eq!(
            clean_username("averyveryverylongusernameindeed"),
            "averyveryverylonguse"
        );
        assert_eq!(clean_username("<script>"), "script");
    }
}
