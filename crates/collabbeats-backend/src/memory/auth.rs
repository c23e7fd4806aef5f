//! In-memory authentication gateway.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::auth::{AuthGateway, AuthUser};
use crate::error::{AuthError, BackendError, Result};

struct Account {
    uid: String,
    email: String,
    password: String,
    display_name: Option<String>,
}

/// The in-memory [`AuthGateway`].
pub struct MemoryAuth {
    accounts: Mutex<Vec<Account>>,
    current: watch::Sender<Option<AuthUser>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(Vec::new()),
            current,
        }
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

fn user_of(account: &Account) -> AuthUser {
    AuthUser {
        uid: account.uid.clone(),
        email: account.email.clone(),
        display_name: account.display_name.clone(),
    }
}

#[async_trait]
impl AuthGateway for MemoryAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        if !valid_email(email) {
            return Err(AuthError::InvalidEmail.into());
        }
        if password.len() < 6 {
            return Err(AuthError::WeakPassword.into());
        }

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == email) {
            return Err(AuthError::EmailInUse.into());
        }

        let account = Account {
            uid: Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            display_name: None,
        };
        let user = user_of(&account);
        accounts.push(account);

        self.current.send_replace(Some(user.clone()));
        tracing::debug!(uid = %user.uid, "account created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .ok_or(AuthError::WrongCredentials)?;
        let user = user_of(account);
        drop(accounts);

        self.current.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) {
        self.current.send_replace(None);
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.borrow().clone()
    }

    fn watch_identity(&self) -> watch::Receiver<Option<AuthUser>> {
        self.current.subscribe()
    }

    async fn set_display_name(&self, name: &str) -> Result<()> {
        let me = self.current_user().ok_or(BackendError::Unauthenticated)?;
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.uid == me.uid)
            .ok_or(BackendError::NotFound)?;
        account.display_name = Some(name.to_string());
        let user = user_of(account);
        drop(accounts);

        self.current.send_replace(Some(user));
        Ok(())
    }

    async fn delete_current(&self) -> Result<()> {
        let me = self.current_user().ok_or(BackendError::Unauthenticated)?;
        let mut accounts = self.accounts.lock().unwrap();
        accounts.retain(|a| a.uid != me.uid);
        drop(accounts);

        self.current.send_replace(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_up_then_out_then_in() {
        let auth = MemoryAuth::new();
        let user = auth.sign_up("a@example.com", "secret1").await.unwrap();
        assert_eq!(auth.current_user().unwrap().uid, user.uid);

        auth.sign_out().await;
        assert!(auth.current_user().is_none());

        let again = auth.sign_in("a@example.com", "secret1").await.unwrap();
        assert_eq!(again.uid, user.uid);
    }

    #[tokio::test]
    async fn auth_error_taxonomy() {
        let auth = MemoryAuth::new();

        let err = auth.sign_up("not-an-email", "secret1").await.unwrap_err();
        assert!(matches!(err, BackendError::Auth(AuthError::InvalidEmail)));

        let err = auth.sign_up("a@example.com", "short").await.unwrap_err();
        assert!(matches!(err, BackendError::Auth(AuthError::WeakPassword)));

        auth.sign_up("a@example.com", "secret1").await.unwrap();
        let err = auth.sign_up("a@example.com", "secret2").await.unwrap_err();
        assert!(matches!(err, BackendError::Auth(AuthError::EmailInUse)));

        let err = auth.sign_in("a@example.com", "wrong!").await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Auth(AuthError::WrongCredentials)
        ));
    }

    #[tokio::test]
    async fn identity_watch_fires_on_changes() {
        let auth = MemoryAuth::new();
        let mut rx = auth.watch_identity();
        assert!(rx.borrow().is_none());

        auth.sign_up("a@example.com", "secret1").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_some());

        auth.sign_out().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn delete_current_rolls_back_the_account() {
        let auth = MemoryAuth::new();
        auth.sign_up("a@example.com", "secret1").await.unwrap();
        auth.delete_current().await.unwrap();

        assert!(auth.current_user().is_none());
        let err = auth.sign_in("a@example.com", "secret1").await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Auth(AuthError::WrongCredentials)
        ));
    }
}
