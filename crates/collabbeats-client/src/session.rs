//! Signed-in-identity helpers shared by the feature services.

use collabbeats_backend::{AuthGateway, AuthUser};

use crate::error::{ClientError, Result};

/// The current identity, or [`ClientError::SignInRequired`].
pub fn require_user(auth: &dyn AuthGateway) -> Result<AuthUser> {
    auth.current_user().ok_or(ClientError::SignInRequired)
}

/// The display-name fallback chain used wherever a username is needed and
/// the profile document has none: auth display name, then the email's
/// local part, then `"user"`.
pub fn fallback_username(user: &AuthUser) -> String {
    if let Some(name) = user.display_name.as_deref() {
        if !name.trim().is_empty() {
            return name.to_string();
        }
    }
    match user.email.split_once('@') {
        Some((local, _)) if !local.is_empty() => local.to_string(),
        _ => "user".to_string(),
    }
}
