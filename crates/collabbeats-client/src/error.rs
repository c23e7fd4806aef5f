use collabbeats_backend::BackendError;
use thiserror::Error;

/// Errors surfaced by the feature services.
///
/// Every action-level failure ends up as user-visible text; nothing here is
/// fatal — the view stays interactive and the triggering control re-enables
/// for retry.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Action attempted without a signed-in identity.
    #[error("Please sign in to continue.")]
    SignInRequired,

    /// User input rejected before reaching the backend.
    #[error("{0}")]
    Validation(String),

    /// Action not permitted for this identity (e.g. deleting someone
    /// else's beat).
    #[error("{0}")]
    Forbidden(String),

    /// GIF search API failure.
    #[error("Failed to load GIFs.")]
    Gif(String),

    /// Anything the backend reported.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Backend(BackendError::from(e))
    }
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The dismissible message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Backend(BackendError::MissingIndex { .. }) => {
                "This filter is setting up its search index. Try again soon.".to_string()
            }
            ClientError::Backend(BackendError::Conflict) => {
                "Something went wrong. Please try again.".to_string()
            }
            ClientError::Backend(BackendError::Auth(e)) => e.to_string(),
            ClientError::Backend(BackendError::Unauthenticated) => {
                ClientError::SignInRequired.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
