use thiserror::Error;

/// Errors produced by the backend capability layer.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Operation required a signed-in identity.
    #[error("Not signed in")]
    Unauthenticated,

    /// The backend's security rules rejected the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The query combines filters and ordering in a way that needs a
    /// composite index which has not been provisioned.
    #[error("Query on '{collection}' requires a composite index on [{fields}]")]
    MissingIndex { collection: String, fields: String },

    /// A transaction read a document that was modified before commit.
    #[error("Transaction conflict")]
    Conflict,

    /// A lookup expected a document/blob that does not exist.
    #[error("Record not found")]
    NotFound,

    /// Authentication failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// JSON (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Authentication error taxonomy, matching the messages the product shows.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Email or password is incorrect")]
    WrongCredentials,

    #[error("An account already exists for this email. Try logging in.")]
    EmailInUse,

    #[error("Password should be at least 6 characters")]
    WeakPassword,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BackendError>;
