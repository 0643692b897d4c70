use thiserror::Error;

/// Error type for credential store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User not found with username: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    AlreadyExists(String),

    #[error("Credential store error: {0}")]
    Backend(String),
}
