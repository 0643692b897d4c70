use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid work factor {0}: bcrypt cost must be between 4 and 31")]
    InvalidCost(u32),

    #[error("Password too long: maximum {max} bytes, got {actual}")]
    TooLong { max: usize, actual: usize },
}
