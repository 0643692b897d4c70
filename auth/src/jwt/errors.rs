use thiserror::Error;

/// Error type for token operations.
///
/// Variants are kept distinct for diagnostics only; callers facing clients
/// collapse all of them into a single unauthorized outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature does not verify")]
    BadSignature,

    #[error("Token algorithm does not match the signing key")]
    AlgorithmMismatch,

    #[error("Token issuer is not trusted")]
    InvalidIssuer,

    #[error("Token is expired")]
    Expired,

    #[error("Token subject does not match the expected user")]
    SubjectMismatch,

    #[error("Token lifetime must be between 1 minute and one year, got {minutes} minutes")]
    InvalidLifetime { minutes: i64 },

    #[error("Token expiration is outside the representable time range")]
    ExpirationOutOfRange,
}

/// Error raised while deriving the signing key from configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Signing secret is not configured")]
    Missing,

    #[error("Signing secret is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
}
