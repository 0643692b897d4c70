use thiserror::Error;

/// Why a username was refused at registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("must be at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("only letters, digits, '_' and '-' are allowed")]
    InvalidCharacters,
}
