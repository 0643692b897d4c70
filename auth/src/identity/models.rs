use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::errors::UsernameError;

/// Stored user record.
///
/// Owned by the credential store. Only the password hash is kept; the
/// plaintext never outlives a single register or login call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Identity about to be persisted. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub username: Username,
    pub password_hash: String,
}

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique login name: 3 to 32 letters, digits, `_` or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Validate and wrap a raw username.
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - Outside 3..=32 characters
    /// * `InvalidCharacters` - Anything besides letters, digits, `_` and `-`
    pub fn new(username: impl Into<String>) -> Result<Self, UsernameError> {
        let username = username.into();

        match username.chars().count() {
            actual if actual < Self::MIN_LENGTH => {
                return Err(UsernameError::TooShort {
                    min: Self::MIN_LENGTH,
                    actual,
                })
            }
            actual if actual > Self::MAX_LENGTH => {
                return Err(UsernameError::TooLong {
                    max: Self::MAX_LENGTH,
                    actual,
                })
            }
            _ => {}
        }

        if !username.chars().all(Self::is_allowed) {
            return Err(UsernameError::InvalidCharacters);
        }

        Ok(Self(username))
    }

    fn is_allowed(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '-'
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login or registration attempt.
///
/// Lives for one request. `Debug` never prints the password.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
