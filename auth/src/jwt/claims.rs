use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Registered claims carried by an access token.
///
/// Field names follow RFC 7519 so tokens interoperate with any JWT library.
/// Unknown claims are rejected when decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for `subject` issued at `issued_at` and valid for `lifetime`.
    ///
    /// # Errors
    /// * `ExpirationOutOfRange` - `issued_at + lifetime` overflows
    pub fn new(
        subject: impl ToString,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let expiration = issued_at
            .checked_add_signed(lifetime)
            .ok_or(TokenError::ExpirationOutOfRange)?;

        Ok(Self {
            sub: subject.to_string(),
            iss: issuer.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at exactly its expiration second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }

    /// Validity window in seconds.
    pub fn lifetime_seconds(&self) -> i64 {
        self.exp - self.iat
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
