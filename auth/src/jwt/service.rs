use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::errors::TokenError;
use super::handler::JwtHandler;
use super::key::SigningKey;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Issuer written into tokens when none is configured.
pub const DEFAULT_ISSUER: &str = "gatekeeper";

/// Access token lifetime when none is configured.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 10;

/// Longest accepted access token lifetime (one year).
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 60 * 24 * 365;

/// Token issuance parameters.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub lifetime: Duration,
}

impl TokenSettings {
    /// Build settings from a lifetime in minutes.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Lifetime is not within 1..=525600 minutes
    pub fn new(issuer: impl Into<String>, lifetime_minutes: i64) -> Result<Self, TokenError> {
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&lifetime_minutes) {
            return Err(TokenError::InvalidLifetime {
                minutes: lifetime_minutes,
            });
        }

        Ok(Self {
            issuer: issuer.into(),
            lifetime: Duration::minutes(lifetime_minutes),
        })
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            lifetime: Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
        }
    }
}

/// Freshly minted access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates stateless access tokens.
///
/// Signature verification (`verify`) and expiry (`is_expired`) are separate
/// steps so every failure mode surfaces as its own `TokenError`.
pub struct TokenService {
    handler: JwtHandler,
    settings: TokenSettings,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service backed by the system clock.
    pub fn new(key: SigningKey, settings: TokenSettings) -> Self {
        Self::with_clock(key, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(key: SigningKey, settings: TokenSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            handler: JwtHandler::new(key, &settings.issuer),
            settings,
            clock,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.settings.lifetime
    }

    /// Mint a signed token for `username`.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Configured lifetime is not positive
    /// * `ExpirationOutOfRange` - Expiration overflows the calendar
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, username: &str) -> Result<IssuedToken, TokenError> {
        let lifetime = self.settings.lifetime;
        if lifetime <= Duration::zero() {
            return Err(TokenError::InvalidLifetime {
                minutes: lifetime.num_minutes(),
            });
        }

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .ok_or(TokenError::ExpirationOutOfRange)?;
        let claims = Claims::new(username, &self.settings.issuer, issued_at, lifetime)?;
        let token = self.handler.encode(&claims)?;

        tracing::debug!(
            subject = %username,
            expires_at = claims.exp,
            "Issued access token"
        );

        Ok(IssuedToken { token, expires_at })
    }

    /// Parse and verify a token without checking expiry.
    ///
    /// # Errors
    /// * `Malformed`, `BadSignature`, `AlgorithmMismatch`, `InvalidIssuer`
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.handler.decode(token)
    }

    /// Verified subject of a token.
    pub fn subject(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token).map(|claims| claims.sub)
    }

    pub fn is_expired(&self, claims: &Claims) -> bool {
        claims.is_expired(self.clock.now().timestamp())
    }

    /// Full validation of `token` for `expected_username`.
    ///
    /// # Errors
    /// * Any `verify` error
    /// * `SubjectMismatch` - Token was issued to another user
    /// * `Expired` - Expiration time has passed
    pub fn validate_for(&self, token: &str, expected_username: &str) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        self.check_claims_for(&claims, expected_username)?;
        Ok(claims)
    }

    /// Subject and expiry checks on claims that already passed `verify`.
    ///
    /// # Errors
    /// * `SubjectMismatch` - Token was issued to another user
    /// * `Expired` - Expiration time has passed
    pub fn check_claims_for(&self, claims: &Claims, expected_username: &str) -> Result<(), TokenError> {
        if claims.sub != expected_username {
            return Err(TokenError::SubjectMismatch);
        }

        if self.is_expired(claims) {
            return Err(TokenError::Expired);
        }

        Ok(())
    }

    pub fn is_valid_for(&self, token: &str, expected_username: &str) -> bool {
        self.validate_for(token, expected_username).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::clock::ManualClock;

    fn service() -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        ));
        let key = SigningKey::from_bytes(b"test_secret_key_at_least_32_bytes!").unwrap();
        let service = TokenService::with_clock(key, TokenSettings::default(), clock.clone());
        (service, clock)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let (service, _) = service();

        for username in ["alice", "bob_99", "x-y-z", "Ünïcødé"] {
            let issued = service.issue(username).expect("Failed to issue token");
            let claims = service.verify(&issued.token).expect("Failed to verify");

            assert_eq!(claims.sub, username);
            assert_eq!(claims.iss, DEFAULT_ISSUER);
        }
    }

    #[test]
    fn test_issued_token_lifetime_is_ten_minutes() {
        let (service, clock) = service();

        let issued = service.issue("alice").unwrap();
        let claims = service.verify(&issued.token).unwrap();

        assert_eq!(claims.exp - claims.iat, 600);
        assert_eq!(claims.iat, clock.now().timestamp());
        assert_eq!(issued.expires_at, clock.now() + Duration::minutes(10));
    }

    #[test]
    fn test_valid_until_expiration() {
        let (service, clock) = service();
        let token = service.issue("alice").unwrap().token;

        assert!(service.is_valid_for(&token, "alice"));

        clock.advance(Duration::seconds(600));
        assert!(service.is_valid_for(&token, "alice"));

        clock.advance(Duration::seconds(1));
        assert_eq!(
            service.validate_for(&token, "alice"),
            Err(TokenError::Expired)
        );
        assert!(!service.is_valid_for(&token, "alice"));
    }

    #[test]
    fn test_verify_ignores_expiry() {
        let (service, clock) = service();
        let token = service.issue("alice").unwrap().token;

        clock.advance(Duration::hours(3));

        let claims = service.verify(&token).expect("verify must not check expiry");
        assert!(service.is_expired(&claims));
    }

    #[test]
    fn test_subject_mismatch() {
        let (service, _) = service();
        let token = service.issue("alice").unwrap().token;

        assert_eq!(
            service.validate_for(&token, "bob"),
            Err(TokenError::SubjectMismatch)
        );
        assert!(!service.is_valid_for(&token, "bob"));
    }

    #[test]
    fn test_subject_extraction() {
        let (service, _) = service();
        let token = service.issue("alice").unwrap().token;

        assert_eq!(service.subject(&token), Ok("alice".to_string()));
        assert!(service.subject("garbage").is_err());
    }

    #[test]
    fn test_configured_lifetime() {
        let clock = Arc::new(ManualClock::default());
        let key = SigningKey::from_bytes(b"test_secret_key_at_least_32_bytes!").unwrap();
        let settings = TokenSettings {
            issuer: "custom".to_string(),
            lifetime: Duration::minutes(30),
        };
        let service = TokenService::with_clock(key, settings, clock);

        let claims = service.verify(&service.issue("alice").unwrap().token).unwrap();

        assert_eq!(claims.lifetime_seconds(), 30 * 60);
        assert_eq!(claims.iss, "custom");
    }

    #[test]
    fn test_check_claims_for_verified_claims() {
        let (service, clock) = service();
        let claims = service
            .verify(&service.issue("alice").unwrap().token)
            .unwrap();

        assert_eq!(service.check_claims_for(&claims, "alice"), Ok(()));
        assert_eq!(
            service.check_claims_for(&claims, "bob"),
            Err(TokenError::SubjectMismatch)
        );

        clock.advance(Duration::seconds(601));
        assert_eq!(
            service.check_claims_for(&claims, "alice"),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_settings_reject_out_of_range_lifetime() {
        for minutes in [0, -5, MAX_TOKEN_LIFETIME_MINUTES + 1, 200_000_000_000] {
            assert_eq!(
                TokenSettings::new("gatekeeper", minutes).unwrap_err(),
                TokenError::InvalidLifetime { minutes }
            );
        }

        let settings = TokenSettings::new("gatekeeper", 10).unwrap();
        assert_eq!(settings.lifetime, Duration::minutes(10));
        assert!(TokenSettings::new("gatekeeper", MAX_TOKEN_LIFETIME_MINUTES).is_ok());
    }

    #[test]
    fn test_issue_refuses_non_positive_lifetime() {
        let key = SigningKey::from_bytes(b"test_secret_key_at_least_32_bytes!").unwrap();
        let settings = TokenSettings {
            issuer: DEFAULT_ISSUER.to_string(),
            lifetime: Duration::minutes(-5),
        };
        let service = TokenService::new(key, settings);

        assert_eq!(
            service.issue("alice"),
            Err(TokenError::InvalidLifetime { minutes: -5 })
        );
    }

    #[test]
    fn test_issue_with_overflowing_lifetime_does_not_panic() {
        let key = SigningKey::from_bytes(b"test_secret_key_at_least_32_bytes!").unwrap();
        let settings = TokenSettings {
            issuer: DEFAULT_ISSUER.to_string(),
            lifetime: Duration::days(100_000_000),
        };
        let service = TokenService::new(key, settings);

        assert_eq!(
            service.issue("alice"),
            Err(TokenError::ExpirationOutOfRange)
        );
    }
}
