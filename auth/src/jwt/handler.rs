use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;
use super::key::SigningKey;

/// JWT codec for encoding and decoding access tokens.
///
/// Decoding checks structure, algorithm, signature, issuer and required
/// claims. It deliberately skips the expiration check; expiry is evaluated
/// separately against an injected clock.
pub struct JwtHandler {
    key: SigningKey,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `key` - HMAC signing key
    /// * `issuer` - Issuer written into and required from every token
    pub fn new(key: SigningKey, issuer: &str) -> Self {
        let mut validation = Validation::new(key.algorithm());
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "iss", "exp"]);
        validation.set_issuer(&[issuer]);

        Self { key, validation }
    }

    /// Encode claims into a compact JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.key.algorithm());

        encode(&header, claims, self.key.encoding_key())
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and verify a JWT.
    ///
    /// # Errors
    /// * `Malformed` - Token structure, encoding or claims are invalid
    /// * `BadSignature` - Signature does not verify against the key
    /// * `AlgorithmMismatch` - Header algorithm differs from the key's
    /// * `InvalidIssuer` - Issuer claim is not the configured issuer
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
                ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}
