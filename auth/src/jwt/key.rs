use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::KeyError;

/// HMAC signing key shared by issuance and verification.
///
/// The HMAC variant follows the key length: 64 bytes or more signs with
/// HS512, 48 or more with HS384, anything else (at least 32) with HS256.
#[derive(Clone)]
pub struct SigningKey {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl SigningKey {
    /// Smallest accepted key, in bytes (256 bits).
    pub const MIN_LENGTH: usize = 32;

    /// Derive the key from a base64-encoded secret.
    ///
    /// # Errors
    /// * `Missing` - Secret is empty
    /// * `InvalidBase64` - Secret does not decode
    /// * `TooShort` - Decoded secret is shorter than 32 bytes
    pub fn from_base64(secret: &str) -> Result<Self, KeyError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(KeyError::Missing);
        }

        let bytes = STANDARD
            .decode(secret)
            .map_err(|e| KeyError::InvalidBase64(e.to_string()))?;

        Self::from_bytes(&bytes)
    }

    /// Build the key from raw secret bytes.
    ///
    /// # Errors
    /// * `TooShort` - Secret is shorter than 32 bytes
    pub fn from_bytes(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.len() < Self::MIN_LENGTH {
            return Err(KeyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: secret.len(),
            });
        }

        let algorithm = match secret.len() {
            n if n >= 64 => Algorithm::HS512,
            n if n >= 48 => Algorithm::HS384,
            _ => Algorithm::HS256,
        };

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
