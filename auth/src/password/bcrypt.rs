use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Salted adaptive hashing (internally uses bcrypt). The work factor is the
/// bcrypt cost, i.e. log2 of the number of key expansion rounds.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Work factor used when none is configured.
    pub const DEFAULT_COST: u32 = 14;
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;
    /// bcrypt only reads this many bytes of input.
    pub const MAX_PASSWORD_BYTES: usize = 72;

    /// Create a new password hasher with the given work factor.
    ///
    /// # Errors
    /// * `InvalidCost` - Cost is outside the range bcrypt accepts (4..=31)
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(Self::MIN_COST..=Self::MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password securely.
    ///
    /// A fresh random salt is generated on every call and embedded in the
    /// returned modular crypt string (`$2b$<cost>$<salt><hash>`).
    ///
    /// # Errors
    /// * `TooLong` - Password exceeds 72 bytes
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Self::check_length(password)?;
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Reject input bcrypt would silently truncate.
    ///
    /// # Errors
    /// * `TooLong` - Password exceeds 72 bytes
    pub fn check_length(password: &str) -> Result<(), PasswordError> {
        if password.len() > Self::MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong {
                max: Self::MAX_PASSWORD_BYTES,
                actual: password.len(),
            });
        }
        Ok(())
    }

    /// Verify a password against a stored hash.
    ///
    /// Fails closed: a malformed or unsupported hash string yields `false`,
    /// and so does a password longer than 72 bytes.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if Self::check_length(password).is_err() {
            return false;
        }

        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
        }
    }
}
