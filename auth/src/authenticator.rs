use std::sync::Arc;

use crate::identity::Credentials;
use crate::identity::Identity;
use crate::identity::NewIdentity;
use crate::identity::Username;
use crate::identity::UsernameError;
use crate::jwt::IssuedToken;
use crate::jwt::TokenError;
use crate::jwt::TokenService;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::store::CredentialStore;
use crate::store::StoreError;

/// Authentication coordinator combining credential lookup, password
/// verification and token issuance.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    password_hasher: PasswordHasher,
    token_service: Arc<TokenService>,
    // Verified against when the username is unknown so both failure paths cost the same.
    dummy_hash: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password must be at most {max} bytes, got {actual}")]
    PasswordTooLong { max: usize, actual: usize },

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),

    #[error("Credential store error: {0}")]
    StoreError(StoreError),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl From<StoreError> for AuthenticationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(username) => AuthenticationError::UsernameTaken(username),
            other => AuthenticationError::StoreError(other),
        }
    }
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `store` - Credential store port
    /// * `password_hasher` - Hasher configured with the work factor
    /// * `token_service` - Token issuer
    ///
    /// # Errors
    /// * `PasswordError` - Hashing the timing-equalization password failed
    pub fn new(
        store: Arc<dyn CredentialStore>,
        password_hasher: PasswordHasher,
        token_service: Arc<TokenService>,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = password_hasher.hash("timing-equalization-placeholder")?;

        Ok(Self {
            store,
            password_hasher,
            token_service,
            dummy_hash,
        })
    }

    /// Register a new identity.
    ///
    /// # Returns
    /// Stored identity
    ///
    /// # Errors
    /// * `InvalidUsername` - Username fails validation
    /// * `EmptyPassword` - Password is empty
    /// * `PasswordTooLong` - Password exceeds what bcrypt reads
    /// * `UsernameTaken` - Username is already registered
    /// * `PasswordError` - Hashing failed
    /// * `StoreError` - Persistence failed
    pub async fn register(&self, credentials: Credentials) -> Result<Identity, AuthenticationError> {
        let username = Username::new(credentials.username)?;

        if credentials.password.is_empty() {
            return Err(AuthenticationError::EmptyPassword);
        }
        if let Err(PasswordError::TooLong { max, actual }) =
            PasswordHasher::check_length(&credentials.password)
        {
            return Err(AuthenticationError::PasswordTooLong { max, actual });
        }

        let hasher = self.password_hasher;
        let password = credentials.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthenticationError::TaskFailed(e.to_string()))??;

        let identity = self
            .store
            .create(NewIdentity {
                username,
                password_hash,
            })
            .await?;

        tracing::info!(
            user_id = %identity.id,
            username = %identity.username,
            "Identity registered"
        );

        Ok(identity)
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown username, malformed username and wrong password are
    /// indistinguishable to the caller.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Credentials do not match a stored identity
    /// * `StoreError` - Credential lookup failed
    /// * `TokenError` - Token generation failed
    pub async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthenticationError> {
        let identity = match Username::new(credentials.username) {
            Ok(username) => match self.store.find_by_username(&username).await {
                Ok(identity) => Some(identity),
                Err(StoreError::NotFound(_)) => None,
                Err(e) => return Err(e.into()),
            },
            Err(_) => None,
        };

        let stored_hash = identity
            .as_ref()
            .map(|identity| identity.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());
        let password_matches = self
            .verify_password(credentials.password, stored_hash)
            .await?;

        match identity {
            Some(identity) if password_matches => {
                let issued = self.token_service.issue(identity.username.as_str())?;
                tracing::info!(username = %identity.username, "Login succeeded");
                Ok(issued)
            }
            _ => {
                tracing::info!("Login rejected: invalid credentials");
                Err(AuthenticationError::InvalidCredentials)
            }
        }
    }

    async fn verify_password(
        &self,
        password: String,
        stored_hash: String,
    ) -> Result<bool, AuthenticationError> {
        let hasher = self.password_hasher;

        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthenticationError::TaskFailed(e.to_string()))
    }
}
