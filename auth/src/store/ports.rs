use async_trait::async_trait;

use super::errors::StoreError;
use crate::identity::Identity;
use crate::identity::NewIdentity;
use crate::identity::Username;

/// Persistence port for user identities.
///
/// Read-only from the authentication core apart from registration.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve identity by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Stored identity
    ///
    /// # Errors
    /// * `NotFound` - No identity with this username (expected outcome)
    /// * `Backend` - Storage operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Identity, StoreError>;

    /// Persist a newly registered identity.
    ///
    /// # Arguments
    /// * `identity` - Username and password hash to store
    ///
    /// # Returns
    /// Stored identity with store-assigned id and creation time
    ///
    /// # Errors
    /// * `AlreadyExists` - Username is already taken
    /// * `Backend` - Storage operation failed
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError>;
}
