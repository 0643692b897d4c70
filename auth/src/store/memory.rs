use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::errors::StoreError;
use super::ports::CredentialStore;
use crate::identity::Identity;
use crate::identity::NewIdentity;
use crate::identity::UserId;
use crate::identity::Username;

/// Process-local credential store keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    identities: RwLock<HashMap<Username, Identity>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &Username) -> Result<Identity, StoreError> {
        self.identities
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let mut identities = self.identities.write().await;

        if identities.contains_key(&identity.username) {
            return Err(StoreError::AlreadyExists(identity.username.to_string()));
        }

        let stored = Identity {
            id: UserId::new(),
            username: identity.username.clone(),
            password_hash: identity.password_hash,
            created_at: Utc::now(),
        };
        identities.insert(identity.username, stored.clone());

        Ok(stored)
    }
}
