use std::sync::Arc;

use thiserror::Error;

use crate::identity::Identity;
use crate::identity::UserId;
use crate::identity::Username;
use crate::jwt::TokenError;
use crate::jwt::TokenService;
use crate::store::CredentialStore;
use crate::store::StoreError;

const BEARER_SCHEME: &str = "Bearer";

/// Identity established for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Username,
}

impl From<Identity> for AuthenticatedUser {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.id,
            username: identity.username,
        }
    }
}

/// Per-request security context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SecurityContext {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedUser),
}

impl SecurityContext {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            SecurityContext::Authenticated(user) => Some(user),
            SecurityContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

/// Why a presented bearer token was refused. Logged, never returned to clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("token rejected: {0}")]
    Token(#[from] TokenError),

    #[error("token subject is not a valid username")]
    InvalidSubject,

    #[error("token subject has no identity")]
    UnknownSubject,

    #[error("identity lookup failed: {0}")]
    Lookup(StoreError),
}

/// Result of running the gate on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// No bearer token; the access policy decides.
    Anonymous,
    Authenticated(AuthenticatedUser),
    /// Bearer token present but invalid; the request must be short-circuited.
    Rejected(Rejection),
}

impl GateOutcome {
    /// Security context to attach when the request proceeds.
    pub fn context(&self) -> Option<SecurityContext> {
        match self {
            GateOutcome::Anonymous => Some(SecurityContext::Anonymous),
            GateOutcome::Authenticated(user) => Some(SecurityContext::Authenticated(user.clone())),
            GateOutcome::Rejected(_) => None,
        }
    }
}

/// Bearer token filter run once per inbound request.
pub struct RequestGate {
    token_service: Arc<TokenService>,
    store: Arc<dyn CredentialStore>,
}

impl RequestGate {
    pub fn new(token_service: Arc<TokenService>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            token_service,
            store,
        }
    }

    /// Evaluate the raw `Authorization` header value of a request.
    ///
    /// A missing header, or one that does not use the bearer scheme, leaves the
    /// request anonymous. A bearer token is verified once; its claims must then
    /// name an existing identity and be unexpired.
    pub async fn evaluate(&self, authorization: Option<&str>) -> GateOutcome {
        let Some(token) = authorization.and_then(bearer_token) else {
            return GateOutcome::Anonymous;
        };

        match self.authenticate(token).await {
            Ok(identity) => GateOutcome::Authenticated(identity.into()),
            Err(rejection) => GateOutcome::Rejected(rejection),
        }
    }

    async fn authenticate(&self, token: &str) -> Result<Identity, Rejection> {
        let claims = self.token_service.verify(token)?;
        let username = Username::new(claims.sub.as_str()).map_err(|_| Rejection::InvalidSubject)?;

        let identity = self
            .store
            .find_by_username(&username)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => Rejection::UnknownSubject,
                other => Rejection::Lookup(other),
            })?;

        self.token_service
            .check_claims_for(&claims, identity.username.as_str())?;

        Ok(identity)
    }
}

/// Token part of a `Bearer <token>` header value. The scheme is
/// case-insensitive (RFC 7235).
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}
