use auth::Credentials;
use auth::Identity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .authenticator
        .register(Credentials::new(body.username, body.password))
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::CREATED, identity.into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    username: String,
    password: String,
}

/// Registered identity. The password hash is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for RegisterResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            username: identity.username.as_str().to_string(),
            created_at: identity.created_at,
        }
    }
}
