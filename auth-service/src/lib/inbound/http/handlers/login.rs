use auth::Credentials;
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

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let issued = state
        .authenticator
        .login(Credentials::new(body.username, body.password))
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}
