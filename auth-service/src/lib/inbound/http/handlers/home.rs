use auth::AuthenticatedUser;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn home(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<HomeResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        HomeResponseData {
            message: format!("Welcome to {}", state.app_name),
            username: user.username.as_str().to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeResponseData {
    pub message: String,
    pub username: String,
}
