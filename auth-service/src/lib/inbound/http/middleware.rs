use auth::GateOutcome;
use auth::SecurityContext;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Bearer token filter.
///
/// Runs once per request, before routing reaches any handler. Attaches a
/// `SecurityContext` (and an `AuthenticatedUser` when a token checks out) to
/// the request extensions, or short-circuits with 401 when a presented token
/// is invalid. Requests that already carry a context pass through untouched.
pub async fn request_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.extensions().get::<SecurityContext>().is_some() {
        return Ok(next.run(req).await);
    }

    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match state.gate.evaluate(authorization.as_deref()).await {
        GateOutcome::Anonymous => {
            req.extensions_mut().insert(SecurityContext::Anonymous);
        }
        GateOutcome::Authenticated(user) => {
            tracing::debug!(username = %user.username, "Request authenticated");
            req.extensions_mut().insert(user.clone());
            req.extensions_mut()
                .insert(SecurityContext::Authenticated(user));
        }
        GateOutcome::Rejected(reason) => {
            tracing::warn!(
                path = %req.uri().path(),
                reason = %reason,
                "Bearer token rejected"
            );
            return Err(ApiError::unauthorized());
        }
    }

    Ok(next.run(req).await)
}

/// Route access check, evaluated after `request_gate`.
pub async fn enforce_access_policy(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authenticated = req
        .extensions()
        .get::<SecurityContext>()
        .is_some_and(SecurityContext::is_authenticated);

    if !state.policy.allows(req.uri().path(), authenticated) {
        tracing::debug!(
            path = %req.uri().path(),
            "Anonymous request to protected route"
        );
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(req).await)
}
