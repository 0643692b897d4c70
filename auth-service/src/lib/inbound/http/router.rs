use std::sync::Arc;
use std::time::Duration;

use auth::AccessPolicy;
use auth::Authenticator;
use auth::RequestGate;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::home::home;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::enforce_access_policy;
use super::middleware::request_gate;

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub gate: Arc<RequestGate>,
    pub policy: Arc<AccessPolicy>,
    pub app_name: Arc<str>,
}

/// Routes reachable without a token. Everything else requires one.
pub fn default_access_policy() -> AccessPolicy {
    AccessPolicy::new().permit("/register").permit("/login")
}

pub fn create_router(
    authenticator: Arc<Authenticator>,
    gate: Arc<RequestGate>,
    policy: Arc<AccessPolicy>,
    app_name: &str,
) -> Router {
    let state = AppState {
        authenticator,
        gate,
        policy,
        app_name: Arc::from(app_name),
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out of the span: they carry bearer tokens.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Layers wrap bottom-up: the gate runs before the access policy.
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/", get(home))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_access_policy,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), request_gate))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::InMemoryCredentialStore;
    use auth::ManualClock;
    use auth::PasswordHasher;
    use auth::SigningKey;
    use auth::TokenService;
    use auth::TokenSettings;
    use axum::http::header;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;

    struct Harness {
        router: Router,
        tokens: Arc<TokenService>,
        clock: Arc<ManualClock>,
    }

    async fn harness() -> Harness {
        let clock = Arc::new(ManualClock::default());
        let key = SigningKey::from_bytes(b"router_test_secret_at_least_32_bytes").unwrap();
        let tokens = Arc::new(TokenService::with_clock(
            key,
            TokenSettings::default(),
            clock.clone(),
        ));
        let store = Arc::new(InMemoryCredentialStore::new());
        let authenticator = Arc::new(
            Authenticator::new(
                store.clone(),
                PasswordHasher::new(PasswordHasher::MIN_COST).unwrap(),
                tokens.clone(),
            )
            .unwrap(),
        );
        authenticator
            .register(auth::Credentials::new("alice", "s3cret"))
            .await
            .unwrap();

        let router = create_router(
            authenticator,
            Arc::new(RequestGate::new(tokens.clone(), store)),
            Arc::new(default_access_policy()),
            "gatekeeper",
        );

        Harness {
            router,
            tokens,
            clock,
        }
    }

    fn home_request(authorization: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let harness = harness().await;

        let response = harness.router.oneshot(home_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_route_with_valid_token() {
        let harness = harness().await;
        let token = harness.tokens.issue("alice").unwrap().token;

        let response = harness
            .router
            .oneshot(home_request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_with_expired_token() {
        let harness = harness().await;
        let token = harness.tokens.issue("alice").unwrap().token;
        harness.clock.advance(chrono::Duration::seconds(601));

        let response = harness
            .router
            .oneshot(home_request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_route_with_invalid_token_is_rejected() {
        let harness = harness().await;

        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::AUTHORIZATION, "Bearer forged.token.value")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"alice","password":"s3cret"}"#))
            .unwrap();

        let response = harness.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_default_access_policy() {
        let policy = default_access_policy();

        assert!(policy.allows("/register", false));
        assert!(policy.allows("/login", false));
        assert!(!policy.allows("/", false));
        assert!(!policy.allows("/products", false));
    }
}
