use std::sync::Arc;

use auth::Authenticator;
use auth::CredentialStore;
use auth::InMemoryCredentialStore;
use auth::RequestGate;
use auth::TokenService;
use auth_service::config::Config;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::http::router::default_access_policy;
use auth_service::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    // Fail fast: a missing or short secret must never reach request handling.
    let signing_key = config
        .jwt
        .signing_key()
        .map_err(|e| anyhow::anyhow!("Invalid jwt.secret: {}", e))?;
    let token_settings = config
        .jwt
        .token_settings()
        .map_err(|e| anyhow::anyhow!("Invalid jwt.expiration_minutes: {}", e))?;
    let hasher = config
        .password
        .hasher()
        .map_err(|e| anyhow::anyhow!("Invalid password.cost: {}", e))?;

    tracing::info!(
        app = %config.app.name,
        http_port = config.server.http_port,
        issuer = %config.jwt.issuer,
        expiration_minutes = config.jwt.expiration_minutes,
        algorithm = ?signing_key.algorithm(),
        password_cost = hasher.cost(),
        "Configuration loaded"
    );

    let store: Arc<dyn CredentialStore> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(PostgresCredentialStore::new(pg_pool))
        }
        None => {
            tracing::warn!("No database configured, credentials are kept in memory");
            Arc::new(InMemoryCredentialStore::new())
        }
    };

    let token_service = Arc::new(TokenService::new(signing_key, token_settings));
    let authenticator = Arc::new(
        Authenticator::new(Arc::clone(&store), hasher, Arc::clone(&token_service))
            .map_err(|e| anyhow::anyhow!("Failed to initialise authenticator: {}", e))?,
    );
    let gate = Arc::new(RequestGate::new(token_service, store));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        authenticator,
        gate,
        Arc::new(default_access_policy()),
        &config.app.name,
    );

    axum::serve(http_listener, http_application).await?;
    tracing::info!("Server exited successfully");

    Ok(())
}
