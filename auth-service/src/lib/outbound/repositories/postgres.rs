use async_trait::async_trait;
use auth::identity::Identity;
use auth::identity::NewIdentity;
use auth::identity::UserId;
use auth::identity::Username;
use auth::CredentialStore;
use auth::StoreError;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = StoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|e| {
            StoreError::Backend(format!("Stored username for {} is invalid: {}", row.id, e))
        })?;

        Ok(Identity {
            id: UserId(row.id),
            username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_username(&self, username: &Username) -> Result<Identity, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            Some(r) => r.try_into(),
            None => Err(StoreError::NotFound(username.to_string())),
        }
    }

    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            INSERT INTO users (id, username, password_hash, created_at, last_modified)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(identity.username.as_str())
        .bind(identity.password_hash.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::AlreadyExists(identity.username.to_string());
                }
            }
            StoreError::Backend(e.to_string())
        })?;

        row.try_into()
    }
}
