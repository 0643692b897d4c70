use std::env;

use auth::jwt::service::DEFAULT_ISSUER;
use auth::jwt::service::DEFAULT_TOKEN_LIFETIME_MINUTES;
use auth::KeyError;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::SigningKey;
use auth::TokenError;
use auth::TokenSettings;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ISSUER.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// base64-encoded signing secret
    pub secret: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl JwtConfig {
    /// Decode the signing secret. Startup must abort on error.
    pub fn signing_key(&self) -> Result<SigningKey, KeyError> {
        SigningKey::from_base64(&self.secret)
    }

    /// Token issuance settings. Startup must abort on error.
    pub fn token_settings(&self) -> Result<TokenSettings, TokenError> {
        TokenSettings::new(self.issuer.clone(), self.expiration_minutes)
    }
}

fn default_expiration_minutes() -> i64 {
    DEFAULT_TOKEN_LIFETIME_MINUTES
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub cost: u32,
}

impl PasswordConfig {
    pub fn hasher(&self) -> Result<PasswordHasher, PasswordError> {
        PasswordHasher::new(self.cost)
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            cost: PasswordHasher::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH_JWT__SECRET, AUTH_SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH_JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::with_prefix("AUTH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        configuration.try_deserialize()
    }
}
