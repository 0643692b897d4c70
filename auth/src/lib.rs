//! Authentication core library
//!
//! Stateless bearer-token authentication for HTTP services:
//! - Password hashing (bcrypt with configurable work factor)
//! - Signed access token issuance and validation (JWT, HMAC-SHA2)
//! - Credential store port with an in-memory adapter
//! - Login/registration coordination
//! - Per-request bearer token gate and route access policy
//!
//! Framework-free. The hosting service adapts the gate and policy to its
//! own middleware stack.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(4).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{SigningKey, TokenService, TokenSettings};
//!
//! let key = SigningKey::from_bytes(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let tokens = TokenService::new(key, TokenSettings::default());
//! let issued = tokens.issue("alice").unwrap();
//! assert!(tokens.is_valid_for(&issued.token, "alice"));
//! ```

pub mod authenticator;
pub mod clock;
pub mod gate;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod store;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use gate::AuthenticatedUser;
pub use gate::GateOutcome;
pub use gate::RequestGate;
pub use gate::SecurityContext;
pub use identity::Credentials;
pub use identity::Identity;
pub use identity::Username;
pub use identity::UsernameError;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::KeyError;
pub use jwt::SigningKey;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use jwt::TokenSettings;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use policy::Access;
pub use policy::AccessPolicy;
pub use store::CredentialStore;
pub use store::InMemoryCredentialStore;
pub use store::StoreError;
