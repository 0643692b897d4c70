pub mod claims;
pub mod errors;
pub mod handler;
pub mod key;
pub mod service;

pub use claims::Claims;
pub use errors::KeyError;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use key::SigningKey;
pub use service::IssuedToken;
pub use service::TokenService;
pub use service::TokenSettings;
