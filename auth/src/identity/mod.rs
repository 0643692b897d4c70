pub mod errors;
pub mod models;

pub use errors::UsernameError;
pub use models::Credentials;
pub use models::Identity;
pub use models::NewIdentity;
pub use models::UserId;
pub use models::Username;
