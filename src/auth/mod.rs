// Authentication module
// Password hashing, JWT issuance and verification, token revocation and
// the request extractors that tie them together

pub mod cookie;
pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod revoked;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use cookie::CookieSettings;
pub use error::AuthError;
pub use middleware::{AuthenticatedCaptain, AuthenticatedUser};
pub use models::{AccountKind, LoginRequest, MessageResponse};
pub use password::PasswordService;
pub use revoked::{MemoryRevokedTokenStore, PgRevokedTokenStore, RevokedTokenStore};
pub use session::SessionService;
pub use token::{Claims, TokenService};
