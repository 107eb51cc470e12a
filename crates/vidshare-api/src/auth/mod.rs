//! Bearer token authentication
//!
//! Tokens are HS256 JWTs issued by the account service; the `sub` claim is
//! the acting principal.

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, AuthState};
pub use models::{JwtClaims, UserContext};
