pub mod jwt;
pub mod middleware;
pub mod verifier;

pub use middleware::AuthUser;
pub use verifier::{JwtVerifier, RemoteVerifier, TokenVerifier};
