//! Authentication infrastructure module
//!
//! Bearer tokens are HS256 JWTs whose subject is the user ID.

mod jwt;

pub use jwt::{IdentityResolver, JwtClaims, JwtConfig, JwtService, TokenIssuer};
