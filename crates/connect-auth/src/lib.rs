//! # Connect Auth
//!
//! Authentication for BCET Connect.
//!
//! ## Features
//!
//! - **JWT**: HMAC-signed bearer tokens with a 7-day default lifetime
//! - **Passwords**: bcrypt hashes with the cost stored alongside
//! - **Identity resolution**: bearer header to live [`Caller`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use connect_auth::{IdentityResolver, JwtService};
//!
//! let jwt = Arc::new(JwtService::with_secret(secret)?);
//! let resolver = IdentityResolver::new(jwt.clone(), directory);
//!
//! let token = jwt.issue_token(user.id, user.role)?;
//! let caller = resolver.resolve_header(Some(&format!("Bearer {token}"))).await?;
//! ```

pub mod claims;
pub mod error;
pub mod jwt;
pub mod password;
pub mod resolver;

pub use claims::{ConnectClaims, DEFAULT_AUDIENCE, DEFAULT_ISSUER};
pub use error::{AuthError, AuthResult};
pub use jwt::{JwtConfig, JwtService};
pub use password::{PasswordHasher, DEFAULT_COST};
pub use resolver::{parse_bearer, Caller, IdentityResolver, UserDirectory};
