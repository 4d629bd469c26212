//! Identity resolution
//!
//! Turns an `Authorization` header into a [`Caller`]. The token only
//! carries the user id; role and profile fields come from the live user
//! record, so a role change takes effect on the very next request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use connect_model::User;
use connect_rbac::{Role, RoleBearer};

use crate::error::{AuthError, AuthResult};
use crate::jwt::JwtService;

/// Lookup of live user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by id.
    async fn find_user(&self, id: Uuid) -> Option<User>;

    /// Note that the user made an authenticated request.
    async fn record_activity(&self, _id: Uuid) {}
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

impl RoleBearer for Caller {
    fn role(&self) -> Option<Role> {
        Some(self.role)
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively; anything else is treated as
/// a missing token.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves bearer tokens to callers.
#[derive(Clone)]
pub struct IdentityResolver {
    jwt: Arc<JwtService>,
    directory: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

impl IdentityResolver {
    pub fn new(jwt: Arc<JwtService>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { jwt, directory }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Resolve the raw `Authorization` header value, if any.
    pub async fn resolve_header(&self, header: Option<&str>) -> AuthResult<Caller> {
        let token = header.and_then(parse_bearer).ok_or(AuthError::TokenMissing)?;
        self.resolve_token(token).await
    }

    /// Resolve a bare token.
    ///
    /// # Errors
    ///
    /// * `TokenExpired` / `InvalidToken` - signature, expiry or issuer check failed
    /// * `MissingClaim` - the subject is not a user id
    /// * `UserNotFound` - the user was deleted after the token was issued
    pub async fn resolve_token(&self, token: &str) -> AuthResult<Caller> {
        let claims = self.jwt.validate_token(token).map_err(|e| {
            debug!(error = %e, code = e.error_code(), "Token rejected");
            e
        })?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| AuthError::MissingClaim("sub".to_string()))?;

        let user = self
            .directory
            .find_user(user_id)
            .await
            .ok_or(AuthError::UserNotFound)?;

        if claims.role.is_some_and(|r| r != user.role) {
            debug!(user_id = %user_id, token_role = ?claims.role, live_role = %user.role, "Token role is stale; using live role");
        }

        self.directory.record_activity(user_id).await;
        Ok(Caller::from(&user))
    }
}
