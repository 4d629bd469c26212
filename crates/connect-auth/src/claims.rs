//! JWT claims
//!
//! The token is a lookup key. `sub` identifies the user; the `role` claim
//! is informational only and is never used for authorization, because the
//! live user record is re-fetched on every request.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use connect_rbac::Role;

/// Default token issuer.
pub const DEFAULT_ISSUER: &str = "bcet-connect";

/// Default token audience.
pub const DEFAULT_AUDIENCE: &str = "bcet-connect-api";

/// Claims carried by a BCET Connect bearer token.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use connect_auth::ConnectClaims;
/// use connect_rbac::Role;
/// use uuid::Uuid;
///
/// let user_id = Uuid::now_v7();
/// let claims = ConnectClaims::new(user_id, Role::Alumni, Duration::days(7));
/// assert_eq!(claims.user_id(), Some(user_id));
/// assert!(!claims.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectClaims {
    // Standard JWT claims (RFC 7519)
    /// Subject (user ID)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: Vec<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// JWT ID
    pub jti: String,

    /// Role at issue time; informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl ConnectClaims {
    /// Create new claims for a user.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's unique identifier
    /// * `role` - The user's role when the token is issued
    /// * `duration` - Token validity duration
    pub fn new(user_id: Uuid, role: Role, duration: Duration) -> Self {
        let now = Utc::now();
        let exp = now + duration;

        Self {
            sub: user_id.to_string(),
            iss: DEFAULT_ISSUER.to_string(),
            aud: vec![DEFAULT_AUDIENCE.to_string()],
            exp: exp.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            role: Some(role),
        }
    }

    /// Override issuer and audience.
    pub fn with_issuer(mut self, issuer: impl Into<String>, audience: Vec<String>) -> Self {
        self.iss = issuer.into();
        self.aud = audience;
        self
    }

    /// Get the user ID as UUID.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Check if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get expiration as DateTime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}
