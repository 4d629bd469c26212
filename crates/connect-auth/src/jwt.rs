//! Session tokens
//!
//! HS256 tokens signed with the server secret. A token names the user and
//! the role held at login; [`crate::IdentityResolver`] re-reads the role.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use connect_rbac::Role;

use crate::claims::{ConnectClaims, DEFAULT_AUDIENCE, DEFAULT_ISSUER};
use crate::error::{AuthError, AuthResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing settings.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: Vec<String>,
    /// How long a login stays valid
    pub token_duration: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_duration", &self.token_duration)
            .finish()
    }
}

impl JwtConfig {
    /// Seven-day tokens for the default issuer and audience.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: vec![DEFAULT_AUDIENCE.to_string()],
            token_duration: Duration::days(7),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.token_duration = duration;
        self
    }
}

/// Issues and checks session tokens.
pub struct JwtService {
    config: JwtConfig,
    keys: (EncodingKey, DecodingKey),
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// # Errors
    ///
    /// `ConfigError` for an empty or blank secret
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        if config.secret.trim().is_empty() {
            return Err(AuthError::ConfigError("JWT secret must not be empty".to_string()));
        }
        let secret = config.secret.as_bytes();
        let keys = (EncodingKey::from_secret(secret), DecodingKey::from_secret(secret));
        Ok(Self { config, keys })
    }

    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        Self::new(JwtConfig::new(secret))
    }

    /// Sign a login for `user_id`, recording the role held right now.
    pub fn issue_token(&self, user_id: Uuid, role: Role) -> AuthResult<String> {
        let claims = ConnectClaims::new(user_id, role, self.config.token_duration)
            .with_issuer(self.config.issuer.clone(), self.config.audience.clone());
        self.encode_claims(&claims)
    }

    pub fn encode_claims(&self, claims: &ConnectClaims) -> AuthResult<String> {
        encode(&Header::new(ALGORITHM), claims, &self.keys.0)
            .map_err(|e| AuthError::Internal(format!("could not sign session token: {e}")))
    }

    /// Check signature, expiry, issuer and audience.
    pub fn validate_token(&self, token: &str) -> AuthResult<ConnectClaims> {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&self.config.audience);

        decode::<ConnectClaims>(token, &self.keys.1, &validation)
            .map(|data| data.claims)
            .map_err(|e| rejection(e.kind()))
    }

    /// Token lifetime in seconds.
    pub fn expires_in(&self) -> i64 {
        self.config.token_duration.num_seconds()
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }
}

/// Reason kept for the debug log; the client only sees a generic message.
fn rejection(kind: &ErrorKind) -> AuthError {
    let reason = match kind {
        ErrorKind::ExpiredSignature => return AuthError::TokenExpired,
        ErrorKind::InvalidSignature => "signature mismatch",
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => "foreign token",
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            "not a JWT"
        }
        _ => "rejected",
    };
    AuthError::InvalidToken(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "bcet-connect-unit-test-secret";

    fn service() -> JwtService {
        JwtService::with_secret(SECRET).unwrap()
    }

    #[test]
    fn test_week_long_sessions_by_default() {
        assert_eq!(service().expires_in(), 7 * 24 * 3600);
        let short = JwtService::new(JwtConfig::new(SECRET).with_duration(Duration::hours(1))).unwrap();
        assert_eq!(short.expires_in(), 3600);
    }

    #[test]
    fn test_blank_secret_rejected() {
        assert!(matches!(JwtService::with_secret("   "), Err(AuthError::ConfigError(_))));
    }

    #[test]
    fn test_login_token_names_user_and_role() {
        let faculty = Uuid::now_v7();
        let token = service().issue_token(faculty, Role::Faculty).unwrap();

        let claims = service().validate_token(&token).unwrap();
        assert_eq!(claims.user_id(), Some(faculty));
        assert_eq!(claims.role, Some(Role::Faculty));
    }

    #[test]
    fn test_garbage_and_forged_tokens() {
        assert!(matches!(
            service().validate_token("Bearer nonsense"),
            Err(AuthError::InvalidToken(_))
        ));

        let forged = JwtService::with_secret("someone-elses-secret")
            .unwrap()
            .issue_token(Uuid::now_v7(), Role::Admin)
            .unwrap();
        assert!(matches!(service().validate_token(&forged), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_session() {
        let mut claims = ConnectClaims::new(Uuid::now_v7(), Role::Student, Duration::days(7));
        // past the 60s leeway
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        let token = service().encode_claims(&claims).unwrap();

        assert!(matches!(service().validate_token(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_token_for_another_app_rejected() {
        let claims = ConnectClaims::new(Uuid::now_v7(), Role::Alumni, Duration::days(1))
            .with_issuer(DEFAULT_ISSUER, vec!["placement-portal".to_string()]);
        let token = service().encode_claims(&claims).unwrap();

        assert!(matches!(service().validate_token(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", service());
        assert!(!debug.contains(SECRET));
    }
}
