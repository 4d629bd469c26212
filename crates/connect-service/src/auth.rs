//! Registration, login and the admin bootstrap

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use connect_auth::{AuthError, Caller, JwtService, PasswordHasher};
use connect_model::{ConnectError, ConnectResult, User, Validator};
use connect_rbac::Role;
use connect_store::Store;

const MIN_PASSWORD_LEN: usize = 6;

/// Registration form.
#[derive(Clone, Deserialize)]
pub struct RegisterParams {
    pub name: String,
    pub email: String,
    pub password: String,
    /// One of student, alumni, faculty. Defaults to student.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl std::fmt::Debug for RegisterParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterParams")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Login form.
#[derive(Clone, Deserialize)]
pub struct LoginParams {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginParams")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Account lifecycle and credential checks.
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Store,
    jwt: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(store: Store, jwt: Arc<JwtService>, hasher: PasswordHasher) -> Self {
        Self { store, jwt, hasher }
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` with every field problem joined
    /// - `Conflict` when the email is already registered
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn register(&self, params: RegisterParams) -> ConnectResult<AuthSession> {
        let role = validate_registration(&params)?;

        if self.store.user_by_email(&params.email).await.is_some() {
            return Err(ConnectError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }

        let hash = self.hasher.hash(&params.password)?;
        let mut user = User::new(params.name, params.email, hash, role);
        user.batch = params.batch.filter(|b| !b.trim().is_empty());
        user.department = params.department.filter(|d| !d.trim().is_empty());

        let user = self.store.users.insert(user).await?;
        info!(user_id = %user.id, role = user.role.as_str(), "User registered");

        self.session(user)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password produce the same error.
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn login(&self, params: LoginParams) -> ConnectResult<AuthSession> {
        let mut v = Validator::new();
        v.email("email", &params.email)
            .required("password", &params.password);
        v.finish()?;

        let Some(user) = self.store.user_by_email(&params.email).await else {
            self.hasher.reject(&params.password);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self.hasher.verify(&params.password, &user.password_hash) {
            warn!(user_id = %user.id, "Login rejected: bad password");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "Login successful");
        self.session(user)
    }

    /// The caller's own record.
    pub async fn me(&self, caller: &Caller) -> ConnectResult<User> {
        self.store.users.get(caller.id).await
    }

    /// Ensure an admin account exists for `email`.
    ///
    /// An existing account with that email is left untouched.
    ///
    /// # Returns
    ///
    /// The admin created now, or `None` if the email was already taken
    #[instrument(skip(self, password))]
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ConnectResult<Option<User>> {
        if let Some(existing) = self.store.user_by_email(email).await {
            info!(
                user_id = %existing.id,
                role = existing.role.as_str(),
                "Bootstrap admin already present"
            );
            return Ok(None);
        }

        let mut v = Validator::new();
        v.min_length("password", password, MIN_PASSWORD_LEN);
        v.finish()?;

        let hash = self.hasher.hash(password)?;
        let admin = self
            .store
            .users
            .insert(User::new(name, email, hash, Role::Admin))
            .await?;
        info!(user_id = %admin.id, "Bootstrap admin created");
        Ok(Some(admin))
    }

    fn session(&self, user: User) -> ConnectResult<AuthSession> {
        let token = self.jwt.issue_token(user.id, user.role)?;
        Ok(AuthSession { user, token })
    }
}

fn validate_registration(params: &RegisterParams) -> ConnectResult<Role> {
    let mut v = Validator::new();
    v.length("name", params.name.trim(), 3, 80)
        .email("email", &params.email)
        .min_length("password", &params.password, MIN_PASSWORD_LEN);

    let role = match params.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => Some(Role::Student),
        Some(name) => Role::parse(name).filter(Role::is_self_assignable),
    };
    v.check(
        role.is_some(),
        "\"role\" must be one of [student, alumni, faculty]",
    );
    v.finish()?;

    Ok(role.unwrap_or(Role::Student))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(role: Option<&str>) -> RegisterParams {
        RegisterParams {
            name: "Kabir Singh".into(),
            email: "kabir@bcet.ac.in".into(),
            password: "hunter22".into(),
            role: role.map(String::from),
            batch: None,
            department: None,
        }
    }

    #[test]
    fn test_role_defaults_to_student() {
        assert_eq!(validate_registration(&params(None)).unwrap(), Role::Student);
        assert_eq!(validate_registration(&params(Some(" Alumni "))).unwrap(), Role::Alumni);
    }

    #[test]
    fn test_privileged_roles_cannot_self_register() {
        for role in ["admin", "superadmin", "guest"] {
            let err = validate_registration(&params(Some(role))).unwrap_err();
            assert!(matches!(err, ConnectError::ValidationFailed(_)), "{role}");
        }
    }

    #[test]
    fn test_all_field_errors_reported() {
        let p = RegisterParams {
            name: "Al".into(),
            email: "nope".into(),
            password: "123".into(),
            ..params(None)
        };
        let msg = validate_registration(&p).unwrap_err().to_string();
        assert!(msg.contains("\"name\""));
        assert!(msg.contains("\"email\""));
        assert!(msg.contains("\"password\""));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_fail_alike() {
        let jwt = Arc::new(JwtService::with_secret("auth-unit-secret").unwrap());
        let auth = AuthService::new(Store::new(), jwt, PasswordHasher::new(4));
        auth.register(params(None)).await.unwrap();

        let login = |email: &str, password: &str| LoginParams {
            email: email.to_string(),
            password: password.to_string(),
        };
        let wrong_password = auth
            .login(login("kabir@bcet.ac.in", "hunter23"))
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(login("nobody@bcet.ac.in", "hunter22"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.status_code(), 401);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(auth.login(login("KABIR@bcet.ac.in", "hunter22")).await.is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", params(None));
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("[REDACTED]"));
    }
}
