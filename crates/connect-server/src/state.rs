//! Shared handler state.

use std::sync::Arc;
use std::time::Instant;

use connect_ai::AiClient;
use connect_auth::{IdentityResolver, JwtConfig, JwtService, PasswordHasher};
use connect_service::Services;
use connect_store::Store;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub services: Services,
    pub resolver: IdentityResolver,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Store, jwt: Arc<JwtService>, ai: AiClient, hasher: PasswordHasher) -> Self {
        let resolver = IdentityResolver::new(jwt.clone(), Arc::new(store.users.clone()));
        Self {
            services: Services::new(store, jwt, ai, hasher),
            resolver,
            started_at: Instant::now(),
        }
    }

    /// Build the state from configuration and ensure the bootstrap admin.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let jwt = JwtService::new(
            JwtConfig::new(config.jwt_secret.clone())
                .with_duration(chrono::Duration::days(config.jwt_expiry_days)),
        )?;
        let ai = AiClient::new(config.ai.clone())?;
        let state = Self::new(Store::new(), Arc::new(jwt), ai, PasswordHasher::default());
        info!(
            ai_resume = config.ai.resume_parser_url.is_some(),
            ai_learning_path = config.ai.learning_path_url.is_some(),
            "Services ready"
        );

        if let Some(seed) = &config.admin {
            state
                .services
                .auth
                .bootstrap_admin(&seed.name, &seed.email, &seed.password)
                .await?;
        }

        Ok(state)
    }
}
