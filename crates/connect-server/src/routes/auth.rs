use axum::{extract::State, routing::{get, post}, Router};

use connect_model::User;
use connect_service::auth::{LoginParams, RegisterParams};
use connect_service::AuthSession;

use crate::error::ApiResult;
use crate::extract::{ApiJson, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    ApiJson(params): ApiJson<RegisterParams>,
) -> ApiResult<Envelope<AuthSession>> {
    let session = state.services.auth.register(params).await?;
    Ok(Envelope::created(session).with_message("User registered successfully"))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(params): ApiJson<LoginParams>,
) -> ApiResult<Envelope<AuthSession>> {
    let session = state.services.auth.login(params).await?;
    Ok(Envelope::ok(session).with_message("Login successful"))
}

async fn me(State(state): State<AppState>, AuthUser(caller): AuthUser) -> ApiResult<Envelope<User>> {
    let user = state.services.auth.me(&caller).await?;
    Ok(Envelope::ok(user).with_message("Current user fetched"))
}
