use axum::{extract::State, routing::get, Router};
use uuid::Uuid;

use connect_model::{ProfileUpdate, PublicProfile, User};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(profile).put(update_profile))
        .route("/:id", get(public_profile))
}

async fn profile(State(state): State<AppState>, AuthUser(caller): AuthUser) -> ApiResult<Envelope<User>> {
    Ok(Envelope::ok(state.services.users.profile(&caller).await?))
}

async fn update_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Envelope<User>> {
    let user = state.services.users.update_profile(&caller, update).await?;
    Ok(Envelope::ok(user).with_message("Profile updated successfully"))
}

async fn public_profile(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<PublicProfile>> {
    Ok(Envelope::ok(state.services.users.public_profile(id).await?))
}
