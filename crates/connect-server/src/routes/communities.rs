use axum::{extract::State, routing::{get, post}, Router};
use uuid::Uuid;

use connect_model::Community;
use connect_service::communities::{
    CommunityDetails, CommunityListing, CommunityPostParams, CreateCommunityParams,
};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(show))
        .route("/:id/join", post(join))
        .route("/:id/leave", post(leave))
        .route("/:id/post", post(post_message))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<CreateCommunityParams>,
) -> ApiResult<Envelope<Community>> {
    let community = state.services.communities.create(&caller, params).await?;
    Ok(Envelope::created(community).with_message("Community created successfully"))
}

async fn list(State(state): State<AppState>, AuthUser(_): AuthUser) -> Envelope<Vec<CommunityListing>> {
    Envelope::list(state.services.communities.list().await)
}

async fn show(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<CommunityDetails>> {
    Ok(Envelope::ok(state.services.communities.get(id).await?))
}

async fn join(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<CommunityDetails>> {
    let community = state.services.communities.join(&caller, id).await?;
    Ok(Envelope::ok(community).with_message("Joined community"))
}

async fn leave(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<CommunityDetails>> {
    let community = state.services.communities.leave(&caller, id).await?;
    Ok(Envelope::ok(community).with_message("Left community"))
}

async fn post_message(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(params): ApiJson<CommunityPostParams>,
) -> ApiResult<Envelope<CommunityDetails>> {
    let community = state.services.communities.post(&caller, id, params).await?;
    Ok(Envelope::created(community).with_message("Post created"))
}
