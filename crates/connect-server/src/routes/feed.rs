use axum::{extract::State, routing::{delete, get, post}, Router};
use uuid::Uuid;

use connect_service::feed::{CommentParams, CreatePostParams, FeedItem, FeedParams};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", delete(remove))
        .route("/:id/like", post(like).delete(unlike))
        .route("/:id/comments", post(comment))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiQuery(params): ApiQuery<FeedParams>,
) -> ApiResult<Envelope<Vec<FeedItem>>> {
    Ok(Envelope::list(state.services.feed.list(params).await?))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<CreatePostParams>,
) -> ApiResult<Envelope<FeedItem>> {
    let item = state.services.feed.create(&caller, params).await?;
    Ok(Envelope::created(item).with_message("Post created successfully"))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<()>> {
    state.services.feed.delete(&caller, id).await?;
    Ok(Envelope::message("Post deleted"))
}

async fn like(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<FeedItem>> {
    Ok(Envelope::ok(state.services.feed.like(&caller, id).await?))
}

async fn unlike(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<FeedItem>> {
    Ok(Envelope::ok(state.services.feed.unlike(&caller, id).await?))
}

async fn comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(params): ApiJson<CommentParams>,
) -> ApiResult<Envelope<FeedItem>> {
    let item = state.services.feed.comment(&caller, id, params).await?;
    Ok(Envelope::created(item))
}
