use axum::{extract::State, routing::{get, post}, Router};
use uuid::Uuid;

use connect_ai::{LearningPath, ResumeAnalysis};
use connect_model::Vote;
use connect_service::learning::{
    CreateResourceParams, LearningPathParams, ParseResumeParams, ResourceListParams, ResourceView,
};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resources", get(list).post(create))
        .route("/resources/:id/upvote", post(upvote))
        .route("/resources/:id/downvote", post(downvote))
        .route("/parse-resume", post(parse_resume))
        .route("/learning-path", post(learning_path))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiQuery(params): ApiQuery<ResourceListParams>,
) -> Envelope<Vec<ResourceView>> {
    Envelope::list(state.services.learning.list(params).await)
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<CreateResourceParams>,
) -> ApiResult<Envelope<ResourceView>> {
    Ok(Envelope::created(state.services.learning.create(&caller, params).await?))
}

async fn upvote(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<ResourceView>> {
    Ok(Envelope::ok(state.services.learning.vote(&caller, id, Vote::Up).await?))
}

async fn downvote(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<ResourceView>> {
    Ok(Envelope::ok(state.services.learning.vote(&caller, id, Vote::Down).await?))
}

async fn parse_resume(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<ParseResumeParams>,
) -> ApiResult<Envelope<ResumeAnalysis>> {
    Ok(Envelope::ok(state.services.learning.parse_resume(&caller, params).await?))
}

async fn learning_path(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    body: Option<ApiJson<LearningPathParams>>,
) -> ApiResult<Envelope<LearningPath>> {
    let params = body.map(|ApiJson(p)| p).unwrap_or_default();
    Ok(Envelope::ok(state.services.learning.learning_path(&caller, params).await?))
}
