use axum::{extract::State, routing::{get, patch, post}, Router};
use uuid::Uuid;

use connect_model::Job;
use connect_service::jobs::{ApplyParams, CreateJobParams, JobListParams, JobView};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(show))
        .route("/:id/apply", post(apply))
        .route("/:id/approve", patch(approve))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<CreateJobParams>,
) -> ApiResult<Envelope<Job>> {
    let job = state.services.jobs.create(&caller, params).await?;
    Ok(Envelope::created(job).with_message("Job posted successfully"))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiQuery(params): ApiQuery<JobListParams>,
) -> ApiResult<Envelope<Vec<JobView>>> {
    Ok(Envelope::page(state.services.jobs.list(&caller, params).await?))
}

async fn show(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<JobView>> {
    Ok(Envelope::ok(state.services.jobs.get(&caller, id).await?))
}

async fn apply(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    body: Option<ApiJson<ApplyParams>>,
) -> ApiResult<Envelope<Job>> {
    let params = body.map(|ApiJson(p)| p).unwrap_or_default();
    let job = state.services.jobs.apply(&caller, id, params).await?;
    Ok(Envelope::ok(job).with_message("Applied successfully"))
}

pub(crate) async fn approve(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Job>> {
    let job = state.services.jobs.approve(&caller, id).await?;
    Ok(Envelope::ok(job).with_message("Job approved"))
}
