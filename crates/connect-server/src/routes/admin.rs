//! Admin console: user management and the approval queues.

use axum::{extract::State, routing::{get, patch, post}, Router};
use uuid::Uuid;

use connect_model::{EventView, Job, User};
use connect_service::analytics::AdminSummary;
use connect_service::users::{ChangeRoleParams, UserListing};
use connect_service::PendingItem;

use super::{events, jobs};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users))
        .route("/users/:id/role", patch(change_role))
        .route("/jobs/pending", get(pending_jobs))
        .route("/jobs/:id/approve", post(jobs::approve))
        .route("/events/pending", get(pending_events))
        .route("/events/:id/approve", post(events::approve))
        .route("/analytics", get(summary))
}

async fn users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Envelope<Vec<UserListing>>> {
    Ok(Envelope::list(state.services.users.list_users(&caller).await?))
}

pub(crate) async fn change_role(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(params): ApiJson<ChangeRoleParams>,
) -> ApiResult<Envelope<User>> {
    let user = state.services.users.change_role(&caller, id, params).await?;
    Ok(Envelope::ok(user).with_message("User role updated"))
}

async fn pending_jobs(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Envelope<Vec<PendingItem<Job>>>> {
    Ok(Envelope::list(state.services.jobs.pending(&caller).await?))
}

async fn pending_events(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Envelope<Vec<PendingItem<EventView>>>> {
    Ok(Envelope::list(state.services.events.pending(&caller).await?))
}

async fn summary(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Envelope<AdminSummary>> {
    Ok(Envelope::ok(state.services.analytics.admin_summary(&caller).await?))
}
