use axum::{extract::State, routing::get, Router};

use connect_service::analytics::{
    CommunityReport, DonationReport, EventReport, FeedReport, JobReport, LearningReport, Overview,
    UserReport,
};

use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/users", get(users))
        .route("/jobs", get(jobs))
        .route("/events", get(events))
        .route("/communities", get(communities))
        .route("/feed", get(feed))
        .route("/learning", get(learning))
        .route("/donations", get(donations))
}

async fn overview(State(state): State<AppState>, AuthUser(caller): AuthUser) -> ApiResult<Envelope<Overview>> {
    Ok(Envelope::ok(state.services.analytics.overview(&caller).await?))
}

async fn users(State(state): State<AppState>, AuthUser(caller): AuthUser) -> ApiResult<Envelope<UserReport>> {
    Ok(Envelope::ok(state.services.analytics.users(&caller).await?))
}

async fn jobs(State(state): State<AppState>, AuthUser(caller): AuthUser) -> ApiResult<Envelope<JobReport>> {
    Ok(Envelope::ok(state.services.analytics.jobs(&caller).await?))
}

async fn events(State(state): State<AppState>, AuthUser(caller): AuthUser) -> ApiResult<Envelope<EventReport>> {
    Ok(Envelope::ok(state.services.analytics.events(&caller).await?))
}

async fn communities(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Envelope<CommunityReport>> {
    Ok(Envelope::ok(state.services.analytics.communities(&caller).await?))
}

async fn feed(State(state): State<AppState>, AuthUser(caller): AuthUser) -> ApiResult<Envelope<FeedReport>> {
    Ok(Envelope::ok(state.services.analytics.feed(&caller).await?))
}

async fn learning(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Envelope<LearningReport>> {
    Ok(Envelope::ok(state.services.analytics.learning(&caller).await?))
}

async fn donations(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Envelope<DonationReport>> {
    Ok(Envelope::ok(state.services.analytics.donations(&caller).await?))
}
