use axum::{extract::State, routing::{get, patch, post}, Router};
use serde::Deserialize;
use uuid::Uuid;

use connect_model::DonationView;
use connect_service::donations::{
    CreateDonationParams, DonationRecord, DonationSearchParams, DonationStats,
    DonationStatsParams, LeaderboardEntry, MyDonationsParams, UpdateDonationStatusParams,
    VerifyDonationParams,
};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LeaderboardParams {
    limit: Option<usize>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(all).post(create))
        .route("/me", get(mine))
        .route("/verify", post(verify))
        .route("/leaderboard", get(leaderboard))
        .route("/stats", get(stats))
        .route("/:id/status", patch(update_status))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<CreateDonationParams>,
) -> ApiResult<Envelope<DonationView>> {
    let donation = state.services.donations.create(&caller, params).await?;
    Ok(Envelope::created(donation).with_message("Donation created successfully"))
}

async fn verify(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<VerifyDonationParams>,
) -> ApiResult<Envelope<DonationView>> {
    let donation = state.services.donations.verify(&caller, params).await?;
    Ok(Envelope::ok(donation).with_message("Donation verified successfully"))
}

async fn update_status(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(params): ApiJson<UpdateDonationStatusParams>,
) -> ApiResult<Envelope<DonationView>> {
    let donation = state.services.donations.update_status(&caller, id, params).await?;
    Ok(Envelope::ok(donation).with_message("Donation status updated"))
}

async fn mine(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiQuery(params): ApiQuery<MyDonationsParams>,
) -> ApiResult<Envelope<Vec<DonationView>>> {
    Ok(Envelope::page(state.services.donations.mine(&caller, params).await?))
}

async fn all(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiQuery(params): ApiQuery<DonationSearchParams>,
) -> ApiResult<Envelope<Vec<DonationRecord>>> {
    Ok(Envelope::page(state.services.donations.all(&caller, params).await?))
}

/// Public top-donor board.
async fn leaderboard(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LeaderboardParams>,
) -> Envelope<Vec<LeaderboardEntry>> {
    Envelope::list(state.services.donations.leaderboard(params.limit).await)
}

async fn stats(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiQuery(params): ApiQuery<DonationStatsParams>,
) -> ApiResult<Envelope<DonationStats>> {
    Ok(Envelope::ok(state.services.donations.stats(&caller, params).await?))
}
