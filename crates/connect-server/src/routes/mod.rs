//! Route table under `/api`.
//!
//! Only registration, login, the public event list, the donation
//! leaderboard and the two probes skip the bearer token; every other
//! handler takes an [`AuthUser`](crate::extract::AuthUser).

use axum::{routing::{get, patch}, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

mod admin;
mod analytics;
mod auth;
mod communities;
mod donations;
mod events;
mod feed;
pub mod health;
mod jobs;
mod learning;
mod mentorship;
mod users;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::liveness))
        .nest("/auth", auth::router())
        .nest("/user", users::router())
        .route("/users/:id/role", patch(admin::change_role))
        .nest("/feed", feed::router())
        .nest("/jobs", jobs::router())
        .nest("/events", events::router())
        .nest("/communities", communities::router())
        .nest("/mentorship", mentorship::router())
        .nest("/learning", learning::router())
        .nest("/donations", donations::router())
        .nest("/admin", admin::router())
        .nest("/analytics", analytics::router())
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "BCET CONNECT API" }))
}
