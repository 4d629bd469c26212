use axum::{extract::State, routing::{get, patch, post}, Router};
use uuid::Uuid;

use connect_model::{Event, EventView};
use connect_service::events::{
    CreateEventParams, EventDetails, EventListParams, EventListing, PublicEvent, UpdateEventParams,
};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/public", get(public_list))
        .route("/:id", get(show).put(update))
        .route("/:id/register", post(register))
        .route("/:id/approve", patch(approve))
        .route("/:id/cancel", patch(cancel))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<CreateEventParams>,
) -> ApiResult<Envelope<Event>> {
    let event = state.services.events.create(&caller, params).await?;
    Ok(Envelope::created(event).with_message("Event created successfully. Pending approval."))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiQuery(params): ApiQuery<EventListParams>,
) -> ApiResult<Envelope<Vec<EventListing>>> {
    Ok(Envelope::list(state.services.events.list(params).await?))
}

/// Landing-page listing; no token needed.
async fn public_list(State(state): State<AppState>) -> Envelope<Vec<PublicEvent>> {
    Envelope::list(state.services.events.public_list().await)
}

async fn show(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<EventDetails>> {
    Ok(Envelope::ok(state.services.events.get(id).await?))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(params): ApiJson<UpdateEventParams>,
) -> ApiResult<Envelope<Event>> {
    let event = state.services.events.update(&caller, id, params).await?;
    Ok(Envelope::ok(event).with_message("Event updated successfully"))
}

async fn register(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<EventView>> {
    let view = state.services.events.register(&caller, id).await?;
    Ok(Envelope::ok(view).with_message("Successfully registered for event"))
}

pub(crate) async fn approve(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Event>> {
    let event = state.services.events.approve(&caller, id).await?;
    Ok(Envelope::ok(event).with_message("Event approved"))
}

async fn cancel(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Event>> {
    let event = state.services.events.cancel(&caller, id).await?;
    Ok(Envelope::ok(event).with_message("Event cancelled successfully"))
}
