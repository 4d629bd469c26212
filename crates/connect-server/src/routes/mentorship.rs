use axum::{extract::State, routing::{get, patch, post}, Router};
use uuid::Uuid;

use connect_model::{MentorCard, Message, PublicProfile};
use connect_service::mentorship::{
    MentorListParams, MentorshipRequestParams, RequestDetails, RespondParams, SendMessageParams,
};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::response::Envelope;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(mentors))
        .route("/request", post(send_request))
        .route("/request/:id", patch(respond))
        .route("/chat/:id", get(chat).post(send_message))
        .route("/:id", get(mentor))
}

async fn mentors(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiQuery(params): ApiQuery<MentorListParams>,
) -> ApiResult<Envelope<Vec<MentorCard>>> {
    Ok(Envelope::list(state.services.mentorship.mentors(&caller, params).await?))
}

async fn mentor(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Envelope<PublicProfile>> {
    Ok(Envelope::ok(state.services.mentorship.mentor(&caller, id).await?))
}

async fn send_request(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(params): ApiJson<MentorshipRequestParams>,
) -> ApiResult<Envelope<RequestDetails>> {
    let request = state.services.mentorship.send_request(&caller, params).await?;
    Ok(Envelope::created(request).with_message("Mentorship request sent"))
}

async fn respond(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(params): ApiJson<RespondParams>,
) -> ApiResult<Envelope<RequestDetails>> {
    let request = state.services.mentorship.respond(&caller, id, params).await?;
    Ok(Envelope::ok(request))
}

async fn chat(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(other): ApiPath<Uuid>,
) -> ApiResult<Envelope<Vec<Message>>> {
    Ok(Envelope::list(state.services.mentorship.chat(&caller, other).await?))
}

async fn send_message(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(receiver): ApiPath<Uuid>,
    ApiJson(params): ApiJson<SendMessageParams>,
) -> ApiResult<Envelope<Message>> {
    let message = state.services.mentorship.send_message(&caller, receiver, params).await?;
    Ok(Envelope::created(message))
}
