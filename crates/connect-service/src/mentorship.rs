//! Mentorship: the mentor directory, requests and direct chat

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use connect_auth::Caller;
use connect_model::{
    ConnectError, ConnectResult, MentorCard, MentorshipRequest, MentorshipStatus, Message,
    PublicProfile, UserSummary,
};
use connect_rbac::{Action, ResourceType, Role};
use connect_store::Store;

use crate::access::authorize;
use crate::views::author_index;

/// Optional filters of the mentor directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MentorListParams {
    /// `alumni`, `faculty` or `all`
    pub role: Option<String>,
    /// Case-insensitive substring of any skill
    pub skill: Option<String>,
    /// Case-insensitive substring of name or bio
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MentorshipRequestParams {
    #[serde(alias = "mentorId", alias = "receiver")]
    pub mentor_id: Option<Uuid>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RespondParams {
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SendMessageParams {
    pub text: String,
}

/// A request with both parties resolved.
#[derive(Debug, Clone, Serialize)]
pub struct RequestDetails {
    #[serde(flatten)]
    pub request: MentorshipRequest,
    pub sender_info: Option<UserSummary>,
    pub receiver_info: Option<UserSummary>,
}

#[derive(Debug, Clone)]
pub struct MentorshipService {
    store: Store,
}

impl MentorshipService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Alumni and faculty, newest first.
    pub async fn mentors(
        &self,
        caller: &Caller,
        params: MentorListParams,
    ) -> ConnectResult<Vec<MentorCard>> {
        authorize(caller, ResourceType::Mentorship, Action::List)?;

        let role = match params.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => Some(Role::parse(raw).filter(Role::is_mentor).ok_or_else(|| {
                ConnectError::ValidationFailed(
                    "\"role\" must be one of [alumni, faculty, all]".to_string(),
                )
            })?),
        };
        let skill = lowercase_term(params.skill.as_deref());
        let search = lowercase_term(params.search.as_deref());

        let mentors = self
            .store
            .users
            .find(|u| {
                u.role.is_mentor()
                    && role.map_or(true, |r| u.role == r)
                    && skill.as_deref().map_or(true, |s| {
                        u.skills.iter().any(|k| k.to_lowercase().contains(s))
                    })
                    && search.as_deref().map_or(true, |q| {
                        u.name.to_lowercase().contains(q) || u.bio.to_lowercase().contains(q)
                    })
            })
            .await;
        Ok(mentors.iter().map(MentorCard::from).collect())
    }

    /// One mentor's public profile.
    pub async fn mentor(&self, caller: &Caller, id: Uuid) -> ConnectResult<PublicProfile> {
        authorize(caller, ResourceType::Mentorship, Action::Read)?;
        let user = self
            .store
            .users
            .find_by_id(id)
            .await
            .filter(|u| u.role.is_mentor())
            .ok_or_else(|| ConnectError::not_found("Mentor"))?;
        Ok(user.public_profile())
    }

    /// Ask a mentor for mentorship.
    ///
    /// At most one pending request per sender/receiver pair.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn send_request(
        &self,
        caller: &Caller,
        params: MentorshipRequestParams,
    ) -> ConnectResult<RequestDetails> {
        authorize(caller, ResourceType::Mentorship, Action::Create)?;
        let mentor_id = params
            .mentor_id
            .ok_or_else(|| ConnectError::ValidationFailed("\"mentorId\" is required".to_string()))?;
        if mentor_id == caller.id {
            return Err(ConnectError::ValidationFailed(
                "You cannot send a mentorship request to yourself".to_string(),
            ));
        }

        let mentor = self
            .store
            .users
            .find_by_id(mentor_id)
            .await
            .filter(|u| u.role.is_mentor())
            .ok_or_else(|| ConnectError::not_found("Mentor"))?;

        let mut request = MentorshipRequest::new(caller.id, mentor.id);
        if let Some(message) = params.message {
            request = request.with_message(message);
        }
        // The pending-pair key is checked under the collection's write lock.
        let request = self
            .store
            .mentorship
            .insert(request)
            .await
            .map_err(|err| match err {
                ConnectError::Conflict(_) => ConnectError::Conflict(
                    "A mentorship request to this mentor is already pending".to_string(),
                ),
                other => other,
            })?;
        info!(request_id = %request.id, mentor_id = %mentor.id, "Mentorship request sent");
        Ok(self.details(request).await)
    }

    /// Accept or reject a pending request addressed to the caller.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn respond(
        &self,
        caller: &Caller,
        id: Uuid,
        params: RespondParams,
    ) -> ConnectResult<RequestDetails> {
        authorize(caller, ResourceType::Mentorship, Action::Update)?;
        let status = match params.status.trim().to_lowercase().as_str() {
            "accepted" => MentorshipStatus::Accepted,
            "rejected" => MentorshipStatus::Rejected,
            _ => {
                return Err(ConnectError::ValidationFailed(
                    "\"status\" must be one of [accepted, rejected]".to_string(),
                ))
            }
        };

        let by = caller.id;
        let request = self
            .store
            .mentorship
            .update(id, move |r| r.respond(by, status))
            .await?;
        info!(request_id = %request.id, status = status.as_str(), "Mentorship request answered");
        Ok(self.details(request).await)
    }

    /// Messages between the caller and `other`, oldest first.
    pub async fn chat(&self, caller: &Caller, other: Uuid) -> ConnectResult<Vec<Message>> {
        authorize(caller, ResourceType::Mentorship, Action::Read)?;
        let me = caller.id;
        let mut messages = self.store.messages.find(|m| m.between(me, other)).await;
        messages.reverse();
        Ok(messages)
    }

    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn send_message(
        &self,
        caller: &Caller,
        receiver: Uuid,
        params: SendMessageParams,
    ) -> ConnectResult<Message> {
        authorize(caller, ResourceType::Mentorship, Action::Post)?;
        if params.text.trim().is_empty() {
            return Err(ConnectError::ValidationFailed(
                "Message text is required".to_string(),
            ));
        }
        if self.store.users.find_by_id(receiver).await.is_none() {
            return Err(ConnectError::not_found("User"));
        }

        let message = self
            .store
            .messages
            .insert(Message::new(caller.id, receiver, params.text))
            .await?;
        info!(message_id = %message.id, receiver = %receiver, "Message sent");
        Ok(message)
    }

    async fn details(&self, request: MentorshipRequest) -> RequestDetails {
        let people = author_index(&self.store, [request.sender, request.receiver]).await;
        RequestDetails {
            sender_info: people.get(&request.sender).cloned(),
            receiver_info: people.get(&request.receiver).cloned(),
            request,
        }
    }
}

fn lowercase_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
