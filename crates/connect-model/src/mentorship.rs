//! Mentorship requests and direct messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{document_timestamps, Document};
use crate::error::{ConnectError, ConnectResult};
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorshipStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl MentorshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// A request from a mentee to a mentor.
///
/// ```text
/// pending ──receiver──▶ accepted | rejected
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipRequest {
    pub id: Uuid,
    pub sender: Uuid,
    pub receiver: Uuid,
    pub message: Option<String>,
    pub status: MentorshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MentorshipRequest {
    pub fn new(sender: Uuid, receiver: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            sender,
            receiver,
            message: None,
            status: MentorshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = message.trim();
        self.message = (!message.is_empty()).then(|| message.to_string());
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == MentorshipStatus::Pending
    }

    /// Accept or reject. Only the receiver may answer, and only once.
    pub fn respond(&mut self, by: Uuid, status: MentorshipStatus) -> ConnectResult<()> {
        if status == MentorshipStatus::Pending {
            return Err(ConnectError::ValidationFailed(
                "\"status\" must be one of [accepted, rejected]".to_string(),
            ));
        }
        if by != self.receiver {
            return Err(ConnectError::Forbidden(
                "Only the mentor can respond to this request".to_string(),
            ));
        }
        if !self.is_pending() {
            return Err(ConnectError::InvalidState(format!(
                "Request already {}",
                self.status.as_str()
            )));
        }
        self.status = status;
        Ok(())
    }
}

impl Document for MentorshipRequest {
    const COLLECTION: &'static str = "mentorship_requests";
    const LABEL: &'static str = "Mentorship request";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        if self.sender == self.receiver {
            return Err(ConnectError::ValidationFailed(
                "You cannot send a mentorship request to yourself".to_string(),
            ));
        }
        Ok(())
    }

    /// One pending request per sender/receiver pair. Answered requests
    /// release the key.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        if self.is_pending() {
            vec![("pending_pair", format!("{}:{}", self.sender, self.receiver))]
        } else {
            Vec::new()
        }
    }
}

/// A direct chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Uuid,
    pub receiver: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Uuid, receiver: Uuid, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            sender,
            receiver,
            text: text.into().trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this message belongs to the conversation between `a` and `b`.
    pub fn between(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender == a && self.receiver == b) || (self.sender == b && self.receiver == a)
    }
}

impl Document for Message {
    const COLLECTION: &'static str = "messages";
    const LABEL: &'static str = "Message";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        let mut v = Validator::new();
        v.required("text", &self.text);
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respond_rules() {
        let (mentee, mentor) = (Uuid::now_v7(), Uuid::now_v7());
        let mut req = MentorshipRequest::new(mentee, mentor).with_message("Guide me on DSA");

        assert!(matches!(
            req.respond(mentee, MentorshipStatus::Accepted),
            Err(ConnectError::Forbidden(_))
        ));
        assert!(matches!(
            req.respond(mentor, MentorshipStatus::Pending),
            Err(ConnectError::ValidationFailed(_))
        ));
        req.respond(mentor, MentorshipStatus::Accepted).unwrap();
        assert_eq!(
            req.respond(mentor, MentorshipStatus::Rejected).unwrap_err().to_string(),
            "Request already accepted"
        );
    }

    #[test]
    fn test_self_request_invalid() {
        let me = Uuid::now_v7();
        assert!(MentorshipRequest::new(me, me).validate().is_err());
    }

    #[test]
    fn test_pending_pair_key() {
        let (mentee, mentor) = (Uuid::now_v7(), Uuid::now_v7());
        let mut req = MentorshipRequest::new(mentee, mentor);
        assert_eq!(
            req.unique_keys(),
            vec![("pending_pair", format!("{mentee}:{mentor}"))]
        );
        assert!(MentorshipRequest::new(mentor, mentee).unique_keys() != req.unique_keys());

        req.respond(mentor, MentorshipStatus::Rejected).unwrap();
        assert!(req.unique_keys().is_empty());
    }

    #[test]
    fn test_message_between() {
        let (a, b, c) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        let msg = Message::new(a, b, "hi");
        assert!(msg.between(a, b));
        assert!(msg.between(b, a));
        assert!(!msg.between(a, c));
        assert!(Message::new(a, b, "  ").validate().is_err());
    }
}
