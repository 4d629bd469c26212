//! # Actions
//!
//! Defines the operations the API exposes on each resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions that can be performed on resources.
///
/// Besides plain CRUD, the campus modules have their own verbs:
/// - **Apply**: Apply to a job posting
/// - **Register**: Register for an event
/// - **Join / Leave**: Community membership
/// - **Post**: Append to a community channel or the feed
/// - **Approve**: Move a pending job or event to approved
/// - **Cancel**: Soft-delete an event
/// - **Vote**: Up/down vote a learning resource
/// - **Verify**: Confirm a donation payment
/// - **Manage**: Administrative operations (role change, user listing)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create new resource.
    Create,

    /// Read a single resource.
    Read,

    /// List/query resources.
    List,

    /// Update existing resource.
    Update,

    /// Delete resource.
    Delete,

    /// Apply to a job.
    Apply,

    /// Register for an event.
    Register,

    /// Join a community.
    Join,

    /// Leave a community.
    Leave,

    /// Post into a channel or feed.
    Post,

    /// Approve a pending resource.
    Approve,

    /// Cancel (soft-delete) a resource.
    Cancel,

    /// Vote on a resource.
    Vote,

    /// Administrative management.
    Manage,

    /// Verify a payment.
    Verify,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::List => "list",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Apply => "apply",
            Action::Register => "register",
            Action::Join => "join",
            Action::Leave => "leave",
            Action::Post => "post",
            Action::Approve => "approve",
            Action::Cancel => "cancel",
            Action::Vote => "vote",
            Action::Manage => "manage",
            Action::Verify => "verify",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Example
    ///
    /// ```
    /// use connect_rbac::Action;
    ///
    /// assert_eq!(Action::parse("view"), Some(Action::Read));
    /// assert_eq!(Action::parse("RSVP"), Some(Action::Register));
    /// assert_eq!(Action::parse("upvote"), Some(Action::Vote));
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "create" | "add" | "new" => Some(Action::Create),
            "read" | "view" | "get" => Some(Action::Read),
            "list" | "browse" | "search" => Some(Action::List),
            "update" | "edit" | "put" | "patch" => Some(Action::Update),
            "delete" | "remove" => Some(Action::Delete),
            "apply" => Some(Action::Apply),
            "register" | "rsvp" => Some(Action::Register),
            "join" => Some(Action::Join),
            "leave" => Some(Action::Leave),
            "post" | "comment" => Some(Action::Post),
            "approve" => Some(Action::Approve),
            "cancel" => Some(Action::Cancel),
            "vote" | "upvote" | "downvote" | "like" => Some(Action::Vote),
            "manage" | "admin" => Some(Action::Manage),
            "verify" => Some(Action::Verify),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> &'static [Action] {
        &[
            Action::Create,
            Action::Read,
            Action::List,
            Action::Update,
            Action::Delete,
            Action::Apply,
            Action::Register,
            Action::Join,
            Action::Leave,
            Action::Post,
            Action::Approve,
            Action::Cancel,
            Action::Vote,
            Action::Manage,
            Action::Verify,
        ]
    }

    /// Whether the action changes state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Action::Read | Action::List)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_round_trip() {
        for action in Action::all() {
            assert_eq!(Action::parse(action.as_str()), Some(*action));
        }
    }

    #[test]
    fn test_action_aliases() {
        assert_eq!(Action::parse("Edit"), Some(Action::Update));
        assert_eq!(Action::parse("like"), Some(Action::Vote));
        assert_eq!(Action::parse("comment"), Some(Action::Post));
    }

    #[test]
    fn test_is_mutating() {
        assert!(!Action::Read.is_mutating());
        assert!(!Action::List.is_mutating());
        assert!(Action::Apply.is_mutating());
    }
}
