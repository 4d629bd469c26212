//! # Resources
//!
//! Resource types guarded by the route policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource types exposed by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// User accounts and profiles.
    User,

    /// Job postings.
    Job,

    /// Campus events.
    Event,

    /// Communities and their channels.
    Community,

    /// Social feed posts.
    FeedPost,

    /// Donations.
    Donation,

    /// Learning hub resources and AI helpers.
    LearningResource,

    /// Mentorship requests and chat.
    Mentorship,

    /// Admin dashboards.
    Analytics,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::User => "user",
            ResourceType::Job => "job",
            ResourceType::Event => "event",
            ResourceType::Community => "community",
            ResourceType::FeedPost => "feed_post",
            ResourceType::Donation => "donation",
            ResourceType::LearningResource => "learning_resource",
            ResourceType::Mentorship => "mentorship",
            ResourceType::Analytics => "analytics",
        }
    }

    /// Parse a resource type, case-insensitive with a few aliases.
    ///
    /// # Example
    ///
    /// ```
    /// use connect_rbac::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("jobs"), Some(ResourceType::Job));
    /// assert_eq!(ResourceType::parse("feed"), Some(ResourceType::FeedPost));
    /// assert_eq!(ResourceType::parse("spaceship"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" | "users" => Some(ResourceType::User),
            "job" | "jobs" => Some(ResourceType::Job),
            "event" | "events" => Some(ResourceType::Event),
            "community" | "communities" => Some(ResourceType::Community),
            "feed_post" | "feed" | "post" => Some(ResourceType::FeedPost),
            "donation" | "donations" => Some(ResourceType::Donation),
            "learning_resource" | "learning" | "resource" => Some(ResourceType::LearningResource),
            "mentorship" | "mentor" => Some(ResourceType::Mentorship),
            "analytics" => Some(ResourceType::Analytics),
            _ => None,
        }
    }

    /// Get a human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceType::User => "User",
            ResourceType::Job => "Job",
            ResourceType::Event => "Event",
            ResourceType::Community => "Community",
            ResourceType::FeedPost => "Post",
            ResourceType::Donation => "Donation",
            ResourceType::LearningResource => "Resource",
            ResourceType::Mentorship => "Mentorship request",
            ResourceType::Analytics => "Analytics",
        }
    }

    /// Get all resource types.
    pub fn all() -> &'static [ResourceType] {
        &[
            ResourceType::User,
            ResourceType::Job,
            ResourceType::Event,
            ResourceType::Community,
            ResourceType::FeedPost,
            ResourceType::Donation,
            ResourceType::LearningResource,
            ResourceType::Mentorship,
            ResourceType::Analytics,
        ]
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_parse_round_trip() {
        for resource in ResourceType::all() {
            assert_eq!(ResourceType::parse(resource.as_str()), Some(*resource));
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(ResourceType::FeedPost.display_name(), "Post");
        assert_eq!(ResourceType::Job.to_string(), "job");
    }
}
