//! Community models
//!
//! Communities have no approval gate. Membership is a set; posting into a
//! channel requires membership and an existing channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{document_timestamps, Document};
use crate::error::{ConnectError, ConnectResult};
use crate::validation::Validator;

/// Channels every new community starts with.
pub const DEFAULT_CHANNELS: [&str; 4] = ["general", "jobs", "events", "resources"];

/// What a channel is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    #[default]
    Text,
    Jobs,
    Events,
    Resources,
}

impl ChannelKind {
    fn for_name(name: &str) -> Self {
        match name {
            "jobs" => Self::Jobs,
            "events" => Self::Events,
            "resources" => Self::Resources,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = ChannelKind::for_name(&name);
        Self { name, kind }
    }
}

/// A post in a community channel. Posts are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: Uuid,
    pub user: Uuid,
    pub channel: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A community.
///
/// # Examples
///
/// ```
/// use connect_model::Community;
/// use uuid::Uuid;
///
/// let creator = Uuid::now_v7();
/// let community = Community::new("Rustaceans", creator);
/// assert_eq!(community.members, vec![creator]);
/// assert!(community.has_channel("general"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub banner: String,
    pub created_by: Uuid,

    /// Set semantics; the creator is always a member
    pub members: Vec<Uuid>,

    pub channels: Vec<Channel>,

    #[serde(default)]
    pub posts: Vec<CommunityPost>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Community {
    /// Creates a community with its creator as the only member and the
    /// default channels seeded.
    pub fn new(name: impl Into<String>, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into().trim().to_string(),
            description: String::new(),
            banner: String::new(),
            created_by,
            members: vec![created_by],
            channels: DEFAULT_CHANNELS.iter().map(|c| Channel::new(*c)).collect(),
            posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = banner.into();
        self
    }

    pub fn is_member(&self, user: Uuid) -> bool {
        self.members.contains(&user)
    }

    pub fn members_count(&self) -> usize {
        self.members.len()
    }

    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name == name)
    }

    /// Add `user` to the member set.
    ///
    /// Returns `true` if the user was added, `false` if already a member.
    pub fn join(&mut self, user: Uuid) -> bool {
        if self.is_member(user) {
            return false;
        }
        self.members.push(user);
        true
    }

    /// Remove `user` from the member set.
    ///
    /// Returns `true` if the user was removed, `false` if not a member.
    /// The creator cannot leave.
    pub fn leave(&mut self, user: Uuid) -> ConnectResult<bool> {
        if user == self.created_by {
            return Err(ConnectError::InvalidState(
                "The community creator cannot leave the community".to_string(),
            ));
        }
        let before = self.members.len();
        self.members.retain(|m| *m != user);
        Ok(self.members.len() != before)
    }

    /// Append a post to `channel` (default `general`).
    pub fn post(
        &mut self,
        user: Uuid,
        channel: Option<&str>,
        text: &str,
    ) -> ConnectResult<&CommunityPost> {
        let channel = channel
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("general");

        let mut v = Validator::new();
        v.required("text", text);
        v.finish()?;

        if !self.is_member(user) {
            return Err(ConnectError::Forbidden(
                "Join the community before posting".to_string(),
            ));
        }
        if !self.has_channel(channel) {
            return Err(ConnectError::NotFound(format!("Channel '{channel}' not found")));
        }

        self.posts.push(CommunityPost {
            id: Uuid::now_v7(),
            user,
            channel: channel.to_string(),
            text: text.trim().to_string(),
            created_at: Utc::now(),
        });
        Ok(&self.posts[self.posts.len() - 1])
    }

    /// Posts in one channel, oldest first.
    pub fn posts_in<'a>(&'a self, channel: &'a str) -> impl Iterator<Item = &'a CommunityPost> + 'a {
        self.posts.iter().filter(move |p| p.channel == channel)
    }
}

impl Document for Community {
    const COLLECTION: &'static str = "communities";
    const LABEL: &'static str = "Community";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        let mut v = Validator::new();
        v.required("name", &self.name);
        v.check(
            self.is_member(self.created_by),
            "\"members\" must include the creator",
        );
        let mut seen = std::collections::HashSet::new();
        v.check(
            self.members.iter().all(|m| seen.insert(*m)),
            "\"members\" must not contain duplicates",
        );
        v.finish()
    }
}
