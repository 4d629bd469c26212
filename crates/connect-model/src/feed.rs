//! Social feed posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use connect_rbac::Role;

use crate::document::{document_timestamps, Document};
use crate::error::ConnectResult;
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(alias = "type")]
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    General,
    Job,
    Event,
    Resource,
}

impl PostType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(Self::General),
            "job" => Some(Self::Job),
            "event" => Some(Self::Event),
            "resource" => Some(Self::Resource),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub user: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A post on the campus feed. Needs text or at least one media item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub text: Option<String>,
    #[serde(default)]
    pub media: Vec<Media>,
    pub post_type: PostType,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedPost {
    pub fn new(posted_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            posted_by,
            text: None,
            media: Vec::new(),
            post_type: PostType::default(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.trim();
        self.text = (!text.is_empty()).then(|| text.to_string());
        self
    }

    pub fn with_media(mut self, media: Vec<Media>) -> Self {
        self.media = media;
        self
    }

    pub fn with_post_type(mut self, post_type: PostType) -> Self {
        self.post_type = post_type;
        self
    }

    /// Returns `true` if the like was added.
    pub fn like(&mut self, user: Uuid) -> bool {
        if self.likes.contains(&user) {
            return false;
        }
        self.likes.push(user);
        true
    }

    /// Returns `true` if a like was removed.
    pub fn unlike(&mut self, user: Uuid) -> bool {
        let before = self.likes.len();
        self.likes.retain(|u| *u != user);
        before != self.likes.len()
    }

    pub fn comment(&mut self, user: Uuid, text: &str) -> ConnectResult<&Comment> {
        let mut v = Validator::new();
        v.required("text", text);
        v.finish()?;

        self.comments.push(Comment {
            user,
            text: text.trim().to_string(),
            created_at: Utc::now(),
        });
        Ok(&self.comments[self.comments.len() - 1])
    }

    /// Authors delete their own posts; admins delete any.
    pub fn can_delete(&self, user: Uuid, role: Role) -> bool {
        self.posted_by == user || role.is_admin()
    }
}

impl Document for FeedPost {
    const COLLECTION: &'static str = "feed";
    const LABEL: &'static str = "Post";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        let has_text = self.text.as_deref().is_some_and(|t| !t.trim().is_empty());
        let mut v = Validator::new();
        v.check(
            has_text || !self.media.is_empty(),
            "\"text\" or \"media\" is required",
        );
        for item in &self.media {
            v.uri("media.url", &item.url);
        }
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_or_media_required() {
        let post = FeedPost::new(Uuid::now_v7()).with_text("   ");
        assert!(post.text.is_none());
        assert!(post.validate().is_err());

        let post = FeedPost::new(Uuid::now_v7()).with_media(vec![Media {
            kind: MediaKind::Image,
            url: "https://cdn.example.com/a.png".into(),
        }]);
        assert!(post.validate().is_ok());
    }

    #[test]
    fn test_like_unlike_idempotent() {
        let mut post = FeedPost::new(Uuid::now_v7()).with_text("Hello BCET");
        let user = Uuid::now_v7();
        assert!(post.like(user));
        assert!(!post.like(user));
        assert_eq!(post.likes.len(), 1);
        assert!(post.unlike(user));
        assert!(!post.unlike(user));
        assert!(post.likes.is_empty());
    }

    #[test]
    fn test_comment_requires_text() {
        let mut post = FeedPost::new(Uuid::now_v7()).with_text("Hello");
        assert!(post.comment(Uuid::now_v7(), "").is_err());
        assert_eq!(post.comment(Uuid::now_v7(), " nice ").unwrap().text, "nice");
    }

    #[test]
    fn test_can_delete() {
        let author = Uuid::now_v7();
        let post = FeedPost::new(author).with_text("x");
        assert!(post.can_delete(author, Role::Student));
        assert!(post.can_delete(Uuid::now_v7(), Role::Admin));
        assert!(!post.can_delete(Uuid::now_v7(), Role::Faculty));
    }
}
