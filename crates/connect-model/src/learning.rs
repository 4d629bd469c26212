//! Learning hub resources
//!
//! A user sits in at most one of `upvotes` / `downvotes`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{document_timestamps, Document};
use crate::error::ConnectResult;
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningResource {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub level: ResourceLevel,

    /// Skills this resource helps with, e.g. `["React", "Node.js"]`
    #[serde(default)]
    pub skills: Vec<String>,

    /// Format tags: video, blog, course, playlist
    #[serde(default)]
    pub tags: Vec<String>,

    pub created_by: Option<Uuid>,

    #[serde(default)]
    pub upvotes: Vec<Uuid>,
    #[serde(default)]
    pub downvotes: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LearningResource {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into().trim().to_string(),
            description: None,
            url: url.into().trim().to_string(),
            level: ResourceLevel::default(),
            skills: Vec::new(),
            tags: Vec::new(),
            created_by: None,
            upvotes: Vec::new(),
            downvotes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_level(mut self, level: ResourceLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_creator(mut self, user: Uuid) -> Self {
        self.created_by = Some(user);
        self
    }

    /// Add `user` to one vote set and remove them from the other.
    pub fn vote(&mut self, user: Uuid, vote: Vote) {
        let (add, remove) = match vote {
            Vote::Up => (&mut self.upvotes, &mut self.downvotes),
            Vote::Down => (&mut self.downvotes, &mut self.upvotes),
        };
        remove.retain(|u| *u != user);
        if !add.contains(&user) {
            add.push(user);
        }
    }

    /// Upvotes minus downvotes.
    pub fn score(&self) -> i64 {
        self.upvotes.len() as i64 - self.downvotes.len() as i64
    }

    /// Case-insensitive skill match.
    pub fn teaches(&self, skill: &str) -> bool {
        let skill = skill.trim();
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}

impl Document for LearningResource {
    const COLLECTION: &'static str = "learning_resources";
    const LABEL: &'static str = "Resource";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        let mut v = Validator::new();
        v.required("title", &self.title).uri("url", &self.url);
        v.check(
            !self.upvotes.iter().any(|u| self.downvotes.contains(u)),
            "a user cannot both upvote and downvote a resource",
        );
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource() -> LearningResource {
        LearningResource::new("The Rust Book", "https://doc.rust-lang.org/book/")
            .with_skills(vec!["Rust".into()])
    }

    #[test]
    fn test_vote_moves_between_sets() {
        let mut r = resource();
        let user = Uuid::now_v7();

        r.vote(user, Vote::Up);
        r.vote(user, Vote::Up);
        assert_eq!(r.upvotes, vec![user]);
        assert_eq!(r.score(), 1);

        r.vote(user, Vote::Down);
        assert!(r.upvotes.is_empty());
        assert_eq!(r.downvotes, vec![user]);
        assert_eq!(r.score(), -1);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_teaches_is_case_insensitive() {
        assert!(resource().teaches("rust"));
        assert!(!resource().teaches("go"));
    }

    #[test]
    fn test_requires_url() {
        let r = LearningResource::new("Notes", "not a url");
        assert!(r.validate().is_err());
    }
}
