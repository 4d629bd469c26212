//! The full set of collections backing the API

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use connect_auth::UserDirectory;
use connect_model::{
    normalize_email, Community, Donation, Event, FeedPost, Job, LearningResource,
    MentorshipRequest, Message, User,
};

use crate::collection::Collection;

/// Every collection, cloned cheaply into each service.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub users: Collection<User>,
    pub jobs: Collection<Job>,
    pub events: Collection<Event>,
    pub communities: Collection<Community>,
    pub feed: Collection<FeedPost>,
    pub donations: Collection<Donation>,
    pub resources: Collection<LearningResource>,
    pub mentorship: Collection<MentorshipRequest>,
    pub messages: Collection<Message>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a user up by email, case-insensitively.
    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.users.find_one(|u| u.email == email).await
    }
}

#[async_trait]
impl UserDirectory for Collection<User> {
    async fn find_user(&self, id: Uuid) -> Option<User> {
        self.find_by_id(id).await
    }

    async fn record_activity(&self, id: Uuid) {
        let now = Utc::now();
        if let Err(e) = self
            .update(id, |user| {
                user.last_active = Some(now);
                Ok(())
            })
            .await
        {
            warn!(user_id = %id, error = %e, "Failed to record user activity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_rbac::Role;

    #[tokio::test]
    async fn test_user_by_email_is_case_insensitive() {
        let store = Store::new();
        store
            .users
            .insert(User::new("Ravi Kumar", "Ravi@BCET.edu", "h", Role::Alumni))
            .await
            .unwrap();
        assert!(store.user_by_email("  ravi@bcet.EDU ").await.is_some());
        assert!(store.user_by_email("other@bcet.edu").await.is_none());
    }

    #[tokio::test]
    async fn test_directory_records_activity() {
        let store = Store::new();
        let user = store
            .users
            .insert(User::new("Meera Singh", "meera@bcet.edu", "h", Role::Student))
            .await
            .unwrap();
        assert!(user.last_active.is_none());

        store.users.record_activity(user.id).await;
        let found = store.users.find_user(user.id).await.unwrap();
        assert!(found.last_active.is_some());

        // unknown ids are ignored
        store.users.record_activity(Uuid::now_v7()).await;
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let store = Store::new();
        let other = store.clone();
        store
            .users
            .insert(User::new("Shared User", "shared@bcet.edu", "h", Role::Faculty))
            .await
            .unwrap();
        assert_eq!(other.users.len().await, 1);
    }
}
