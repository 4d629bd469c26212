//! Communities
//!
//! No approval gate: a community is listed and joinable as soon as it
//! exists. Only members may post, and only into an existing channel.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use connect_auth::Caller;
use connect_model::{Community, CommunityPost, ConnectError, ConnectResult, UserSummary, Validator};
use connect_rbac::{Action, ResourceType};
use connect_store::Store;

use crate::access::authorize;
use crate::views::author_index;

/// New community.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateCommunityParams {
    pub name: String,
    pub description: Option<String>,
    pub banner: Option<String>,
}

/// A channel post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommunityPostParams {
    /// Defaults to `general`
    pub channel: Option<String>,
    pub text: String,
}

/// A community in the directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityListing {
    #[serde(flatten)]
    pub community: Community,
    pub members_count: usize,
    pub creator: Option<UserSummary>,
}

/// A post with its author resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: CommunityPost,
    pub author: Option<UserSummary>,
}

/// A community page: creator, member cards and posts with authors.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityDetails {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub banner: String,
    pub channels: Vec<String>,
    pub creator: Option<UserSummary>,
    pub members: Vec<UserSummary>,
    pub members_count: usize,
    pub posts: Vec<PostWithAuthor>,
}

#[derive(Debug, Clone)]
pub struct CommunityService {
    store: Store,
}

impl CommunityService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a community with the default channels. The creator is its
    /// first member.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn create(
        &self,
        caller: &Caller,
        params: CreateCommunityParams,
    ) -> ConnectResult<Community> {
        authorize(caller, ResourceType::Community, Action::Create)?;

        let mut v = Validator::new();
        v.length("name", params.name.trim(), 3, 100);
        v.finish()?;

        let mut community = Community::new(params.name, caller.id);
        if let Some(description) = params.description {
            community = community.with_description(description);
        }
        if let Some(banner) = params.banner {
            community = community.with_banner(banner);
        }

        let community = self.store.communities.insert(community).await?;
        info!(community_id = %community.id, "Community created");
        Ok(community)
    }

    /// All communities, newest first.
    pub async fn list(&self) -> Vec<CommunityListing> {
        let communities = self.store.communities.all().await;
        let creators = author_index(&self.store, communities.iter().map(|c| c.created_by)).await;
        communities
            .into_iter()
            .map(|community| CommunityListing {
                members_count: community.members_count(),
                creator: creators.get(&community.created_by).cloned(),
                community,
            })
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> ConnectResult<CommunityDetails> {
        let community = self.store.communities.get(id).await?;
        Ok(self.details(community).await)
    }

    /// Add the caller to the members. Joining twice changes nothing.
    #[instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn join(&self, caller: &Caller, id: Uuid) -> ConnectResult<CommunityDetails> {
        authorize(caller, ResourceType::Community, Action::Join)?;
        let member = caller.id;
        let (community, added) = self
            .store
            .communities
            .update_with(id, move |c| Ok(c.join(member)))
            .await?;
        if added {
            info!(community_id = %community.id, members = community.members_count(), "Joined community");
        }
        Ok(self.details(community).await)
    }

    /// Remove the caller from the members. Leaving twice changes nothing;
    /// the creator cannot leave.
    #[instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn leave(&self, caller: &Caller, id: Uuid) -> ConnectResult<CommunityDetails> {
        authorize(caller, ResourceType::Community, Action::Leave)?;
        let member = caller.id;
        let (community, removed) = self
            .store
            .communities
            .update_with(id, move |c| c.leave(member))
            .await?;
        if removed {
            info!(community_id = %community.id, members = community.members_count(), "Left community");
        }
        Ok(self.details(community).await)
    }

    /// Post into a channel.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn post(
        &self,
        caller: &Caller,
        id: Uuid,
        params: CommunityPostParams,
    ) -> ConnectResult<CommunityDetails> {
        authorize(caller, ResourceType::Community, Action::Post)?;
        if params.text.trim().is_empty() {
            return Err(ConnectError::ValidationFailed(
                "Post text is required".to_string(),
            ));
        }

        let author = caller.id;
        let (community, post_id) = self
            .store
            .communities
            .update_with(id, move |c| {
                c.post(author, params.channel.as_deref(), &params.text)
                    .map(|p| p.id)
            })
            .await?;
        info!(community_id = %community.id, post_id = %post_id, "Community post created");
        Ok(self.details(community).await)
    }

    async fn details(&self, community: Community) -> CommunityDetails {
        let people = author_index(
            &self.store,
            community
                .members
                .iter()
                .copied()
                .chain(community.posts.iter().map(|p| p.user))
                .chain(std::iter::once(community.created_by)),
        )
        .await;

        CommunityDetails {
            id: community.id,
            name: community.name.clone(),
            description: community.description.clone(),
            banner: community.banner.clone(),
            channels: community.channels.iter().map(|c| c.name.clone()).collect(),
            creator: people.get(&community.created_by).cloned(),
            members: community
                .members
                .iter()
                .filter_map(|m| people.get(m).cloned())
                .collect(),
            members_count: community.members_count(),
            posts: community
                .posts
                .into_iter()
                .map(|post| PostWithAuthor {
                    author: people.get(&post.user).cloned(),
                    post,
                })
                .collect(),
        }
    }
}
