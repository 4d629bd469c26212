//! Campus feed

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use connect_auth::Caller;
use connect_model::{ConnectError, ConnectResult, FeedPost, Media, PostType, UserSummary};
use connect_rbac::{Action, ResourceType};
use connect_store::Store;

use crate::access::authorize;
use crate::views::author_index;

/// New feed post. Needs text or at least one media item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostParams {
    pub text: Option<String>,
    pub media: Vec<Media>,
    #[serde(alias = "postType")]
    pub post_type: Option<String>,
}

/// Query string of the feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedParams {
    /// A post type, or `all`
    #[serde(rename = "type")]
    pub post_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentParams {
    pub text: String,
}

/// A post with its author and counters.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub post: FeedPost,
    pub author: Option<UserSummary>,
    pub likes_count: usize,
    pub comments_count: usize,
}

#[derive(Debug, Clone)]
pub struct FeedService {
    store: Store,
}

impl FeedService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn create(&self, caller: &Caller, params: CreatePostParams) -> ConnectResult<FeedItem> {
        authorize(caller, ResourceType::FeedPost, Action::Create)?;

        let post_type = match params.post_type.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => PostType::default(),
            Some(raw) => PostType::parse(raw).ok_or_else(|| {
                ConnectError::ValidationFailed(
                    "\"postType\" must be one of [general, job, event, resource]".to_string(),
                )
            })?,
        };

        let mut post = FeedPost::new(caller.id)
            .with_media(params.media)
            .with_post_type(post_type);
        if let Some(text) = params.text {
            post = post.with_text(text);
        }

        let post = self.store.feed.insert(post).await?;
        info!(post_id = %post.id, "Feed post created");
        Ok(self.with_author(post).await)
    }

    /// Posts newest first, optionally of one type.
    pub async fn list(&self, params: FeedParams) -> ConnectResult<Vec<FeedItem>> {
        let filter = match params.post_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => Some(PostType::parse(raw).ok_or_else(|| {
                ConnectError::ValidationFailed(format!("Unknown post type '{raw}'"))
            })?),
        };

        let posts = self
            .store
            .feed
            .find(|p| filter.map_or(true, |t| p.post_type == t))
            .await;
        Ok(self.with_authors(posts).await)
    }

    /// Delete a post. Authors delete their own; admins delete any.
    #[instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> ConnectResult<()> {
        let post = self.store.feed.get(id).await?;
        if !post.can_delete(caller.id, caller.role) {
            return Err(ConnectError::Forbidden(
                "Not allowed to delete this post".to_string(),
            ));
        }
        self.store.feed.delete(id).await?;
        info!(post_id = %id, "Feed post deleted");
        Ok(())
    }

    /// Like a post. Liking twice keeps one like.
    pub async fn like(&self, caller: &Caller, id: Uuid) -> ConnectResult<FeedItem> {
        let user = caller.id;
        let (post, _) = self
            .store
            .feed
            .update_with(id, move |p| Ok(p.like(user)))
            .await?;
        Ok(self.with_author(post).await)
    }

    pub async fn unlike(&self, caller: &Caller, id: Uuid) -> ConnectResult<FeedItem> {
        let user = caller.id;
        let (post, _) = self
            .store
            .feed
            .update_with(id, move |p| Ok(p.unlike(user)))
            .await?;
        Ok(self.with_author(post).await)
    }

    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn comment(
        &self,
        caller: &Caller,
        id: Uuid,
        params: CommentParams,
    ) -> ConnectResult<FeedItem> {
        let user = caller.id;
        let post = self
            .store
            .feed
            .update(id, move |p| p.comment(user, &params.text).map(|_| ()))
            .await?;
        info!(post_id = %post.id, comments = post.comments.len(), "Comment added");
        Ok(self.with_author(post).await)
    }

    async fn with_author(&self, post: FeedPost) -> FeedItem {
        let author = self
            .store
            .users
            .find_by_id(post.posted_by)
            .await
            .map(|u| u.summary());
        FeedItem {
            author,
            likes_count: post.likes.len(),
            comments_count: post.comments.len(),
            post,
        }
    }

    async fn with_authors(&self, posts: Vec<FeedPost>) -> Vec<FeedItem> {
        let authors = author_index(&self.store, posts.iter().map(|p| p.posted_by)).await;
        posts
            .into_iter()
            .map(|post| FeedItem {
                author: authors.get(&post.posted_by).cloned(),
                likes_count: post.likes.len(),
                comments_count: post.comments.len(),
                post,
            })
            .collect()
    }
}
