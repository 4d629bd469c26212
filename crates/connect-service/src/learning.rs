//! Learning hub: shared resources, votes and the AI helpers
//!
//! The AI helpers never fail the request; an unconfigured or unreachable
//! AI service yields the client's fallback payload.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use connect_ai::{AiClient, LearningPath, ResumeAnalysis};
use connect_auth::Caller;
use connect_model::{ConnectResult, LearningResource, ResourceLevel, Validator, Vote};
use connect_rbac::{Action, ResourceType};
use connect_store::Store;

use crate::access::authorize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourceListParams {
    pub skill: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateResourceParams {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub level: Option<ResourceLevel>,
    pub skills: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParseResumeParams {
    #[serde(alias = "resumeText")]
    pub resume_text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LearningPathParams {
    #[serde(alias = "goalRole")]
    pub goal_role: Option<String>,
}

/// A resource with its vote tally.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    #[serde(flatten)]
    pub resource: LearningResource,
    pub score: i64,
}

impl From<LearningResource> for ResourceView {
    fn from(resource: LearningResource) -> Self {
        Self {
            score: resource.score(),
            resource,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LearningService {
    store: Store,
    ai: AiClient,
}

impl LearningService {
    pub fn new(store: Store, ai: AiClient) -> Self {
        Self { store, ai }
    }

    /// Resources newest first, optionally only those teaching `skill`.
    pub async fn list(&self, params: ResourceListParams) -> Vec<ResourceView> {
        let skill = params.skill.filter(|s| !s.trim().is_empty());
        self.store
            .resources
            .find(|r| skill.as_deref().map_or(true, |s| r.teaches(s)))
            .await
            .into_iter()
            .map(ResourceView::from)
            .collect()
    }

    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn create(
        &self,
        caller: &Caller,
        params: CreateResourceParams,
    ) -> ConnectResult<ResourceView> {
        authorize(caller, ResourceType::LearningResource, Action::Create)?;

        let mut v = Validator::new();
        v.required("title", params.title.trim())
            .required("url", params.url.trim());
        if !params.url.trim().is_empty() {
            v.uri("url", params.url.trim());
        }
        v.finish()?;

        let mut resource = LearningResource::new(params.title, params.url)
            .with_level(params.level.unwrap_or_default())
            .with_skills(clean_list(params.skills))
            .with_tags(clean_list(params.tags))
            .with_creator(caller.id);
        if let Some(description) = params.description.filter(|d| !d.trim().is_empty()) {
            resource = resource.with_description(description);
        }

        let resource = self.store.resources.insert(resource).await?;
        info!(resource_id = %resource.id, "Learning resource created");
        Ok(ResourceView::from(resource))
    }

    /// Record the caller's vote, replacing any opposite vote.
    pub async fn vote(&self, caller: &Caller, id: Uuid, vote: Vote) -> ConnectResult<ResourceView> {
        authorize(caller, ResourceType::LearningResource, Action::Vote)?;
        let user = caller.id;
        let resource = self
            .store
            .resources
            .update(id, move |r| {
                r.vote(user, vote);
                Ok(())
            })
            .await?;
        Ok(ResourceView::from(resource))
    }

    pub async fn parse_resume(&self, caller: &Caller, params: ParseResumeParams) -> ConnectResult<ResumeAnalysis> {
        authorize(caller, ResourceType::LearningResource, Action::Read)?;
        Ok(self.ai.parse_resume(&params.resume_text).await)
    }

    /// A path from the caller's profile skills toward `goal_role`.
    pub async fn learning_path(
        &self,
        caller: &Caller,
        params: LearningPathParams,
    ) -> ConnectResult<LearningPath> {
        authorize(caller, ResourceType::LearningResource, Action::Read)?;
        let skills = self
            .store
            .users
            .find_by_id(caller.id)
            .await
            .map(|u| u.skills)
            .unwrap_or_default();
        let goal = params.goal_role.as_deref().map(str::trim).filter(|g| !g.is_empty());
        Ok(self.ai.learning_path(&skills, goal).await)
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
