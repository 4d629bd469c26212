//! AI service client
//!
//! One round trip per request unless `max_retries` opts into retrying
//! transient failures. Public entry points never fail: when an endpoint is
//! unconfigured or the call fails, the fallback payload is returned and the
//! failure is logged at warn.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use crate::retry::with_retry_if;
use crate::types::{LearningPath, LearningPathRequest, ResumeAnalysis, ResumeRequest};

/// Client for resume parsing and learning path generation.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    config: AiConfig,
}

impl std::fmt::Debug for AiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AiClient {
    /// Create a new client.
    pub fn new(config: AiConfig) -> AiResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    /// A client with no endpoints; every call serves its fallback.
    pub fn offline() -> AiResult<Self> {
        Self::new(AiConfig::offline())
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Parse resume text into skills, a summary and a score.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn parse_resume(&self, text: &str) -> ResumeAnalysis {
        match self.try_parse_resume(text).await {
            Ok(analysis) => analysis,
            Err(AiError::NotConfigured(endpoint)) => {
                debug!(endpoint, "AI endpoint not configured, serving fallback");
                ResumeAnalysis::fallback()
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Resume parsing failed, serving fallback");
                ResumeAnalysis::fallback()
            }
        }
    }

    /// Suggest a learning path from the user's current skills.
    #[instrument(skip(self, current_skills), fields(skills = current_skills.len()))]
    pub async fn learning_path(&self, current_skills: &[String], goal_role: Option<&str>) -> LearningPath {
        match self.try_learning_path(current_skills, goal_role).await {
            Ok(path) => path,
            Err(AiError::NotConfigured(endpoint)) => {
                debug!(endpoint, "AI endpoint not configured, serving fallback");
                LearningPath::fallback()
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Learning path generation failed, serving fallback");
                LearningPath::fallback()
            }
        }
    }

    /// [`AiClient::parse_resume`] without the fallback.
    pub async fn try_parse_resume(&self, text: &str) -> AiResult<ResumeAnalysis> {
        let url = self
            .config
            .resume_parser_url
            .as_deref()
            .ok_or(AiError::NotConfigured("resume parser"))?;
        self.post_with_retry(url, &ResumeRequest { text }).await
    }

    /// [`AiClient::learning_path`] without the fallback.
    pub async fn try_learning_path(
        &self,
        current_skills: &[String],
        goal_role: Option<&str>,
    ) -> AiResult<LearningPath> {
        let url = self
            .config
            .learning_path_url
            .as_deref()
            .ok_or(AiError::NotConfigured("learning path"))?;
        let body = LearningPathRequest {
            current_skills,
            goal_role,
        };
        self.post_with_retry(url, &body).await
    }

    async fn post_with_retry<B, T>(&self, url: &str, body: &B) -> AiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        with_retry_if(
            &self.config.retry_config(),
            || self.post(url, body),
            AiError::is_retryable,
        )
        .await
    }

    async fn post<B, T>(&self, url: &str, body: &B) -> AiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        if let Some(ref api_key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AiError::InvalidResponse(e.to_string()))
    }
}
