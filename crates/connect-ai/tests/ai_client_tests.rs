//! AI client against a mock AI service.
//!
//! Covers the happy path, opt-in retry on transient failures, and the fallback
//! when the service is down or answers garbage.

use connect_ai::{AiClient, AiConfig, AiError, LearningPath, ResumeAnalysis};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock AI server plus a config pointing at it.
struct TestFixture {
    server: MockServer,
    config: AiConfig,
}

impl TestFixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let config = AiConfig::offline()
            .with_resume_parser_url(format!("{}/parse", server.uri()))
            .with_learning_path_url(format!("{}/path", server.uri()))
            .with_api_key("test-ai-key")
            .with_timeout_secs(2);
        Self { server, config }
    }

    fn client(&self) -> AiClient {
        AiClient::new(self.config.clone()).unwrap()
    }
}

#[tokio::test]
async fn test_parse_resume_uses_service() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/parse"))
        .and(header("Authorization", "Bearer test-ai-key"))
        .and(body_json(serde_json::json!({ "text": "Rust, Tokio, Postgres" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "skills": ["Rust", "Tokio", "Postgres"],
            "summary": "Backend engineer",
            "score": 88
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let analysis = fixture.client().parse_resume("Rust, Tokio, Postgres").await;
    assert_eq!(analysis.skills, vec!["Rust", "Tokio", "Postgres"]);
    assert_eq!(analysis.summary, "Backend engineer");
    assert_eq!(analysis.score, 88.0);
}

#[tokio::test]
async fn test_learning_path_sends_skills_and_goal() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/path"))
        .and(body_json(serde_json::json!({
            "currentSkills": ["HTML"],
            "goalRole": "Full Stack Developer"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recommendedSkills": ["TypeScript"],
            "timeline": "6 weeks",
            "steps": ["Learn TypeScript"]
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let path = fixture
        .client()
        .learning_path(&["HTML".to_string()], Some("Full Stack Developer"))
        .await;
    assert_eq!(path.recommended_skills, vec!["TypeScript"]);
    assert_eq!(path.timeline, "6 weeks");
}

#[tokio::test]
async fn test_server_error_falls_back_after_one_round_trip() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/parse"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let analysis = fixture.client().parse_resume("cv").await;
    assert_eq!(analysis, ResumeAnalysis::fallback());
}

#[tokio::test]
async fn test_server_error_is_retried_when_enabled() {
    let fixture = TestFixture::new().await;

    // max_retries = 1, so exactly two attempts
    Mock::given(method("POST"))
        .and(path("/parse"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(2)
        .mount(&fixture.server)
        .await;

    let client = AiClient::new(fixture.config.clone().with_max_retries(1)).unwrap();
    let err = client.try_parse_resume("cv").await.unwrap_err();
    assert!(matches!(err, AiError::ApiError { status: 503, .. }));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/path"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let path = fixture.client().learning_path(&[], None).await;
    assert_eq!(path, LearningPath::fallback());
}

#[tokio::test]
async fn test_garbage_body_falls_back() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/parse"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&fixture.server)
        .await;

    let client = fixture.client();
    assert!(matches!(
        client.try_parse_resume("cv").await,
        Err(AiError::InvalidResponse(_))
    ));
    assert_eq!(client.parse_resume("cv").await, ResumeAnalysis::fallback());
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    let config = AiConfig::offline()
        .with_resume_parser_url("http://127.0.0.1:9/parse")
        .with_max_retries(0)
        .with_timeout_secs(1);
    let client = AiClient::new(config).unwrap();

    assert_eq!(client.parse_resume("cv").await, ResumeAnalysis::fallback());
}
