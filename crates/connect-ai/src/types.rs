//! Request and response payloads

use serde::{Deserialize, Serialize};

/// Body sent to the resume parser.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRequest<'a> {
    pub text: &'a str,
}

/// Parsed resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub score: f64,
}

impl ResumeAnalysis {
    /// Served when the parser is unconfigured or unreachable.
    pub fn fallback() -> Self {
        Self {
            skills: vec!["JavaScript".into(), "React".into(), "Node.js".into()],
            summary: "Dummy AI summary (set AI_RESUME_PARSER_URL for real AI).".into(),
            score: 75.0,
        }
    }
}

/// Body sent to the learning path generator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathRequest<'a> {
    pub current_skills: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_role: Option<&'a str>,
}

/// Suggested learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    #[serde(default)]
    pub recommended_skills: Vec<String>,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl LearningPath {
    /// Served when the generator is unconfigured or unreachable.
    pub fn fallback() -> Self {
        Self {
            recommended_skills: vec![
                "Data Structures".into(),
                "React".into(),
                "Node.js".into(),
            ],
            timeline: "3 months (dummy)".into(),
            steps: vec![
                "Complete basics of JavaScript".into(),
                "Learn React fundamentals".into(),
                "Build 2-3 full-stack projects with Node.js".into(),
            ],
        }
    }
}
