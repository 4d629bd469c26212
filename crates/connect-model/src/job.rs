//! Job board models
//!
//! A job is created pending and becomes visible to students only once an
//! admin approves it. Approval is one-way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use connect_rbac::Role;

use crate::document::{document_timestamps, Document};
use crate::error::{ConnectError, ConnectResult};
use crate::validation::Validator;

const DEFAULT_COMPANY_LOGO: &str = "https://via.placeholder.com/100x100?text=Logo";

/// Employment type of a posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[default]
    #[serde(rename = "Full-Time")]
    FullTime,
    Internship,
    #[serde(rename = "Part-Time")]
    PartTime,
    Contract,
    Freelance,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "Full-Time",
            Self::Internship => "Internship",
            Self::PartTime => "Part-Time",
            Self::Contract => "Contract",
            Self::Freelance => "Freelance",
        }
    }

    /// Case-insensitive parse; accepts `full-time`, `fulltime`, `full_time`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "full-time" | "fulltime" => Some(Self::FullTime),
            "internship" | "intern" => Some(Self::Internship),
            "part-time" | "parttime" => Some(Self::PartTime),
            "contract" => Some(Self::Contract),
            "freelance" => Some(Self::Freelance),
            _ => None,
        }
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkMode {
    #[default]
    Onsite,
    Remote,
    Hybrid,
}

/// Seniority of a posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Mid,
    Senior,
    Lead,
}

/// Offered salary band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            currency: default_currency(),
        }
    }
}

/// Applicant pipeline status. Only `Applied` is ever set by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantStatus {
    #[default]
    Applied,
    Shortlisted,
    Rejected,
    Hired,
}

/// One application to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub user: Uuid,
    pub resume: Option<String>,
    pub status: ApplicantStatus,
    pub applied_at: DateTime<Utc>,
}

/// A job posting.
///
/// # Examples
///
/// ```
/// use connect_model::{EmploymentType, Job};
/// use uuid::Uuid;
///
/// let job = Job::new("SDE Intern", "Acme", "Remote", "Work on the billing service", Uuid::now_v7())
///     .with_employment_type(EmploymentType::Internship)
///     .with_skills(vec!["Rust".into()]);
/// assert!(!job.is_approved);
/// assert_eq!(job.applicants_count(), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub company_logo: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub mode: WorkMode,
    pub experience_level: ExperienceLevel,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub salary_range: SalaryRange,
    #[serde(default)]
    pub apply_link: String,
    pub deadline: Option<DateTime<Utc>>,

    /// Author
    pub posted_by: Uuid,

    /// Author's role at posting time; absent on legacy documents
    #[serde(default)]
    pub posted_by_role: Option<Role>,

    pub is_approved: bool,

    /// One entry per distinct user
    #[serde(default)]
    pub applicants: Vec<Applicant>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a pending job posting.
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
        posted_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            company: company.into(),
            company_logo: DEFAULT_COMPANY_LOGO.to_string(),
            location: location.into(),
            employment_type: EmploymentType::default(),
            mode: WorkMode::default(),
            experience_level: ExperienceLevel::default(),
            category: "General".to_string(),
            description: description.into(),
            skills: Vec::new(),
            salary_range: SalaryRange::default(),
            apply_link: String::new(),
            deadline: None,
            posted_by,
            posted_by_role: None,
            is_approved: false,
            applicants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_poster_role(mut self, role: Role) -> Self {
        self.posted_by_role = Some(role);
        self
    }

    pub fn with_employment_type(mut self, employment_type: EmploymentType) -> Self {
        self.employment_type = employment_type;
        self
    }

    pub fn with_mode(mut self, mode: WorkMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = level;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_salary_range(mut self, salary_range: SalaryRange) -> Self {
        self.salary_range = salary_range;
        self
    }

    pub fn with_apply_link(mut self, link: impl Into<String>) -> Self {
        self.apply_link = link.into();
        self
    }

    pub fn with_company_logo(mut self, logo: impl Into<String>) -> Self {
        self.company_logo = logo.into();
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Mark approved. Approving twice is a no-op.
    pub fn approve(&mut self) {
        self.is_approved = true;
    }

    pub fn has_applied(&self, user: Uuid) -> bool {
        self.applicants.iter().any(|a| a.user == user)
    }

    pub fn applicants_count(&self) -> usize {
        self.applicants.len()
    }

    /// Apply to this job.
    ///
    /// Guards, in order: approved, then not already applied.
    pub fn apply(&mut self, user: Uuid, resume: Option<String>) -> ConnectResult<&Applicant> {
        if !self.is_approved {
            return Err(ConnectError::InvalidState("Job not approved yet".to_string()));
        }
        if self.has_applied(user) {
            return Err(ConnectError::Conflict("You already applied".to_string()));
        }

        self.applicants.push(Applicant {
            user,
            resume,
            status: ApplicantStatus::Applied,
            applied_at: Utc::now(),
        });
        Ok(&self.applicants[self.applicants.len() - 1])
    }
}

impl Document for Job {
    const COLLECTION: &'static str = "jobs";
    const LABEL: &'static str = "Job";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        let mut v = Validator::new();
        v.required("title", &self.title)
            .required("company", &self.company)
            .required("location", &self.location)
            .required("description", &self.description);
        let mut seen = std::collections::HashSet::new();
        v.check(
            self.applicants.iter().all(|a| seen.insert(a.user)),
            "\"applicants\" must not contain duplicate users",
        );
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::new("SDE", "Acme", "Remote", "Ship features", Uuid::now_v7())
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = job();
        assert!(!job.is_approved);
        assert_eq!(job.salary_range.currency, "INR");
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_apply_guards_in_order() {
        let mut job = job();
        let user = Uuid::now_v7();
        assert_eq!(
            job.apply(user, None).unwrap_err(),
            ConnectError::InvalidState("Job not approved yet".into())
        );

        job.approve();
        let applicant = job.apply(user, Some("https://cdn/cv.pdf".into())).unwrap();
        assert_eq!(applicant.status, ApplicantStatus::Applied);

        assert_eq!(
            job.apply(user, None).unwrap_err(),
            ConnectError::Conflict("You already applied".into())
        );
        assert_eq!(job.applicants_count(), 1);
    }

    #[test]
    fn test_employment_type_serde_and_parse() {
        assert_eq!(
            serde_json::to_string(&EmploymentType::FullTime).unwrap(),
            "\"Full-Time\""
        );
        assert_eq!(EmploymentType::parse("part_time"), Some(EmploymentType::PartTime));
        assert_eq!(EmploymentType::parse("Internship"), Some(EmploymentType::Internship));
        assert_eq!(EmploymentType::parse("gig"), None);
    }

    #[test]
    fn test_duplicate_applicants_fail_validation() {
        let mut job = job();
        let user = Uuid::now_v7();
        for _ in 0..2 {
            job.applicants.push(Applicant {
                user,
                resume: None,
                status: ApplicantStatus::Applied,
                applied_at: Utc::now(),
            });
        }
        assert!(job.validate().is_err());
    }
}
