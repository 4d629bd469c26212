//! User domain models
//!
//! A user carries exactly one [`Role`]. The role is never changed through
//! the profile update path; only the admin role-change operation sets it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use connect_rbac::{Role, RoleBearer};

use crate::document::{document_timestamps, Document};
use crate::error::ConnectResult;
use crate::validation::Validator;

/// A portfolio project on a user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

/// Social profile links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A registered user.
///
/// # Examples
///
/// ```
/// use connect_model::User;
/// use connect_rbac::Role;
///
/// let user = User::new("Asha Verma", "  Asha@BCET.ac.in ", "$2b$10$...", Role::Alumni)
///     .with_batch("2019")
///     .with_department("CSE");
/// assert_eq!(user.email, "asha@bcet.ac.in");
/// assert_eq!(user.role, Role::Alumni);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Display name, trimmed
    pub name: String,

    /// Login email, lowercased (unique)
    pub email: String,

    /// Encoded password hash; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: Role,

    #[serde(default)]
    pub bio: String,

    pub avatar: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub portfolio: Vec<PortfolioItem>,

    #[serde(default)]
    pub social: SocialLinks,

    /// Resume file URL
    pub resume: Option<String>,

    /// Graduation batch, e.g. "2025"
    pub batch: Option<String>,

    /// e.g. "CSE"
    pub department: Option<String>,

    /// e.g. "Full Stack Developer | BCET CSE"
    pub headline: Option<String>,

    /// Last authenticated request
    pub last_active: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user. Name is trimmed and email lowercased.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into().trim().to_string(),
            email: normalize_email(&email.into()),
            password_hash: password_hash.into(),
            role,
            bio: String::new(),
            avatar: None,
            skills: Vec::new(),
            portfolio: Vec::new(),
            social: SocialLinks::default(),
            resume: None,
            batch: None,
            department: None,
            headline: None,
            last_active: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    /// Apply a self-service profile update.
    ///
    /// Only the whitelisted fields of [`ProfileUpdate`] exist, so role and
    /// email cannot be touched here.
    pub fn apply_profile_update(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        if let Some(social) = update.social {
            self.social = social;
        }
        if let Some(portfolio) = update.portfolio {
            self.portfolio = portfolio;
        }
        if let Some(resume) = update.resume {
            self.resume = Some(resume);
        }
        if let Some(batch) = update.batch {
            self.batch = Some(batch);
        }
        if let Some(department) = update.department {
            self.department = Some(department);
        }
        if let Some(headline) = update.headline {
            self.headline = Some(headline);
        }
    }

    /// Graduation year parsed from `batch`, if numeric.
    pub fn batch_year(&self) -> Option<i32> {
        self.batch.as_deref().and_then(|b| b.trim().parse().ok())
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary::from(self)
    }

    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile::from(self)
    }
}

impl RoleBearer for User {
    fn role(&self) -> Option<Role> {
        Some(self.role)
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        let mut v = Validator::new();
        v.length("name", &self.name, 3, 80).email("email", &self.email);
        for item in &self.portfolio {
            v.required("portfolio.title", &item.title);
        }
        v.finish()
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone())]
    }
}

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whitelisted self-service profile fields.
///
/// Unknown keys (`role`, `email`, `password`) are ignored on deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social: Option<SocialLinks>,
    pub portfolio: Option<Vec<PortfolioItem>>,
    pub resume: Option<String>,
    pub batch: Option<String>,
    pub department: Option<String>,
    pub headline: Option<String>,
}

/// Author card embedded in other resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            role: user.role,
        }
    }
}

/// Mentor directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorCard {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub role: Role,
    pub skills: Vec<String>,
    pub bio: String,
}

impl From<&User> for MentorCard {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            role: user.role,
            skills: user.skills.clone(),
            bio: user.bio.clone(),
        }
    }
}

/// Profile as seen by other users: no email, no password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub bio: String,
    pub avatar: Option<String>,
    pub skills: Vec<String>,
    pub portfolio: Vec<PortfolioItem>,
    pub social: SocialLinks,
    pub resume: Option<String>,
    pub batch: Option<String>,
    pub department: Option<String>,
    pub headline: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            skills: user.skills.clone(),
            portfolio: user.portfolio.clone(),
            social: user.social.clone(),
            resume: user.resume.clone(),
            batch: user.batch.clone(),
            department: user.department.clone(),
            headline: user.headline.clone(),
            created_at: user.created_at,
        }
    }
}
