//! Visibility filters
//!
//! A filter is a predicate value, not a result set: services hand it to
//! the store's `find`. Search terms and field filters are AND-ed with the
//! role-based visibility, so they can narrow a listing but never widen it.
//!
//! | Resource | student | alumni / faculty | admin / superadmin |
//! |---|---|---|---|
//! | Job | approved | approved OR own | all |
//! | Event | approved AND NOT deleted | same | all (admin queues) |

use chrono::{DateTime, Utc};
use uuid::Uuid;

use connect_rbac::Role;

use crate::event::{Event, EventCategory};
use crate::job::{EmploymentType, Job};

/// Which jobs a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobVisibility {
    /// No approval filter
    All,
    /// `is_approved`
    ApprovedOnly,
    /// `is_approved OR posted_by = user`
    ApprovedOrPostedBy(Uuid),
    /// `NOT is_approved` (admin pending queue)
    PendingOnly,
}

impl JobVisibility {
    /// Visibility for the public job listing.
    ///
    /// # Example
    ///
    /// ```
    /// use connect_model::JobVisibility;
    /// use connect_rbac::Role;
    /// use uuid::Uuid;
    ///
    /// let me = Uuid::now_v7();
    /// assert_eq!(JobVisibility::for_caller(Role::Student, me), JobVisibility::ApprovedOnly);
    /// assert_eq!(JobVisibility::for_caller(Role::Faculty, me), JobVisibility::ApprovedOrPostedBy(me));
    /// assert_eq!(JobVisibility::for_caller(Role::SuperAdmin, me), JobVisibility::All);
    /// ```
    pub fn for_caller(role: Role, caller: Uuid) -> Self {
        match role {
            Role::Student => Self::ApprovedOnly,
            Role::Alumni | Role::Faculty => Self::ApprovedOrPostedBy(caller),
            Role::Admin | Role::SuperAdmin => Self::All,
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        match self {
            Self::All => true,
            Self::ApprovedOnly => job.is_approved,
            Self::ApprovedOrPostedBy(user) => job.is_approved || job.posted_by == *user,
            Self::PendingOnly => !job.is_approved,
        }
    }
}

/// Job listing predicate: visibility AND search AND filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub visibility: JobVisibility,
    /// Case-insensitive substring of title or company
    pub search: Option<String>,
    pub employment_type: Option<EmploymentType>,
    /// Case-insensitive substring of location
    pub location: Option<String>,
}

impl JobQuery {
    pub fn new(visibility: JobVisibility) -> Self {
        Self {
            visibility,
            search: None,
            employment_type: None,
            location: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_blank(search.into());
        self
    }

    pub fn with_employment_type(mut self, employment_type: EmploymentType) -> Self {
        self.employment_type = Some(employment_type);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(location.into());
        self
    }

    pub fn matches(&self, job: &Job) -> bool {
        if !self.visibility.matches(job) {
            return false;
        }
        if let Some(search) = &self.search {
            if !contains_ci(&job.title, search) && !contains_ci(&job.company, search) {
                return false;
            }
        }
        if let Some(employment_type) = self.employment_type {
            if job.employment_type != employment_type {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ci(&job.location, location) {
                return false;
            }
        }
        true
    }
}

/// Which events a caller may see.
///
/// There is no creator self-exception: an unapproved event is reachable
/// only through the admin queue or a direct fetch by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventVisibility {
    /// `approved AND NOT is_deleted`
    Published,
    /// `NOT approved` (admin pending queue)
    PendingReview,
}

impl EventVisibility {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Self::Published => event.is_published(),
            Self::PendingReview => !event.approved,
        }
    }
}

/// Event listing predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub visibility: EventVisibility,
    pub category: Option<EventCategory>,
    /// Only events dated at or after this instant
    pub upcoming_from: Option<DateTime<Utc>>,
}

impl EventQuery {
    pub fn new(visibility: EventVisibility) -> Self {
        Self {
            visibility,
            category: None,
            upcoming_from: None,
        }
    }

    /// The listing every authenticated role sees.
    pub fn published() -> Self {
        Self::new(EventVisibility::Published)
    }

    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn upcoming_from(mut self, now: DateTime<Utc>) -> Self {
        self.upcoming_from = Some(now);
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.visibility.matches(event)
            && self.category.map_or(true, |c| event.category == c)
            && self.upcoming_from.map_or(true, |now| event.date >= now)
    }
}

fn non_blank(s: String) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
