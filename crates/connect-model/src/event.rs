//! Event models
//!
//! Two independent flags drive an event:
//!
//! ```text
//! approved:   false ──admin──▶ true
//! is_deleted: false ──creator/admin──▶ true   (terminal)
//! ```
//!
//! Registration is a guarded set-add on `registered_users`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use connect_rbac::Role;

use crate::document::{document_timestamps, Document};
use crate::error::{ConnectError, ConnectResult};
use crate::validation::Validator;

/// Capacity applied when the creator does not set one.
pub const DEFAULT_EVENT_CAPACITY: u32 = 200;

/// Minimum description length for a persisted event.
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Event category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    Tech,
    NonTech,
    Sports,
    Cultural,
    Community,
    #[default]
    General,
    Workshop,
    Seminar,
    Placement,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::NonTech => "non-tech",
            Self::Sports => "sports",
            Self::Cultural => "cultural",
            Self::Community => "community",
            Self::General => "general",
            Self::Workshop => "workshop",
            Self::Seminar => "seminar",
            Self::Placement => "placement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "tech" => Some(Self::Tech),
            "non-tech" | "nontech" => Some(Self::NonTech),
            "sports" => Some(Self::Sports),
            "cultural" => Some(Self::Cultural),
            "community" => Some(Self::Community),
            "general" => Some(Self::General),
            "workshop" => Some(Self::Workshop),
            "seminar" => Some(Self::Seminar),
            "placement" => Some(Self::Placement),
            _ => None,
        }
    }
}

/// A campus event.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use connect_model::{ConnectError, Event};
/// use uuid::Uuid;
///
/// let mut event = Event::new(
///     "Rust Workshop",
///     "Hands-on intro to ownership and borrowing",
///     Utc::now() + Duration::days(7),
///     "Seminar Hall",
///     Uuid::now_v7(),
/// )
/// .with_capacity(1);
///
/// event.approve();
/// assert!(event.register(Uuid::now_v7(), Utc::now()).is_ok());
/// assert!(matches!(
///     event.register(Uuid::now_v7(), Utc::now()),
///     Err(ConnectError::InvalidState(_))
/// ));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,

    /// Start (date and time combined)
    pub date: DateTime<Utc>,

    pub location: String,
    pub banner: Option<String>,
    pub category: EventCategory,
    pub created_by: Uuid,

    /// Set semantics
    #[serde(default)]
    pub registered_users: Vec<Uuid>,

    /// `None` means unlimited
    pub capacity: Option<u32>,

    pub registration_deadline: Option<DateTime<Utc>>,

    pub approved: bool,

    /// Soft delete
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a pending event with the default capacity.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: DateTime<Utc>,
        location: impl Into<String>,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into().trim().to_string(),
            description: description.into(),
            date,
            location: location.into().trim().to_string(),
            banner: None,
            category: EventCategory::default(),
            created_by,
            registered_users: Vec::new(),
            capacity: Some(DEFAULT_EVENT_CAPACITY),
            registration_deadline: None,
            approved: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn without_capacity(mut self) -> Self {
        self.capacity = None;
        self
    }

    pub fn with_registration_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.registration_deadline = Some(deadline);
        self
    }

    pub fn approve(&mut self) {
        self.approved = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_deleted
    }

    pub fn is_registered(&self, user: Uuid) -> bool {
        self.registered_users.contains(&user)
    }

    pub fn registrations_count(&self) -> usize {
        self.registered_users.len()
    }

    /// Approved and not cancelled.
    pub fn is_published(&self) -> bool {
        self.approved && !self.is_deleted
    }

    /// Register `user`.
    ///
    /// Checks run in a fixed order and the first failure wins: approved,
    /// not cancelled, deadline, capacity, duplicate.
    pub fn register(&mut self, user: Uuid, now: DateTime<Utc>) -> ConnectResult<()> {
        if !self.approved {
            return Err(ConnectError::InvalidState("Event not approved yet".to_string()));
        }
        if self.is_deleted {
            return Err(ConnectError::InvalidState("Event has been removed".to_string()));
        }
        if self.registration_deadline.is_some_and(|deadline| now > deadline) {
            return Err(ConnectError::InvalidState(
                "Registration deadline has passed".to_string(),
            ));
        }
        if self
            .capacity
            .is_some_and(|cap| self.registered_users.len() >= cap as usize)
        {
            return Err(ConnectError::InvalidState("Event capacity is full".to_string()));
        }
        if self.is_registered(user) {
            return Err(ConnectError::Conflict(
                "You are already registered for this event".to_string(),
            ));
        }

        self.registered_users.push(user);
        Ok(())
    }

    /// Soft-delete. Allowed for the creator, admin and superadmin.
    pub fn cancel(&mut self, by: Uuid, role: Role) -> ConnectResult<()> {
        if self.created_by != by && !role.is_admin() {
            return Err(ConnectError::Forbidden(
                "You are not allowed to cancel this event".to_string(),
            ));
        }
        self.is_deleted = true;
        Ok(())
    }

    /// Edit guard: creator only, never on a cancelled event.
    pub fn ensure_editable_by(&self, by: Uuid) -> ConnectResult<()> {
        if self.created_by != by {
            return Err(ConnectError::Forbidden(
                "Only the event creator can edit this event".to_string(),
            ));
        }
        if self.is_deleted {
            return Err(ConnectError::InvalidState(
                "Cancelled events cannot be edited".to_string(),
            ));
        }
        Ok(())
    }
}

impl Document for Event {
    const COLLECTION: &'static str = "events";
    const LABEL: &'static str = "Event";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        let mut v = Validator::new();
        v.required("title", &self.title)
            .min_length("description", &self.description, MIN_DESCRIPTION_LEN)
            .required("location", &self.location);
        let mut seen = std::collections::HashSet::new();
        v.check(
            self.registered_users.iter().all(|u| seen.insert(*u)),
            "\"registered_users\" must not contain duplicates",
        );
        v.finish()
    }
}

/// An event plus its derived registration count.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub registrations_count: usize,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        let registrations_count = event.registrations_count();
        Self {
            event,
            registrations_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event() -> Event {
        Event::new(
            "Alumni Meetup",
            "Annual meetup for graduates of all batches",
            Utc::now() + Duration::days(10),
            "Main Auditorium",
            Uuid::now_v7(),
        )
    }

    #[test]
    fn test_defaults() {
        let event = event();
        assert_eq!(event.capacity, Some(DEFAULT_EVENT_CAPACITY));
        assert!(!event.approved);
        assert!(!event.is_deleted);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_register_first_failing_check_wins() {
        let now = Utc::now();
        let user = Uuid::now_v7();

        // unapproved and deleted: approval is reported
        let mut e = event();
        e.is_deleted = true;
        assert_eq!(
            e.register(user, now).unwrap_err().to_string(),
            "Event not approved yet"
        );

        // approved and deleted
        e.approve();
        assert_eq!(e.register(user, now).unwrap_err().to_string(), "Event has been removed");

        // deadline passed and full
        let mut e = event().with_capacity(0).with_registration_deadline(now - Duration::hours(1));
        e.approve();
        assert_eq!(
            e.register(user, now).unwrap_err().to_string(),
            "Registration deadline has passed"
        );

        // full and already registered
        let mut e = event().with_capacity(1);
        e.approve();
        e.register(user, now).unwrap();
        let err = e.register(user, now).unwrap_err();
        assert_eq!(err, ConnectError::InvalidState("Event capacity is full".into()));
    }

    #[test]
    fn test_register_twice_conflicts() {
        let mut e = event();
        e.approve();
        let user = Uuid::now_v7();
        e.register(user, Utc::now()).unwrap();
        let err = e.register(user, Utc::now()).unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(e.registrations_count(), 1);
    }

    #[test]
    fn test_unlimited_capacity() {
        let mut e = event().without_capacity();
        e.approve();
        for _ in 0..500 {
            e.register(Uuid::now_v7(), Utc::now()).unwrap();
        }
        assert_eq!(e.registrations_count(), 500);
    }

    #[test]
    fn test_cancel_permissions() {
        let mut e = event();
        let stranger = Uuid::now_v7();
        assert!(matches!(
            e.cancel(stranger, Role::Faculty),
            Err(ConnectError::Forbidden(_))
        ));
        assert!(e.cancel(stranger, Role::SuperAdmin).is_ok());
        assert!(e.is_cancelled());

        let mut e = event();
        let creator = e.created_by;
        assert!(e.cancel(creator, Role::Alumni).is_ok());
    }

    #[test]
    fn test_short_description_rejected() {
        let mut e = event();
        e.description = "too short".into();
        assert!(matches!(e.validate(), Err(ConnectError::ValidationFailed(_))));
    }

    #[test]
    fn test_category_serde() {
        assert_eq!(serde_json::to_string(&EventCategory::NonTech).unwrap(), "\"non-tech\"");
        assert_eq!(EventCategory::parse("Non_Tech"), Some(EventCategory::NonTech));
    }

    #[test]
    fn test_view_carries_count() {
        let mut e = event();
        e.approve();
        e.register(Uuid::now_v7(), Utc::now()).unwrap();
        let json = serde_json::to_value(EventView::from(e)).unwrap();
        assert_eq!(json["registrations_count"], 1);
        assert_eq!(json["title"], "Alumni Meetup");
    }
}
