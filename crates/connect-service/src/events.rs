//! Events
//!
//! Created pending, approved by an admin, cancelled (soft-deleted) by the
//! creator or an admin. Listings never include an unapproved event, not
//! even for its creator; the creator reaches it by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use connect_auth::Caller;
use connect_model::{
    ConnectError, ConnectResult, Event, EventCategory, EventQuery, EventView, EventVisibility,
    UserSummary, Validator,
};
use connect_rbac::{Action, ResourceType};
use connect_store::Store;

use crate::access::authorize;
use crate::views::{author_index, PendingItem};

/// New event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateEventParams {
    pub title: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub location: String,
    pub banner: Option<String>,
    pub category: Option<String>,
    pub capacity: Option<u32>,
    #[serde(alias = "registrationDeadline")]
    pub registration_deadline: Option<DateTime<Utc>>,
}

/// Partial edit of an event. At least one field must be present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEventParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub banner: Option<String>,
    pub category: Option<String>,
    pub capacity: Option<u32>,
    #[serde(alias = "registrationDeadline")]
    pub registration_deadline: Option<DateTime<Utc>>,
}

impl UpdateEventParams {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.banner.is_none()
            && self.category.is_none()
            && self.capacity.is_none()
            && self.registration_deadline.is_none()
    }
}

/// Query string of the authenticated listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventListParams {
    pub category: Option<String>,
    pub upcoming: Option<bool>,
}

/// An event in a listing, with its creator.
#[derive(Debug, Clone, Serialize)]
pub struct EventListing {
    #[serde(flatten)]
    pub view: EventView,
    pub creator: Option<UserSummary>,
}

/// Full event page: creator and attendees resolved.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub view: EventView,
    pub creator: Option<UserSummary>,
    pub attendees: Vec<UserSummary>,
}

/// The fields shown on the public landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicEvent {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub banner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for PublicEvent {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            date: event.date,
            location: event.location,
            category: event.category,
            banner: event.banner,
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventService {
    store: Store,
}

impl EventService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create an event pending approval.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn create(&self, caller: &Caller, params: CreateEventParams) -> ConnectResult<Event> {
        authorize(caller, ResourceType::Event, Action::Create)?;

        let mut v = Validator::new();
        v.length("title", params.title.trim(), 3, 150)
            .required("location", &params.location);
        v.check(params.date.is_some(), "\"date\" is required");
        let category = parse_category(&mut v, params.category.as_deref());
        if let Some(banner) = params.banner.as_deref().filter(|b| !b.trim().is_empty()) {
            v.uri("banner", banner);
        }
        v.finish()?;

        let date = params
            .date
            .ok_or_else(|| ConnectError::ValidationFailed("\"date\" is required".to_string()))?;
        let mut event = Event::new(params.title, params.description, date, params.location, caller.id);
        if let Some(category) = category {
            event = event.with_category(category);
        }
        if let Some(banner) = params.banner.filter(|b| !b.trim().is_empty()) {
            event = event.with_banner(banner);
        }
        if let Some(capacity) = params.capacity {
            event = event.with_capacity(capacity);
        }
        if let Some(deadline) = params.registration_deadline {
            event = event.with_registration_deadline(deadline);
        }

        let event = self.store.events.insert(event).await?;
        info!(event_id = %event.id, "Event created, pending approval");
        Ok(event)
    }

    /// Approved, live events sorted by date, for any signed-in role.
    pub async fn list(&self, params: EventListParams) -> ConnectResult<Vec<EventListing>> {
        let mut query = EventQuery::published();
        if let Some(raw) = params.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            let category = EventCategory::parse(raw).ok_or_else(|| {
                ConnectError::ValidationFailed(format!("Unknown event category '{raw}'"))
            })?;
            query = query.with_category(category);
        }
        if params.upcoming.unwrap_or(false) {
            query = query.upcoming_from(Utc::now());
        }

        let events = self.sorted_by_date(&query).await;
        let creators = author_index(&self.store, events.iter().map(|e| e.created_by)).await;
        Ok(events
            .into_iter()
            .map(|event| {
                let creator = creators.get(&event.created_by).cloned();
                EventListing {
                    view: EventView::from(event),
                    creator,
                }
            })
            .collect())
    }

    /// Upcoming approved events for the landing page. No caller required.
    pub async fn public_list(&self) -> Vec<PublicEvent> {
        let query = EventQuery::published().upcoming_from(Utc::now());
        self.sorted_by_date(&query)
            .await
            .into_iter()
            .map(PublicEvent::from)
            .collect()
    }

    /// One event. A cancelled event is `Gone`.
    pub async fn get(&self, id: Uuid) -> ConnectResult<EventDetails> {
        let event = self.store.events.get(id).await?;
        if event.is_cancelled() {
            return Err(ConnectError::Gone(
                "This event is no longer available".to_string(),
            ));
        }

        let people = author_index(
            &self.store,
            event
                .registered_users
                .iter()
                .copied()
                .chain(std::iter::once(event.created_by)),
        )
        .await;
        let creator = people.get(&event.created_by).cloned();
        let attendees = event
            .registered_users
            .iter()
            .filter_map(|u| people.get(u).cloned())
            .collect();

        Ok(EventDetails {
            view: EventView::from(event),
            creator,
            attendees,
        })
    }

    /// Edit an event. Creator only, never after cancellation.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        params: UpdateEventParams,
    ) -> ConnectResult<Event> {
        authorize(caller, ResourceType::Event, Action::Update)?;
        if params.is_empty() {
            return Err(ConnectError::ValidationFailed(
                "\"value\" must have at least 1 key".to_string(),
            ));
        }

        let mut v = Validator::new();
        if let Some(title) = &params.title {
            v.length("title", title.trim(), 3, 150);
        }
        let category = parse_category(&mut v, params.category.as_deref());
        v.finish()?;

        let editor = caller.id;
        let event = self
            .store
            .events
            .update(id, move |event| {
                event.ensure_editable_by(editor)?;
                if let Some(title) = params.title {
                    event.title = title.trim().to_string();
                }
                if let Some(description) = params.description {
                    event.description = description;
                }
                if let Some(date) = params.date {
                    event.date = date;
                }
                if let Some(location) = params.location {
                    event.location = location.trim().to_string();
                }
                if let Some(banner) = params.banner {
                    event.banner = Some(banner).filter(|b| !b.trim().is_empty());
                }
                if let Some(category) = category {
                    event.category = category;
                }
                if let Some(capacity) = params.capacity {
                    if (capacity as usize) < event.registrations_count() {
                        return Err(ConnectError::InvalidState(
                            "Capacity cannot be below the current registrations".to_string(),
                        ));
                    }
                    event.capacity = Some(capacity);
                }
                if let Some(deadline) = params.registration_deadline {
                    event.registration_deadline = Some(deadline);
                }
                Ok(())
            })
            .await?;

        info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    /// Register the caller.
    ///
    /// All registration guards run inside one atomic update, so concurrent
    /// registrations can never push the event past its capacity.
    #[instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn register(&self, caller: &Caller, id: Uuid) -> ConnectResult<EventView> {
        authorize(caller, ResourceType::Event, Action::Register)?;
        let attendee = caller.id;
        let event = self
            .store
            .events
            .update(id, move |event| event.register(attendee, Utc::now()))
            .await?;
        info!(
            event_id = %event.id,
            registrations = event.registrations_count(),
            "Registered for event"
        );
        Ok(EventView::from(event))
    }

    /// Approve a pending event.
    #[instrument(skip(self, caller), fields(admin = %caller.id))]
    pub async fn approve(&self, caller: &Caller, id: Uuid) -> ConnectResult<Event> {
        authorize(caller, ResourceType::Event, Action::Approve)?;
        let event = self
            .store
            .events
            .update(id, |event| {
                event.approve();
                Ok(())
            })
            .await?;
        info!(event_id = %event.id, "Event approved");
        Ok(event)
    }

    /// Soft-delete. Terminal.
    #[instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn cancel(&self, caller: &Caller, id: Uuid) -> ConnectResult<Event> {
        authorize(caller, ResourceType::Event, Action::Cancel)?;
        let (by, role) = (caller.id, caller.role);
        let event = self
            .store
            .events
            .update(id, move |event| event.cancel(by, role))
            .await?;
        info!(event_id = %event.id, "Event cancelled");
        Ok(event)
    }

    /// The admin review queue.
    pub async fn pending(&self, caller: &Caller) -> ConnectResult<Vec<PendingItem<EventView>>> {
        authorize(caller, ResourceType::Event, Action::Approve)?;
        let query = EventQuery::new(EventVisibility::PendingReview);
        let events = self.store.events.find(|e| query.matches(e)).await;
        let creators = author_index(&self.store, events.iter().map(|e| e.created_by)).await;
        Ok(events
            .into_iter()
            .map(|event| {
                let author = creators.get(&event.created_by).cloned();
                PendingItem {
                    item: EventView::from(event),
                    author,
                }
            })
            .collect())
    }

    async fn sorted_by_date(&self, query: &EventQuery) -> Vec<Event> {
        let mut events = self.store.events.find(|e| query.matches(e)).await;
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        events
    }
}

fn parse_category(v: &mut Validator, raw: Option<&str>) -> Option<EventCategory> {
    let raw = raw.map(str::trim).filter(|c| !c.is_empty())?;
    let category = EventCategory::parse(raw);
    v.check(
        category.is_some(),
        "\"category\" must be one of [tech, non-tech, sports, cultural, community, general, workshop, seminar, placement]",
    );
    category
}
