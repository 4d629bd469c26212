//! # Connect Service
//!
//! The operations behind every BCET Connect endpoint. Each operation runs
//! the same pipeline: role gate, then visibility filter or lifecycle guard,
//! then one bounded store operation.
//!
//! ## Overview
//!
//! The connect-service crate handles:
//! - **Auth & users**: Registration, login, profiles and admin role changes
//! - **Jobs & events**: Creation behind the approval gate, applications and
//!   capacity-guarded registration
//! - **Communities & feed**: Membership, channel posts, likes and comments
//! - **Donations**: Alumni giving, admin verification, leaderboard and stats
//! - **Mentorship & learning**: Mentor directory, chat, resources and AI helpers
//! - **Analytics**: Admin dashboards over [`aggregate`] primitives
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use connect_ai::AiClient;
//! use connect_auth::{JwtConfig, JwtService, PasswordHasher};
//! use connect_service::{auth::RegisterParams, Services};
//! use connect_store::Store;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let jwt = Arc::new(JwtService::new(JwtConfig::new("dev-secret"))?);
//! let services = Services::new(Store::new(), jwt, AiClient::offline()?, PasswordHasher::new(4));
//!
//! let session = services
//!     .auth
//!     .register(RegisterParams {
//!         name: "Asha Verma".into(),
//!         email: "asha@bcet.edu".into(),
//!         password: "secret123".into(),
//!         role: Some("alumni".into()),
//!         batch: Some("2019".into()),
//!         department: None,
//!     })
//!     .await?;
//! assert!(!session.token.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod aggregate;
pub mod analytics;
pub mod auth;
pub mod communities;
pub mod donations;
pub mod events;
pub mod feed;
pub mod jobs;
pub mod learning;
pub mod mentorship;
pub mod users;
pub mod views;

use std::sync::Arc;

use connect_ai::AiClient;
use connect_auth::{JwtService, PasswordHasher};
use connect_store::Store;

pub use access::authorize;
pub use analytics::AnalyticsService;
pub use auth::{AuthService, AuthSession};
pub use communities::CommunityService;
pub use donations::DonationService;
pub use events::EventService;
pub use feed::FeedService;
pub use jobs::JobService;
pub use learning::LearningService;
pub use mentorship::MentorshipService;
pub use users::UserService;
pub use views::PendingItem;

/// Every service over one shared store.
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub jobs: JobService,
    pub events: EventService,
    pub communities: CommunityService,
    pub feed: FeedService,
    pub donations: DonationService,
    pub mentorship: MentorshipService,
    pub learning: LearningService,
    pub analytics: AnalyticsService,
}

impl Services {
    pub fn new(store: Store, jwt: Arc<JwtService>, ai: AiClient, hasher: PasswordHasher) -> Self {
        Self {
            auth: AuthService::new(store.clone(), jwt, hasher),
            users: UserService::new(store.clone()),
            jobs: JobService::new(store.clone()),
            events: EventService::new(store.clone()),
            communities: CommunityService::new(store.clone()),
            feed: FeedService::new(store.clone()),
            donations: DonationService::new(store.clone()),
            mentorship: MentorshipService::new(store.clone()),
            learning: LearningService::new(store.clone(), ai),
            analytics: AnalyticsService::new(store),
        }
    }
}
