//! # Connect Model
//!
//! Domain entities for BCET Connect, together with the rules that govern
//! them: lifecycle guards, visibility predicates and persisted invariants.
//!
//! ## Overview
//!
//! The connect-model crate handles:
//! - **Users**: Profiles, public views and the self-service update whitelist
//! - **Jobs**: Postings behind an approval gate, with applicants
//! - **Events**: Approval, soft-delete and guarded registration
//! - **Communities**: Members, seeded channels and channel posts
//! - **Donations**: The success/transaction-id invariant
//! - **Feed, Learning, Mentorship**: Posts, resources and chat
//! - **Visibility**: Query predicates deciding what a caller may list
//! - **Errors**: The [`ConnectError`] taxonomy shared by every layer
//!
//! ## Architecture
//!
//! ```text
//! Document (trait) ── validate() / unique_keys()
//!   ├─ User
//!   ├─ Job ─── apply()            pending → approved
//!   ├─ Event ─ register()         pending → approved, active → cancelled
//!   ├─ Community ─ join() / leave() / post()
//!   ├─ Donation ── set_status()   success ⇒ transaction_id
//!   ├─ FeedPost, LearningResource
//!   └─ MentorshipRequest, Message
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use connect_model::{ConnectError, Job};
//! use uuid::Uuid;
//!
//! let alumni = Uuid::now_v7();
//! let student = Uuid::now_v7();
//! let mut job = Job::new("Backend Intern", "Acme", "Patiala", "Build APIs in Rust", alumni);
//!
//! // unapproved jobs refuse applications
//! assert!(matches!(job.apply(student, None), Err(ConnectError::InvalidState(_))));
//!
//! job.approve();
//! assert!(job.apply(student, None).is_ok());
//! assert!(matches!(job.apply(student, None), Err(ConnectError::Conflict(_))));
//! ```

pub mod community;
pub mod document;
pub mod donation;
pub mod error;
pub mod event;
pub mod feed;
pub mod job;
pub mod learning;
pub mod mentorship;
pub mod pagination;
pub mod user;
pub mod validation;
pub mod visibility;

// Re-export main types for convenience
pub use community::{Channel, ChannelKind, Community, CommunityPost, DEFAULT_CHANNELS};
pub use document::Document;
pub use donation::{
    Currency, Donation, DonationPurpose, DonationStatus, DonationView, PaymentProvider,
};
pub use error::{ConnectError, ConnectResult};
pub use event::{Event, EventCategory, EventView, DEFAULT_EVENT_CAPACITY};
pub use feed::{Comment, FeedPost, Media, MediaKind, PostType};
pub use job::{Applicant, ApplicantStatus, EmploymentType, ExperienceLevel, Job, SalaryRange, WorkMode};
pub use learning::{LearningResource, ResourceLevel, Vote};
pub use mentorship::{MentorshipRequest, MentorshipStatus, Message};
pub use pagination::{PageMeta, PageRequest, Paged};
pub use user::{
    normalize_email, MentorCard, PortfolioItem, ProfileUpdate, PublicProfile, SocialLinks, User,
    UserSummary,
};
pub use validation::Validator;
pub use visibility::{EventQuery, EventVisibility, JobQuery, JobVisibility};
