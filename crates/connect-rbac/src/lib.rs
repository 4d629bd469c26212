//! # Connect RBAC (Role-Based Access Control)
//!
//! This crate provides the role model and access gates for BCET Connect.
//!
//! ## Overview
//!
//! The connect-rbac crate handles:
//! - **Roles**: The closed set of campus roles (student, alumni, faculty, admin, superadmin)
//! - **Gates**: Pure allow/deny predicates over a permitted role set
//! - **Resources / Actions**: The operations exposed by the API
//! - **Policy**: The static table mapping each operation to its gate
//!
//! ## Architecture
//!
//! ```text
//! Operation = Resource + Action
//! Policy:     Operation -> RoleGate
//! RoleGate:   (permitted roles, caller) -> allow | GateDenial
//!
//! Examples:
//!   "job:create"      - alumni, faculty, admin
//!   "event:register"  - student, alumni, faculty
//!   "analytics:read"  - admin
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use connect_rbac::{Action, Policy, ResourceType, Role, RoleGate};
//!
//! let gate = RoleGate::from_names(&["Alumni", " faculty "]);
//! assert!(gate.allows(Role::Alumni));
//! assert!(!gate.allows(Role::Student));
//!
//! // superadmin passes every gate
//! assert!(gate.allows(Role::SuperAdmin));
//!
//! let gate = Policy::gate(ResourceType::Job, Action::Create);
//! assert!(gate.allows(Role::Faculty));
//! ```
//!
//! ## Normalization
//!
//! Role names are compared case- and whitespace-insensitively, but only at
//! the input boundary: [`Role::parse`] and the `Deserialize` impl normalize,
//! and every comparison after that is on the enum.

pub mod actions;
pub mod gate;
pub mod policy;
pub mod resources;
pub mod roles;

// Re-export main types for convenience
pub use actions::Action;
pub use gate::{GateDenial, RoleBearer, RoleGate};
pub use policy::{Operation, Policy};
pub use resources::ResourceType;
pub use roles::Role;
