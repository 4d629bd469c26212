//! # Route policy
//!
//! The static table mapping each `(resource, action)` operation to its
//! role gate. Anything not listed is open to every authenticated role.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actions::Action;
use crate::gate::RoleGate;
use crate::resources::ResourceType;
use crate::roles::Role;

/// An operation is a resource type combined with an action.
///
/// # Example
///
/// ```
/// use connect_rbac::{Action, Operation, ResourceType};
///
/// let op = Operation::new(ResourceType::Job, Action::Apply);
/// assert_eq!(op.to_string(), "job:apply");
/// assert_eq!(Operation::from_string("jobs:apply"), Some(op));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Operation {
    /// The resource type.
    pub resource: ResourceType,
    /// The action on the resource.
    pub action: Action,
}

impl Operation {
    /// Create a new operation.
    pub fn new(resource: ResourceType, action: Action) -> Self {
        Self { resource, action }
    }

    /// Parse from `resource:action`.
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        Some(Self {
            resource: ResourceType::parse(resource)?,
            action: Action::parse(action)?,
        })
    }

    /// The gate guarding this operation.
    pub fn gate(&self) -> RoleGate {
        Policy::gate(self.resource, self.action)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource.as_str(), self.action.as_str())
    }
}

/// The route policy table.
pub struct Policy;

impl Policy {
    /// Look up the gate for an operation.
    ///
    /// # Example
    ///
    /// ```
    /// use connect_rbac::{Action, Policy, ResourceType, Role};
    ///
    /// let gate = Policy::gate(ResourceType::Event, Action::Register);
    /// assert!(gate.allows(Role::Student));
    /// assert!(!gate.allows(Role::Admin));
    /// ```
    pub fn gate(resource: ResourceType, action: Action) -> RoleGate {
        use Action::*;
        use ResourceType::*;

        match (resource, action) {
            (Job, Create) => RoleGate::new(&[Role::Alumni, Role::Faculty, Role::Admin]),
            (Job, Apply) => RoleGate::new(&[Role::Student, Role::Alumni]),
            (Job, Approve) => RoleGate::admin_only(),

            (Event, Create) | (Event, Cancel) => {
                RoleGate::new(&[Role::Alumni, Role::Faculty, Role::Admin])
            }
            (Event, Update) => RoleGate::new(&[Role::Alumni, Role::Faculty]),
            (Event, Register) => RoleGate::new(&[Role::Student, Role::Alumni, Role::Faculty]),
            (Event, Approve) => RoleGate::admin_only(),

            // list-own is the alumni donor's view; list-all is Manage
            (Donation, Create) | (Donation, List) => RoleGate::new(&[Role::Alumni]),
            (Donation, Manage) | (Donation, Verify) | (Donation, Update) => {
                RoleGate::admin_only()
            }

            (User, Manage) => RoleGate::admin_only(),
            (Analytics, _) => RoleGate::admin_only(),

            _ => RoleGate::any_role(),
        }
    }

    /// Whether `role` may perform the operation.
    pub fn permits(role: Role, resource: ResourceType, action: Action) -> bool {
        Self::gate(resource, action).allows(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_policy() {
        assert!(Policy::permits(Role::Alumni, ResourceType::Job, Action::Create));
        assert!(Policy::permits(Role::Admin, ResourceType::Job, Action::Create));
        assert!(!Policy::permits(Role::Student, ResourceType::Job, Action::Create));
        assert!(Policy::permits(Role::Student, ResourceType::Job, Action::Apply));
        assert!(!Policy::permits(Role::Faculty, ResourceType::Job, Action::Apply));
        assert!(!Policy::permits(Role::Faculty, ResourceType::Job, Action::Approve));
    }

    #[test]
    fn test_event_policy() {
        assert!(Policy::permits(Role::Faculty, ResourceType::Event, Action::Update));
        assert!(!Policy::permits(Role::Admin, ResourceType::Event, Action::Update));
        assert!(Policy::permits(Role::Admin, ResourceType::Event, Action::Cancel));
        assert!(!Policy::permits(Role::Admin, ResourceType::Event, Action::Register));
    }

    #[test]
    fn test_admin_only_operations() {
        for (resource, action) in [
            (ResourceType::Analytics, Action::Read),
            (ResourceType::User, Action::Manage),
            (ResourceType::Donation, Action::Verify),
            (ResourceType::Donation, Action::Manage),
        ] {
            assert!(Policy::permits(Role::Admin, resource, action));
            assert!(!Policy::permits(Role::Faculty, resource, action));
        }
    }

    #[test]
    fn test_superadmin_passes_every_operation() {
        for resource in ResourceType::all() {
            for action in Action::all() {
                assert!(Policy::permits(Role::SuperAdmin, *resource, *action));
            }
        }
    }

    #[test]
    fn test_default_open_to_all_roles() {
        for role in Role::all() {
            assert!(Policy::permits(role, ResourceType::Community, Action::Join));
            assert!(Policy::permits(role, ResourceType::FeedPost, Action::Post));
        }
    }

    #[test]
    fn test_operation_parse() {
        let op = Operation::from_string("donation:verify").unwrap();
        assert_eq!(op, Operation::new(ResourceType::Donation, Action::Verify));
        assert!(Operation::from_string("donation").is_none());
        assert!(op.gate().allows(Role::Admin));
    }
}
