//! Route policy enforcement
//!
//! Every service entry point that needs a role calls [`authorize`] before
//! touching the store. The decision comes from the static policy table;
//! logging never influences it.

use tracing::debug;

use connect_auth::Caller;
use connect_model::ConnectResult;
use connect_rbac::{Action, Policy, ResourceType};

/// Check `caller` against the policy for `(resource, action)`.
///
/// # Example
///
/// ```
/// use connect_auth::Caller;
/// use connect_rbac::{Action, ResourceType, Role};
/// use connect_service::access::authorize;
/// use uuid::Uuid;
///
/// let student = Caller {
///     id: Uuid::now_v7(),
///     role: Role::Student,
///     name: "Riya".into(),
///     email: "riya@bcet.ac.in".into(),
///     avatar: None,
/// };
/// assert!(authorize(&student, ResourceType::Job, Action::Apply).is_ok());
/// assert_eq!(
///     authorize(&student, ResourceType::Job, Action::Create).unwrap_err().status_code(),
///     403
/// );
/// ```
pub fn authorize(caller: &Caller, resource: ResourceType, action: Action) -> ConnectResult<()> {
    match Policy::gate(resource, action).check(Some(caller)) {
        Ok(()) => {
            debug!(
                caller = %caller.id,
                role = caller.role.as_str(),
                resource = resource.as_str(),
                action = action.as_str(),
                "Access granted"
            );
            Ok(())
        }
        Err(denial) => {
            debug!(
                caller = %caller.id,
                role = caller.role.as_str(),
                resource = resource.as_str(),
                action = action.as_str(),
                reason = %denial,
                "Access denied"
            );
            Err(denial.into())
        }
    }
}
