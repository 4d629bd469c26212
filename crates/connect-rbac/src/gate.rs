//! # Role gate
//!
//! A pure allow/deny predicate over a permitted role set and a caller.
//!
//! Evaluation order:
//!
//! 1. No caller: [`GateDenial::Unauthenticated`]
//! 2. Caller without a role: [`GateDenial::RoleMissing`]
//! 3. Superadmin: allowed, whatever the permitted set holds
//! 4. Role in the permitted set: allowed
//! 5. Otherwise: [`GateDenial::Forbidden`]
//!
//! The gate never logs. Callers record the decision.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::roles::Role;

/// Anything that can present a role to a gate.
///
/// `None` means the caller is known but carries no role claim.
pub trait RoleBearer {
    /// The caller's current role, if any.
    fn role(&self) -> Option<Role>;
}

impl RoleBearer for Role {
    fn role(&self) -> Option<Role> {
        Some(*self)
    }
}

impl RoleBearer for Option<Role> {
    fn role(&self) -> Option<Role> {
        *self
    }
}

/// Why a gate refused a caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateDenial {
    /// No caller was presented.
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller has no role claim.
    #[error("User role missing from token")]
    RoleMissing,

    /// The caller's role is not in the permitted set.
    #[error("Permission Denied → Need role: [{}] | Your Role: {actual}", required_list(.required))]
    Forbidden {
        /// Roles the gate accepts.
        required: Vec<Role>,
        /// The caller's role.
        actual: Role,
    },
}

fn required_list(required: &[Role]) -> String {
    required
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl GateDenial {
    /// HTTP status code for this denial.
    pub fn status_code(&self) -> u16 {
        match self {
            GateDenial::Unauthenticated => 401,
            GateDenial::RoleMissing | GateDenial::Forbidden { .. } => 403,
        }
    }
}

/// A fixed set of permitted roles.
///
/// # Example
///
/// ```
/// use connect_rbac::{GateDenial, Role, RoleGate};
///
/// let gate = RoleGate::new(&[Role::Admin]);
/// assert!(gate.check(Some(&Role::Admin)).is_ok());
/// assert!(gate.check(Some(&Role::SuperAdmin)).is_ok());
/// assert_eq!(gate.check::<Role>(None), Err(GateDenial::Unauthenticated));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleGate {
    permitted: BTreeSet<Role>,
}

impl RoleGate {
    /// Create a gate from a list of roles. Duplicates collapse.
    pub fn new(roles: &[Role]) -> Self {
        Self {
            permitted: roles.iter().copied().collect(),
        }
    }

    /// Create a gate from role names.
    ///
    /// Names are normalized the same way as [`Role::parse`]; names that do
    /// not parse are dropped, so they can never match a caller.
    pub fn from_names(names: &[&str]) -> Self {
        Self {
            permitted: names.iter().filter_map(|n| Role::parse(n)).collect(),
        }
    }

    /// A gate that accepts every role.
    pub fn any_role() -> Self {
        Self::new(&Role::all())
    }

    /// A gate that accepts only admins (and superadmin via bypass).
    pub fn admin_only() -> Self {
        Self::new(&[Role::Admin])
    }

    /// Roles in the permitted set, in declaration order.
    pub fn permitted(&self) -> Vec<Role> {
        self.permitted.iter().copied().collect()
    }

    /// Whether a caller holding `role` passes this gate.
    pub fn allows(&self, role: Role) -> bool {
        role == Role::SuperAdmin || self.permitted.contains(&role)
    }

    /// Decide access for an optional caller.
    pub fn check<C: RoleBearer + ?Sized>(&self, caller: Option<&C>) -> Result<(), GateDenial> {
        let caller = caller.ok_or(GateDenial::Unauthenticated)?;
        let role = caller.role().ok_or(GateDenial::RoleMissing)?;

        if self.allows(role) {
            Ok(())
        } else {
            Err(GateDenial::Forbidden {
                required: self.permitted(),
                actual: role,
            })
        }
    }
}
