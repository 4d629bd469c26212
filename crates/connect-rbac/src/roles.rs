//! Campus roles
//!
//! Every user carries exactly one role. Roles are not hierarchical except
//! for the superadmin bypass, which is handled by the gate.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A user's role on the platform.
///
/// # Permission Model
///
/// - **Student**: Browses approved content, applies to jobs, registers for events
/// - **Alumni**: Posts jobs and events, donates, mentors
/// - **Faculty**: Posts jobs and events, mentors
/// - **Admin**: Approves jobs and events, manages users, reads analytics
/// - **SuperAdmin**: Passes every role gate
///
/// # Examples
///
/// ```
/// use connect_rbac::Role;
///
/// assert_eq!(Role::parse("  ALUMNI "), Some(Role::Alumni));
/// assert!(Role::Admin.is_admin());
/// assert!(Role::SuperAdmin.is_admin());
/// assert!(!Role::Faculty.is_admin());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Current student
    Student,

    /// Graduated student
    Alumni,

    /// Teaching staff
    Faculty,

    /// Platform administrator
    Admin,

    /// Bypasses every role gate
    SuperAdmin,
}

impl Role {
    /// Parse a role name, ignoring case and surrounding whitespace.
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use connect_rbac::Role;
    ///
    /// assert_eq!(Role::parse("faculty"), Some(Role::Faculty));
    /// assert_eq!(Role::parse("SuperAdmin"), Some(Role::SuperAdmin));
    /// assert_eq!(Role::parse("guest"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" => Some(Self::Student),
            "alumni" => Some(Self::Alumni),
            "faculty" => Some(Self::Faculty),
            "admin" => Some(Self::Admin),
            "superadmin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Alumni => "alumni",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Alumni => "Alumni",
            Self::Faculty => "Faculty",
            Self::Admin => "Admin",
            Self::SuperAdmin => "Super Admin",
        }
    }

    /// All roles, in declaration order.
    pub fn all() -> [Role; 5] {
        [
            Self::Student,
            Self::Alumni,
            Self::Faculty,
            Self::Admin,
            Self::SuperAdmin,
        ]
    }

    /// Admin or superadmin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Alumni or faculty, the roles that can mentor and post content for review.
    pub fn is_mentor(&self) -> bool {
        matches!(self, Self::Alumni | Self::Faculty)
    }

    /// Roles a user may pick for themselves at registration.
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, Self::Student | Self::Alumni | Self::Faculty)
    }

    /// Roles an admin may assign through the role-change endpoint.
    ///
    /// Superadmin is never granted through the API.
    pub fn is_assignable(&self) -> bool {
        !matches!(self, Self::SuperAdmin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Student
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownRole(s.trim().to_string()))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "role must be one of [student, alumni, faculty, admin, superadmin], got \"{}\"",
                raw.trim()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_normalizes() {
        assert_eq!(Role::parse("Student"), Some(Role::Student));
        assert_eq!(Role::parse("\tadmin\n"), Some(Role::Admin));
        assert_eq!(Role::parse("SUPERADMIN"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn test_role_from_str_error() {
        let err = "moderator".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown role: moderator");
    }

    #[test]
    fn test_role_serde_round_trip_normalizes() {
        let role: Role = serde_json::from_str("\" Faculty \"").unwrap();
        assert_eq!(role, Role::Faculty);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"faculty\"");

        let bad: Result<Role, _> = serde_json::from_str("\"janitor\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Alumni.is_admin());
        assert!(Role::Alumni.is_mentor());
        assert!(Role::Faculty.is_mentor());
        assert!(!Role::Student.is_mentor());
        assert!(Role::Student.is_self_assignable());
        assert!(!Role::Admin.is_self_assignable());
        assert!(Role::Admin.is_assignable());
        assert!(!Role::SuperAdmin.is_assignable());
    }

    #[test]
    fn test_default_role() {
        assert_eq!(Role::default(), Role::Student);
    }
}
