//! Profiles and admin user management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use connect_auth::Caller;
use connect_model::{ConnectError, ConnectResult, ProfileUpdate, PublicProfile, User};
use connect_rbac::{Action, ResourceType, Role};
use connect_store::Store;

use crate::access::authorize;

/// One row of the admin user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListing {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserListing {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

/// Body of a role change.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleParams {
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct UserService {
    store: Store,
}

impl UserService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The caller's full profile.
    pub async fn profile(&self, caller: &Caller) -> ConnectResult<User> {
        self.store.users.get(caller.id).await
    }

    /// Update the caller's own profile. Role and email are not reachable here.
    #[instrument(skip(self, caller, update), fields(user_id = %caller.id))]
    pub async fn update_profile(&self, caller: &Caller, update: ProfileUpdate) -> ConnectResult<User> {
        let user = self
            .store
            .users
            .update(caller.id, |user| {
                user.apply_profile_update(update);
                Ok(())
            })
            .await?;
        info!("Profile updated");
        Ok(user)
    }

    /// Another user's profile with private fields removed.
    pub async fn public_profile(&self, id: Uuid) -> ConnectResult<PublicProfile> {
        Ok(self.store.users.get(id).await?.public_profile())
    }

    /// Every user, newest first.
    pub async fn list_users(&self, caller: &Caller) -> ConnectResult<Vec<UserListing>> {
        authorize(caller, ResourceType::User, Action::Manage)?;
        let users = self.store.users.all().await;
        Ok(users.into_iter().map(UserListing::from).collect())
    }

    /// Assign a new role. Superadmin cannot be granted.
    #[instrument(skip(self, caller, params), fields(admin = %caller.id))]
    pub async fn change_role(
        &self,
        caller: &Caller,
        target: Uuid,
        params: ChangeRoleParams,
    ) -> ConnectResult<User> {
        authorize(caller, ResourceType::User, Action::Manage)?;

        let role = Role::parse(&params.role)
            .filter(Role::is_assignable)
            .ok_or_else(|| {
                ConnectError::ValidationFailed(
                    "\"role\" must be one of [student, alumni, faculty, admin]".to_string(),
                )
            })?;

        let (user, previous) = self
            .store
            .users
            .update_with(target, |user| {
                if user.role == Role::SuperAdmin && caller.role != Role::SuperAdmin {
                    return Err(ConnectError::Forbidden(
                        "Only a superadmin can change a superadmin's role".to_string(),
                    ));
                }
                let previous = user.role;
                user.role = role;
                Ok(previous)
            })
            .await?;

        info!(
            user_id = %user.id,
            from = previous.as_str(),
            to = role.as_str(),
            "User role changed"
        );
        Ok(user)
    }
}
