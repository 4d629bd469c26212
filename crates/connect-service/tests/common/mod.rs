//! Shared fixtures for the scenario tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use connect_ai::AiClient;
use connect_auth::{Caller, JwtService, PasswordHasher};
use connect_model::User;
use connect_rbac::Role;
use connect_service::events::CreateEventParams;
use connect_service::jobs::CreateJobParams;
use connect_service::Services;
use connect_store::Store;

pub struct World {
    pub store: Store,
    pub services: Services,
}

pub fn world() -> World {
    let store = Store::new();
    let jwt = Arc::new(JwtService::with_secret("scenario-test-secret").unwrap());
    let services = Services::new(
        store.clone(),
        jwt,
        AiClient::offline().unwrap(),
        PasswordHasher::new(4),
    );
    World { store, services }
}

impl World {
    /// Insert a user with `role` and return it as a request caller.
    pub async fn user(&self, name: &str, role: Role) -> Caller {
        let email = format!("{}@bcet.edu", Uuid::now_v7().simple());
        let user = self
            .store
            .users
            .insert(User::new(name, email, "unused-hash", role))
            .await
            .unwrap();
        Caller::from(&user)
    }
}

pub fn job_params(title: &str) -> CreateJobParams {
    CreateJobParams {
        title: title.to_string(),
        company: "Acme Systems".to_string(),
        location: "Bathinda".to_string(),
        description: "Build and operate backend services".to_string(),
        ..Default::default()
    }
}

pub fn event_params(title: &str, capacity: Option<u32>) -> CreateEventParams {
    CreateEventParams {
        title: title.to_string(),
        description: "An evening of talks and networking with alumni".to_string(),
        date: Some(Utc::now() + Duration::days(7)),
        location: "Main Auditorium".to_string(),
        capacity,
        ..Default::default()
    }
}
