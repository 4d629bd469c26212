//! Concurrent writers against a single document.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use connect_model::{ConnectError, Event, Job, MentorshipRequest, MentorshipStatus};
use connect_store::Store;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_capacity_is_never_oversubscribed() {
    let store = Arc::new(Store::new());
    let mut event = Event::new(
        "Alumni Meetup",
        "An evening of conversations with alumni",
        Utc::now() + Duration::days(5),
        "Main Hall",
        Uuid::now_v7(),
    )
    .with_capacity(5);
    event.approve();
    let event = store.events.insert(event).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let user = Uuid::now_v7();
            store
                .events
                .update(event.id, |e| e.register(user, Utc::now()))
                .await
        }));
    }

    let mut ok = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(ConnectError::InvalidState(msg)) => {
                assert_eq!(msg, "Event capacity is full");
                full += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(ok, 5);
    assert_eq!(full, 15);
    assert_eq!(store.events.get(event.id).await.unwrap().registrations_count(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_apply_records_once() {
    let store = Arc::new(Store::new());
    let mut job = Job::new("SDE Intern", "Acme", "Remote", "Ship features", Uuid::now_v7());
    job.approve();
    let job = store.jobs.insert(job).await.unwrap();
    let student = Uuid::now_v7();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .jobs
                .update(job.id, |j| j.apply(student, None).map(|_| ()))
                .await
        }));
    }

    let results: Vec<_> = join_all(handles).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, ConnectError::Conflict(_))));
    assert_eq!(store.jobs.get(job.id).await.unwrap().applicants_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mentorship_requests_leave_one_pending() {
    let store = Arc::new(Store::new());
    let (mentee, mentor) = (Uuid::now_v7(), Uuid::now_v7());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .mentorship
                .insert(MentorshipRequest::new(mentee, mentor))
                .await
        }));
    }

    let results: Vec<_> = join_all(handles).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, ConnectError::Conflict(_))));

    let pending = store
        .mentorship
        .find(|r| r.sender == mentee && r.receiver == mentor && r.is_pending())
        .await;
    assert_eq!(pending.len(), 1);

    // Answering frees the pair for a new request.
    store
        .mentorship
        .update(pending[0].id, |r| r.respond(mentor, MentorshipStatus::Accepted))
        .await
        .unwrap();
    assert!(store
        .mentorship
        .insert(MentorshipRequest::new(mentee, mentor))
        .await
        .is_ok());
}

async fn join_all<T>(handles: Vec<tokio::task::JoinHandle<T>>) -> Vec<T> {
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.unwrap());
    }
    out
}
