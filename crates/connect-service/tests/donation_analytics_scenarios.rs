//! Donation lifecycle, leaderboard and the admin dashboards.

mod common;

use connect_auth::Caller;
use connect_model::{ConnectError, Currency, DonationStatus};
use connect_rbac::Role;
use connect_service::donations::{
    CreateDonationParams, DonationSearchParams, DonationStatsParams, MyDonationsParams,
    UpdateDonationStatusParams, VerifyDonationParams,
};
use connect_service::feed::CreatePostParams;
use connect_service::jobs::ApplyParams;

use common::{event_params, job_params, world, World};

fn gift(amount: f64, purpose: &str, tx: Option<&str>) -> CreateDonationParams {
    CreateDonationParams {
        amount: Some(amount),
        purpose: Some(purpose.to_string()),
        transaction_id: tx.map(str::to_string),
        ..Default::default()
    }
}

async fn donate_and_verify(w: &World, donor: &Caller, admin: &Caller, amount: f64, tx: &str) {
    w.services
        .donations
        .create(donor, gift(amount, "scholarship", Some(tx)))
        .await
        .unwrap();
    w.services
        .donations
        .verify(
            admin,
            VerifyDonationParams {
                transaction_id: Some(tx.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_only_alumni_donate() {
    let w = world();
    let student = w.user("Ravi Kumar", Role::Student).await;
    let alumni = w.user("Asha Verma", Role::Alumni).await;

    let denied = w.services.donations.create(&student, gift(500.0, "general", None)).await;
    assert!(matches!(denied, Err(ConnectError::Forbidden(_))));

    let view = w.services.donations.create(&alumni, gift(500.0, "general", None)).await.unwrap();
    assert_eq!(view.donation.status, DonationStatus::Pending);
    assert_eq!(view.donation.donor_name.as_deref(), Some("Asha Verma"));
    assert_eq!(view.display_donor_name, "Asha Verma");

    assert_eq!(view.donation.currency, Currency::Inr);

    let bad = w.services.donations.create(&alumni, gift(500.0, "charity", None)).await;
    assert!(matches!(bad, Err(ConnectError::ValidationFailed(_))));
}

#[tokio::test]
async fn test_currency_is_case_insensitive() {
    let w = world();
    let alumni = w.user("Asha Verma", Role::Alumni).await;

    let usd = CreateDonationParams {
        currency: Some(" usd ".to_string()),
        ..gift(250.0, "scholarship", None)
    };
    let view = w.services.donations.create(&alumni, usd).await.unwrap();
    assert_eq!(view.donation.currency, Currency::Usd);

    let yen = CreateDonationParams {
        currency: Some("JPY".to_string()),
        ..gift(250.0, "charity", None)
    };
    let msg = w.services.donations.create(&alumni, yen).await.unwrap_err().to_string();
    assert!(msg.contains("Currency must be one of"));
    assert!(msg.contains("Purpose must be one of"));
}

#[tokio::test]
async fn test_success_requires_transaction_id() {
    let w = world();
    let alumni = w.user("Asha Verma", Role::Alumni).await;
    let admin = w.user("Admin", Role::Admin).await;
    let view = w.services.donations.create(&alumni, gift(1000.0, "general", None)).await.unwrap();

    let success = || UpdateDonationStatusParams {
        status: "success".to_string(),
        ..Default::default()
    };
    let refused = w.services.donations.update_status(&admin, view.donation.id, success()).await;
    assert!(matches!(refused, Err(ConnectError::ValidationFailed(_))));

    let with_tx = UpdateDonationStatusParams {
        transaction_id: Some("TX-1001".to_string()),
        ..success()
    };
    let done = w.services.donations.update_status(&admin, view.donation.id, with_tx).await.unwrap();
    assert!(done.donation.is_successful());
    assert!(done.donation.verified_by_admin);

    // the stored id now satisfies the rule on its own
    let again = w.services.donations.update_status(&admin, view.donation.id, success()).await;
    assert!(again.is_ok());
}

#[tokio::test]
async fn test_verify_by_transaction_id() {
    let w = world();
    let alumni = w.user("Asha Verma", Role::Alumni).await;
    let admin = w.user("Admin", Role::Admin).await;
    w.services
        .donations
        .create(&alumni, gift(250.0, "event", Some("TX-7")))
        .await
        .unwrap();

    let missing = w
        .services
        .donations
        .verify(&admin, VerifyDonationParams::default())
        .await;
    assert_eq!(missing.unwrap_err().to_string(), "transactionId required");

    let unknown = w
        .services
        .donations
        .verify(
            &admin,
            VerifyDonationParams {
                transaction_id: Some("TX-404".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(unknown, Err(ConnectError::NotFound(_))));

    let verified = w
        .services
        .donations
        .verify(
            &admin,
            VerifyDonationParams {
                transaction_id: Some("TX-7".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(verified.donation.is_successful());

    let denied = w
        .services
        .donations
        .verify(&alumni, VerifyDonationParams::default())
        .await;
    assert!(matches!(denied, Err(ConnectError::Forbidden(_))));
}

#[tokio::test]
async fn test_leaderboard_skips_anonymous_and_pending() {
    let w = world();
    let admin = w.user("Admin", Role::Admin).await;
    let big = w.user("Asha Verma", Role::Alumni).await;
    let small = w.user("Vikram Rao", Role::Alumni).await;
    let shy = w.user("Quiet Donor", Role::Alumni).await;

    donate_and_verify(&w, &big, &admin, 5000.0, "TX-A1").await;
    donate_and_verify(&w, &big, &admin, 1000.0, "TX-A2").await;
    donate_and_verify(&w, &small, &admin, 2000.0, "TX-B1").await;
    w.services.donations.create(&small, gift(9000.0, "general", None)).await.unwrap();

    let anonymous = CreateDonationParams {
        is_anonymous: true,
        ..gift(99_000.0, "general", Some("TX-C1"))
    };
    w.services.donations.create(&shy, anonymous).await.unwrap();
    w.services
        .donations
        .verify(
            &admin,
            VerifyDonationParams {
                transaction_id: Some("TX-C1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let board = w.services.donations.leaderboard(None).await;
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].user_id, big.id);
    assert_eq!(board[0].total_amount, 6000.0);
    assert_eq!(board[0].donations_count, 2);
    assert_eq!(board[1].user_id, small.id);
    assert_eq!(board[1].total_amount, 2000.0);

    assert_eq!(w.services.donations.leaderboard(Some(1)).await.len(), 1);
}

#[tokio::test]
async fn test_my_donations_and_admin_search() {
    let w = world();
    let admin = w.user("Admin", Role::Admin).await;
    let asha = w.user("Asha Verma", Role::Alumni).await;
    let vikram = w.user("Vikram Rao", Role::Alumni).await;

    for amount in [100.0, 200.0, 300.0] {
        w.services.donations.create(&asha, gift(amount, "general", None)).await.unwrap();
    }
    donate_and_verify(&w, &vikram, &admin, 700.0, "TX-V1").await;

    let mine = w
        .services
        .donations
        .mine(&asha, MyDonationsParams { limit: Some(2), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(mine.meta.total, 3);
    assert_eq!(mine.meta.total_pages, 2);
    assert_eq!(mine.items.len(), 2);

    let found = w
        .services
        .donations
        .all(
            &admin,
            DonationSearchParams {
                search: Some("VIKRAM".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.meta.total, 1);
    assert_eq!(found.items[0].donor.as_ref().map(|d| d.id), Some(vikram.id));

    let successful = w
        .services
        .donations
        .all(
            &admin,
            DonationSearchParams {
                status: Some("success".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(successful.meta.total, 1);

    let denied = w.services.donations.all(&asha, DonationSearchParams::default()).await;
    assert!(matches!(denied, Err(ConnectError::Forbidden(_))));
}

#[tokio::test]
async fn test_stats_count_successful_only() {
    let w = world();
    let admin = w.user("Admin", Role::Admin).await;
    let asha = w.user("Asha Verma", Role::Alumni).await;
    donate_and_verify(&w, &asha, &admin, 400.0, "TX-S1").await;
    donate_and_verify(&w, &asha, &admin, 600.0, "TX-S2").await;
    w.services.donations.create(&asha, gift(10_000.0, "general", None)).await.unwrap();

    let stats = w
        .services
        .donations
        .stats(&admin, DonationStatsParams::default())
        .await
        .unwrap();
    assert_eq!(stats.total_amount, 1000.0);
    assert_eq!(stats.total_donations, 2);
    assert_eq!(stats.unique_donors, 1);
    assert_eq!(stats.avg_amount, 500.0);
    assert_eq!(stats.by_purpose.len(), 1);
    assert_eq!(stats.monthly.iter().map(|m| m.count).sum::<usize>(), 2);
}

#[tokio::test]
async fn test_empty_store_reports_zeros() {
    let w = world();
    let admin = w.user("Admin", Role::Admin).await;

    let overview = w.services.analytics.overview(&admin).await.unwrap();
    assert_eq!(overview.users.total, 1);
    assert_eq!(overview.jobs.total, 0);
    assert_eq!(overview.donations.total_amount, 0.0);

    assert!(w.services.analytics.jobs(&admin).await.unwrap().top_jobs_by_applications.is_empty());
    assert!(w.services.analytics.feed(&admin).await.unwrap().posts_per_day.is_empty());
    assert!(w.services.analytics.donations(&admin).await.unwrap().top_donors.is_empty());
    let learning = w.services.analytics.learning(&admin).await.unwrap();
    assert_eq!(learning.total_resources, 0);
    assert!(learning.popular_skills.is_empty());
}

#[tokio::test]
async fn test_dashboards_reflect_activity() {
    let w = world();
    let admin = w.user("Admin", Role::Admin).await;
    let alumni = w.user("Asha Verma", Role::Alumni).await;
    let faculty = w.user("Dr. Mehta", Role::Faculty).await;
    let student = w.user("Ravi Kumar", Role::Student).await;

    let popular = w.services.jobs.create(&alumni, job_params("Backend Intern")).await.unwrap();
    w.services.jobs.create(&faculty, job_params("Research Assistant")).await.unwrap();
    w.services.jobs.approve(&admin, popular.id).await.unwrap();
    w.services.jobs.apply(&student, popular.id, ApplyParams::default()).await.unwrap();

    let event = w.services.events.create(&faculty, event_params("Tech Talk", None)).await.unwrap();
    w.services.events.approve(&admin, event.id).await.unwrap();
    w.services.events.register(&student, event.id).await.unwrap();

    w.services
        .feed
        .create(
            &student,
            CreatePostParams {
                text: Some("Hello campus".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let overview = w.services.analytics.overview(&admin).await.unwrap();
    assert_eq!(overview.users.total, 4);
    assert_eq!(overview.users.students, 1);
    assert_eq!((overview.jobs.approved, overview.jobs.pending), (1, 1));
    assert_eq!(overview.events.approved, 1);
    assert_eq!(overview.content.posts, 1);

    let jobs = w.services.analytics.jobs(&admin).await.unwrap();
    assert_eq!(jobs.top_jobs_by_applications[0].id, popular.id);
    assert_eq!(jobs.top_jobs_by_applications[0].applications_count, 1);
    assert_eq!(jobs.posted_by_role.len(), 2);

    let events = w.services.analytics.events(&admin).await.unwrap();
    assert_eq!(events.top_events[0].registrations_count, 1);

    let feed = w.services.analytics.feed(&admin).await.unwrap();
    assert_eq!(feed.posts_per_day.len(), 1);
    assert_eq!(feed.posts_per_day[0].count, 1);

    let users = w.services.analytics.users(&admin).await.unwrap();
    assert_eq!(users.by_role.iter().map(|r| r.count).sum::<usize>(), 4);

    let summary = w.services.analytics.admin_summary(&admin).await.unwrap();
    assert_eq!(summary.jobs_approved, 1);
    assert_eq!(summary.events_approved, 1);

    let denied = w.services.analytics.overview(&faculty).await;
    assert!(matches!(denied, Err(ConnectError::Forbidden(_))));
}
