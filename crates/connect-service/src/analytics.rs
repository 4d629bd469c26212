//! Admin dashboards
//!
//! Read-only reports over the whole store. Every report is admin-only and
//! built from one snapshot per collection through [`crate::aggregate`].

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use connect_auth::Caller;
use connect_model::ConnectResult;
use connect_rbac::{Action, ResourceType, Role};
use connect_store::Store;

use crate::access::authorize;
use crate::aggregate::{
    count_by, daily_counts, monthly_counts, monthly_totals, sum_by, top_n, DayCount, MonthCount,
    MonthTotal,
};

/// Length of every top-N ranking.
pub const TOP_N: usize = 10;

/// Window of the posts-per-day chart.
pub const FEED_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserCounts {
    pub total: usize,
    pub students: usize,
    pub alumni: usize,
    pub faculty: usize,
    /// Seen within the last 24 hours
    pub active_today: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentCounts {
    pub posts: usize,
    pub communities: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApprovalCounts {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationTotals {
    pub total_amount: f64,
    pub total_count: usize,
}

/// The top stat cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub users: UserCounts,
    pub content: ContentCounts,
    pub jobs: ApprovalCounts,
    pub events: ApprovalCounts,
    pub donations: DonationTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCount {
    pub role: Option<Role>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    pub by_role: Vec<RoleCount>,
    pub monthly_signups: Vec<MonthCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRanking {
    pub id: Uuid,
    pub title: String,
    pub applications_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    #[serde(flatten)]
    pub counts: ApprovalCounts,
    /// `role: null` collects jobs without a recorded poster role
    pub posted_by_role: Vec<RoleCount>,
    pub top_jobs_by_applications: Vec<JobRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRanking {
    pub id: Uuid,
    pub title: String,
    pub registrations_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReport {
    #[serde(flatten)]
    pub counts: ApprovalCounts,
    pub monthly_events: Vec<MonthCount>,
    pub top_events: Vec<EventRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityRanking {
    pub id: Uuid,
    pub name: String,
    pub members_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityReport {
    pub total: usize,
    pub top_communities: Vec<CommunityRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedReport {
    pub total_posts: usize,
    pub posts_per_day: Vec<DayCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningReport {
    pub total_resources: usize,
    pub total_votes: usize,
    pub popular_skills: Vec<SkillCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorTotal {
    /// `null` for donations without a recorded donor name
    pub donor_name: Option<String>,
    pub total_amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationReport {
    pub total_amount: f64,
    pub total_count: usize,
    pub monthly: Vec<MonthTotal>,
    pub top_donors: Vec<DonorTotal>,
}

/// The compact admin panel summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminSummary {
    pub total_users: usize,
    pub total_alumni: usize,
    pub total_students: usize,
    pub jobs_approved: usize,
    pub events_approved: usize,
}

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    store: Store,
}

impl AnalyticsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    #[instrument(skip(self, caller), fields(admin = %caller.id))]
    pub async fn overview(&self, caller: &Caller) -> ConnectResult<Overview> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        let since = Utc::now() - Duration::hours(24);
        let users = self.store.users.all().await;
        let donations = self.store.donations.all().await;
        let count_role = |role: Role| users.iter().filter(|u| u.role == role).count();

        Ok(Overview {
            users: UserCounts {
                total: users.len(),
                students: count_role(Role::Student),
                alumni: count_role(Role::Alumni),
                faculty: count_role(Role::Faculty),
                active_today: users
                    .iter()
                    .filter(|u| u.last_active.map_or(false, |at| at >= since))
                    .count(),
            },
            content: ContentCounts {
                posts: self.store.feed.len().await,
                communities: self.store.communities.len().await,
            },
            jobs: self.job_counts().await,
            events: self.event_counts().await,
            donations: DonationTotals {
                total_amount: donations.iter().map(|d| d.amount).sum(),
                total_count: donations.len(),
            },
        })
    }

    pub async fn users(&self, caller: &Caller) -> ConnectResult<UserReport> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        let users = self.store.users.all().await;
        Ok(UserReport {
            by_role: role_counts(count_by(&users, |u| Some(u.role))),
            monthly_signups: monthly_counts(&users, |u| u.created_at),
        })
    }

    pub async fn jobs(&self, caller: &Caller) -> ConnectResult<JobReport> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        let jobs = self.store.jobs.all().await;
        let rankings = jobs
            .iter()
            .map(|j| JobRanking {
                id: j.id,
                title: j.title.clone(),
                applications_count: j.applicants_count(),
            })
            .collect();

        Ok(JobReport {
            counts: approval_counts(jobs.iter().map(|j| j.is_approved)),
            posted_by_role: role_counts(count_by(&jobs, |j| j.posted_by_role)),
            top_jobs_by_applications: top_n(rankings, TOP_N, |r| r.applications_count as f64),
        })
    }

    pub async fn events(&self, caller: &Caller) -> ConnectResult<EventReport> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        let events = self.store.events.all().await;
        let rankings = events
            .iter()
            .map(|e| EventRanking {
                id: e.id,
                title: e.title.clone(),
                registrations_count: e.registrations_count(),
            })
            .collect();

        Ok(EventReport {
            counts: approval_counts(events.iter().map(|e| e.approved)),
            monthly_events: monthly_counts(&events, |e| e.created_at),
            top_events: top_n(rankings, TOP_N, |r| r.registrations_count as f64),
        })
    }

    pub async fn communities(&self, caller: &Caller) -> ConnectResult<CommunityReport> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        let communities = self.store.communities.all().await;
        let total = communities.len();
        let rankings = communities
            .into_iter()
            .map(|c| CommunityRanking {
                id: c.id,
                members_count: c.members_count(),
                name: c.name,
            })
            .collect();

        Ok(CommunityReport {
            total,
            top_communities: top_n(rankings, TOP_N, |r| r.members_count as f64),
        })
    }

    pub async fn feed(&self, caller: &Caller) -> ConnectResult<FeedReport> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        let posts = self.store.feed.all().await;
        let since = Utc::now() - Duration::days(FEED_WINDOW_DAYS);
        Ok(FeedReport {
            total_posts: posts.len(),
            posts_per_day: daily_counts(&posts, |p| p.created_at, since),
        })
    }

    pub async fn learning(&self, caller: &Caller) -> ConnectResult<LearningReport> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        let resources = self.store.resources.all().await;
        let skills: Vec<String> = resources
            .iter()
            .flat_map(|r| r.skills.iter().map(|s| s.trim().to_lowercase()))
            .filter(|s| !s.is_empty())
            .collect();

        let mut popular_skills: Vec<SkillCount> = count_by(&skills, |s| Some(s.clone()))
            .into_iter()
            .filter_map(|(skill, count)| skill.map(|skill| SkillCount { skill, count }))
            .collect();
        popular_skills.truncate(TOP_N);

        Ok(LearningReport {
            total_resources: resources.len(),
            total_votes: resources
                .iter()
                .map(|r| r.upvotes.len() + r.downvotes.len())
                .sum(),
            popular_skills,
        })
    }

    /// Every donation regardless of status, plus top donor names.
    pub async fn donations(&self, caller: &Caller) -> ConnectResult<DonationReport> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        let donations = self.store.donations.all().await;
        let mut top_donors: Vec<DonorTotal> =
            sum_by(&donations, |d| d.donor_name.clone(), |d| d.amount)
                .into_iter()
                .map(|(donor_name, total_amount, count)| DonorTotal {
                    donor_name,
                    total_amount,
                    count,
                })
                .collect();
        top_donors.truncate(TOP_N);

        Ok(DonationReport {
            total_amount: donations.iter().map(|d| d.amount).sum(),
            total_count: donations.len(),
            monthly: monthly_totals(&donations, |d| d.created_at, |d| d.amount),
            top_donors,
        })
    }

    /// Counters for the admin panel header.
    pub async fn admin_summary(&self, caller: &Caller) -> ConnectResult<AdminSummary> {
        authorize(caller, ResourceType::Analytics, Action::Read)?;
        Ok(AdminSummary {
            total_users: self.store.users.len().await,
            total_alumni: self.store.users.count(|u| u.role == Role::Alumni).await,
            total_students: self.store.users.count(|u| u.role == Role::Student).await,
            jobs_approved: self.store.jobs.count(|j| j.is_approved).await,
            events_approved: self.store.events.count(|e| e.approved).await,
        })
    }

    async fn job_counts(&self) -> ApprovalCounts {
        let jobs = self.store.jobs.all().await;
        approval_counts(jobs.iter().map(|j| j.is_approved))
    }

    async fn event_counts(&self) -> ApprovalCounts {
        let events = self.store.events.all().await;
        approval_counts(events.iter().map(|e| e.approved))
    }
}

fn approval_counts(flags: impl Iterator<Item = bool>) -> ApprovalCounts {
    let (mut total, mut approved) = (0, 0);
    for flag in flags {
        total += 1;
        approved += usize::from(flag);
    }
    ApprovalCounts {
        total,
        approved,
        pending: total - approved,
    }
}

fn role_counts(counted: Vec<(Option<Role>, usize)>) -> Vec<RoleCount> {
    counted
        .into_iter()
        .map(|(role, count)| RoleCount { role, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_counts() {
        let counts = approval_counts([true, false, true].into_iter());
        assert_eq!(
            counts,
            ApprovalCounts {
                total: 3,
                approved: 2,
                pending: 1
            }
        );
        assert_eq!(approval_counts(std::iter::empty()).pending, 0);
    }

    #[test]
    fn test_role_counts_keep_null_bucket() {
        let rows = role_counts(vec![(None, 2), (Some(Role::Alumni), 1)]);
        let json = serde_json::to_value(&rows).unwrap();
        assert!(json[0]["role"].is_null());
        assert_eq!(json[1]["role"], "alumni");
    }
}
