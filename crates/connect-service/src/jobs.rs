//! Job board
//!
//! Jobs are created pending. Students see approved jobs only; alumni and
//! faculty also see their own pending postings; admins see everything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use connect_auth::Caller;
use connect_model::{
    ConnectError, ConnectResult, EmploymentType, ExperienceLevel, Job, JobQuery, JobVisibility,
    PageRequest, Paged, SalaryRange, UserSummary, Validator, WorkMode,
};
use connect_rbac::{Action, ResourceType};
use connect_store::Store;

use crate::access::authorize;
use crate::views::{author_index, PendingItem};

/// Page size when the caller does not ask for one.
pub const DEFAULT_JOB_PAGE_SIZE: usize = 20;

/// New job posting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateJobParams {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    #[serde(alias = "employmentType")]
    pub employment_type: Option<String>,
    pub mode: Option<WorkMode>,
    #[serde(alias = "experienceLevel")]
    pub experience_level: Option<ExperienceLevel>,
    pub category: Option<String>,
    pub skills: Vec<String>,
    #[serde(alias = "salaryRange")]
    pub salary_range: Option<SalaryRange>,
    #[serde(alias = "applyLink")]
    pub apply_link: Option<String>,
    #[serde(alias = "companyLogo")]
    pub company_logo: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

impl CreateJobParams {
    fn validate(&self) -> ConnectResult<EmploymentType> {
        let mut v = Validator::new();
        v.length("title", self.title.trim(), 3, 100)
            .length("company", self.company.trim(), 2, 100)
            .length("location", self.location.trim(), 2, 100)
            .min_length("description", self.description.trim(), 10);

        let employment_type = match self.employment_type.as_deref() {
            None => Some(EmploymentType::default()),
            Some(raw) => EmploymentType::parse(raw),
        };
        v.check(
            employment_type.is_some(),
            "\"employmentType\" must be one of [Full-Time, Internship, Part-Time, Contract, Freelance]",
        );
        if let Some(range) = &self.salary_range {
            v.check(
                range.min >= 0.0 && range.max >= 0.0,
                "\"salaryRange\" must not be negative",
            );
            v.check(
                range.max == 0.0 || range.min <= range.max,
                "\"salaryRange.min\" must not exceed \"salaryRange.max\"",
            );
        }
        if let Some(link) = self.apply_link.as_deref().filter(|l| !l.trim().is_empty()) {
            v.uri("applyLink", link);
        }
        v.finish()?;

        Ok(employment_type.unwrap_or_default())
    }
}

/// Query string of the job listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobListParams {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: Option<String>,
    pub location: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Body of an application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplyParams {
    /// Resume URL
    pub resume: Option<String>,
}

/// A job as returned to a caller.
///
/// The applicant list is only included for the poster and admins; every
/// caller gets the count.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub applicants_count: usize,
    pub poster: Option<UserSummary>,
}

impl JobView {
    fn for_caller(mut job: Job, poster: Option<UserSummary>, caller: &Caller) -> Self {
        let applicants_count = job.applicants_count();
        if job.posted_by != caller.id && !caller.is_admin() {
            job.applicants.clear();
        }
        Self {
            job,
            applicants_count,
            poster,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobService {
    store: Store,
}

impl JobService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Post a job. It stays invisible to students until approved.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn create(&self, caller: &Caller, params: CreateJobParams) -> ConnectResult<Job> {
        authorize(caller, ResourceType::Job, Action::Create)?;
        let employment_type = params.validate()?;

        let mut job = Job::new(
            params.title.trim(),
            params.company.trim(),
            params.location.trim(),
            params.description.trim(),
            caller.id,
        )
        .with_poster_role(caller.role)
        .with_employment_type(employment_type)
        .with_skills(params.skills);

        if let Some(mode) = params.mode {
            job = job.with_mode(mode);
        }
        if let Some(level) = params.experience_level {
            job = job.with_experience_level(level);
        }
        if let Some(category) = params.category {
            job = job.with_category(category);
        }
        if let Some(range) = params.salary_range {
            job = job.with_salary_range(range);
        }
        if let Some(link) = params.apply_link {
            job = job.with_apply_link(link);
        }
        if let Some(logo) = params.company_logo.filter(|l| !l.trim().is_empty()) {
            job = job.with_company_logo(logo);
        }
        if let Some(deadline) = params.deadline {
            job = job.with_deadline(deadline);
        }

        let job = self.store.jobs.insert(job).await?;
        info!(job_id = %job.id, "Job posted, pending approval");
        Ok(job)
    }

    /// Jobs visible to `caller`, newest first.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id, role = caller.role.as_str()))]
    pub async fn list(&self, caller: &Caller, params: JobListParams) -> ConnectResult<Paged<JobView>> {
        let mut query = JobQuery::new(JobVisibility::for_caller(caller.role, caller.id));
        if let Some(search) = params.search {
            query = query.with_search(search);
        }
        if let Some(location) = params.location {
            query = query.with_location(location);
        }
        if let Some(raw) = params.employment_type.as_deref().map(str::trim) {
            if !raw.is_empty() && !raw.eq_ignore_ascii_case("all") {
                let employment_type = EmploymentType::parse(raw).ok_or_else(|| {
                    ConnectError::ValidationFailed(format!("Unknown job type '{raw}'"))
                })?;
                query = query.with_employment_type(employment_type);
            }
        }

        let jobs = self.store.jobs.find(|job| query.matches(job)).await;
        let page = PageRequest {
            page: params.page,
            limit: params.limit,
        }
        .apply(jobs, DEFAULT_JOB_PAGE_SIZE);

        let posters = author_index(&self.store, page.items.iter().map(|j| j.posted_by)).await;
        Ok(Paged {
            items: page
                .items
                .into_iter()
                .map(|job| {
                    let poster = posters.get(&job.posted_by).cloned();
                    JobView::for_caller(job, poster, caller)
                })
                .collect(),
            meta: page.meta,
        })
    }

    /// One job by id.
    ///
    /// A pending job is only returned to its poster and to admins.
    pub async fn get(&self, caller: &Caller, id: Uuid) -> ConnectResult<JobView> {
        let job = self.store.jobs.get(id).await?;
        if !JobVisibility::for_caller(caller.role, caller.id).matches(&job) {
            return Err(ConnectError::not_found("Job"));
        }
        let poster = self
            .store
            .users
            .find_by_id(job.posted_by)
            .await
            .map(|u| u.summary());
        Ok(JobView::for_caller(job, poster, caller))
    }

    /// Apply to an approved job, once.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn apply(&self, caller: &Caller, id: Uuid, params: ApplyParams) -> ConnectResult<Job> {
        authorize(caller, ResourceType::Job, Action::Apply)?;

        let resume = params.resume.filter(|r| !r.trim().is_empty());
        if let Some(resume) = &resume {
            let mut v = Validator::new();
            v.uri("resume", resume);
            v.finish()?;
        }

        let applicant = caller.id;
        let job = self
            .store
            .jobs
            .update(id, move |job| job.apply(applicant, resume).map(|_| ()))
            .await?;
        info!(job_id = %job.id, applicants = job.applicants_count(), "Application recorded");
        Ok(job)
    }

    /// Approve a pending job. Approving twice is harmless.
    #[instrument(skip(self, caller), fields(admin = %caller.id))]
    pub async fn approve(&self, caller: &Caller, id: Uuid) -> ConnectResult<Job> {
        authorize(caller, ResourceType::Job, Action::Approve)?;
        let job = self
            .store
            .jobs
            .update(id, |job| {
                job.approve();
                Ok(())
            })
            .await?;
        info!(job_id = %job.id, "Job approved");
        Ok(job)
    }

    /// The admin review queue.
    pub async fn pending(&self, caller: &Caller) -> ConnectResult<Vec<PendingItem<Job>>> {
        authorize(caller, ResourceType::Job, Action::Approve)?;
        let visibility = JobVisibility::PendingOnly;
        let jobs = self.store.jobs.find(|job| visibility.matches(job)).await;
        let posters = author_index(&self.store, jobs.iter().map(|j| j.posted_by)).await;
        Ok(jobs
            .into_iter()
            .map(|job| {
                let author = posters.get(&job.posted_by).cloned();
                PendingItem { item: job, author }
            })
            .collect())
    }
}
