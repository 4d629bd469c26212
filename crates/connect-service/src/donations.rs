//! Donations
//!
//! Alumni create donations (pending unless a gateway confirms them).
//! Admins verify by transaction id or set a status directly; a donation
//! can only be marked successful once it carries a transaction id.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use connect_auth::Caller;
use connect_model::{
    ConnectError, ConnectResult, Currency, Donation, DonationPurpose, DonationStatus,
    DonationView, PageRequest, Paged, PaymentProvider, UserSummary, Validator,
};
use connect_rbac::{Action, ResourceType, Role};
use connect_store::Store;

use crate::access::authorize;
use crate::aggregate::{monthly_totals, sum_by, top_n, MonthTotal};
use crate::views::author_index;

/// Page size for donation listings and the leaderboard.
pub const DEFAULT_DONATION_PAGE_SIZE: usize = 10;

/// New donation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateDonationParams {
    pub amount: Option<f64>,
    pub purpose: Option<String>,
    /// INR, USD, EUR or GBP, any case. Defaults to INR.
    pub currency: Option<String>,
    pub message: Option<String>,
    #[serde(alias = "isAnonymous")]
    pub is_anonymous: bool,
    #[serde(alias = "paymentProvider")]
    pub payment_provider: Option<PaymentProvider>,
    #[serde(alias = "transactionId")]
    pub transaction_id: Option<String>,
    pub meta: Option<serde_json::Value>,
}

/// Gateway-style confirmation keyed by transaction id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyDonationParams {
    #[serde(alias = "transactionId")]
    pub transaction_id: Option<String>,
    /// Defaults to `success`
    pub status: Option<String>,
    pub meta: Option<serde_json::Value>,
}

/// Direct status change by donation id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateDonationStatusParams {
    pub status: String,
    #[serde(alias = "transactionId")]
    pub transaction_id: Option<String>,
    #[serde(alias = "receiptUrl")]
    pub receipt_url: Option<String>,
}

/// Filters of the caller's own donations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MyDonationsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub purpose: Option<String>,
}

/// Filters of the admin donation list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DonationSearchParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub purpose: Option<String>,
    /// Inclusive, from the start of the day
    #[serde(alias = "fromDate")]
    pub from_date: Option<String>,
    /// Inclusive, to the end of the day
    #[serde(alias = "toDate")]
    pub to_date: Option<String>,
    /// Case-insensitive substring of the donor's name or email
    pub search: Option<String>,
}

/// Date window of the stats endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DonationStatsParams {
    #[serde(alias = "fromDate")]
    pub from_date: Option<String>,
    #[serde(alias = "toDate")]
    pub to_date: Option<String>,
}

/// An admin-listed donation with its donor's card.
#[derive(Debug, Clone, Serialize)]
pub struct DonationRecord {
    #[serde(flatten)]
    pub view: DonationView,
    pub donor: Option<UserSummary>,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: Role,
    pub total_amount: f64,
    pub donations_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurposeTotal {
    pub purpose: DonationPurpose,
    pub total_amount: f64,
    pub count: usize,
}

/// Successful donations summarized for the admin charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationStats {
    pub total_amount: f64,
    pub total_donations: usize,
    pub unique_donors: usize,
    pub min_amount: f64,
    pub max_amount: f64,
    pub avg_amount: f64,
    pub by_purpose: Vec<PurposeTotal>,
    pub monthly: Vec<MonthTotal>,
}

#[derive(Debug, Clone)]
pub struct DonationService {
    store: Store,
}

impl DonationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Record a donation by the calling alumnus.
    #[instrument(skip(self, caller, params), fields(user_id = %caller.id))]
    pub async fn create(
        &self,
        caller: &Caller,
        params: CreateDonationParams,
    ) -> ConnectResult<DonationView> {
        authorize(caller, ResourceType::Donation, Action::Create)?;

        let mut v = Validator::new();
        v.check(params.amount.is_some(), "Amount is required");
        let purpose = params.purpose.as_deref().and_then(DonationPurpose::parse);
        v.check(
            purpose.is_some(),
            "Purpose must be one of: general, scholarship, infrastructure, event, community",
        );
        let currency = match params.currency.as_deref() {
            Some(raw) => {
                let parsed = Currency::parse(raw);
                v.check(parsed.is_some(), "Currency must be one of: INR, USD, EUR, GBP");
                parsed
            }
            None => None,
        };
        v.finish()?;

        let donor = self.store.users.get(caller.id).await?;
        let mut donation = Donation::new(
            caller.id,
            params.amount.unwrap_or_default(),
            purpose.unwrap_or_default(),
        )
        .with_donor(&donor)
        .anonymous(params.is_anonymous);
        if let Some(currency) = currency {
            donation = donation.with_currency(currency);
        }
        if let Some(provider) = params.payment_provider {
            donation = donation.with_provider(provider);
        }
        if let Some(tx) = params.transaction_id {
            donation = donation.with_transaction_id(tx);
        }
        if let Some(message) = params.message {
            donation = donation.with_message(message);
        }
        if let Some(meta) = params.meta {
            donation = donation.with_meta(meta);
        }

        let donation = self.store.donations.insert(donation).await?;
        info!(
            donation_id = %donation.id,
            amount = donation.amount,
            purpose = donation.purpose.as_str(),
            "Donation created"
        );
        Ok(DonationView::from(donation))
    }

    /// Confirm a payment by its transaction id.
    #[instrument(skip(self, caller, params), fields(admin = %caller.id))]
    pub async fn verify(
        &self,
        caller: &Caller,
        params: VerifyDonationParams,
    ) -> ConnectResult<DonationView> {
        authorize(caller, ResourceType::Donation, Action::Verify)?;

        let tx = params
            .transaction_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConnectError::ValidationFailed("transactionId required".to_string()))?;
        let status = parse_status(params.status.as_deref().unwrap_or("success"))?;

        let target = self
            .store
            .donations
            .find_one(|d| d.transaction_id.as_deref() == Some(tx.as_str()))
            .await
            .ok_or_else(|| ConnectError::not_found("Donation"))?;

        let meta = params.meta;
        let donation = self
            .store
            .donations
            .update(target.id, move |d| {
                d.set_status(status, None)?;
                d.verified_by_admin = status == DonationStatus::Success;
                if let Some(meta) = meta {
                    d.meta = meta;
                }
                Ok(())
            })
            .await?;

        info!(donation_id = %donation.id, status = status.as_str(), "Donation verified");
        Ok(DonationView::from(donation))
    }

    /// Set a donation's status by id.
    ///
    /// `success` needs a transaction id supplied here or already stored.
    #[instrument(skip(self, caller, params), fields(admin = %caller.id))]
    pub async fn update_status(
        &self,
        caller: &Caller,
        id: Uuid,
        params: UpdateDonationStatusParams,
    ) -> ConnectResult<DonationView> {
        authorize(caller, ResourceType::Donation, Action::Update)?;
        let status = parse_status(&params.status)?;

        let donation = self
            .store
            .donations
            .update(id, move |d| {
                d.set_status(status, params.transaction_id)?;
                if status == DonationStatus::Success {
                    d.verified_by_admin = true;
                }
                if let Some(receipt) = params.receipt_url.filter(|r| !r.trim().is_empty()) {
                    d.receipt_url = Some(receipt);
                }
                Ok(())
            })
            .await?;

        info!(donation_id = %donation.id, status = status.as_str(), "Donation status updated");
        Ok(DonationView::from(donation))
    }

    /// The caller's own donations, newest first.
    pub async fn mine(
        &self,
        caller: &Caller,
        params: MyDonationsParams,
    ) -> ConnectResult<Paged<DonationView>> {
        authorize(caller, ResourceType::Donation, Action::List)?;
        let status = optional_filter(params.status.as_deref(), parse_status)?;
        let purpose = optional_filter(params.purpose.as_deref(), parse_purpose)?;

        let donations = self
            .store
            .donations
            .find(|d| {
                d.user == caller.id
                    && status.map_or(true, |s| d.status == s)
                    && purpose.map_or(true, |p| d.purpose == p)
            })
            .await;

        let page = PageRequest {
            page: params.page,
            limit: params.limit,
        }
        .apply(donations, DEFAULT_DONATION_PAGE_SIZE);
        Ok(Paged {
            items: page.items.into_iter().map(DonationView::from).collect(),
            meta: page.meta,
        })
    }

    /// Every donation, filtered, newest first.
    pub async fn all(
        &self,
        caller: &Caller,
        params: DonationSearchParams,
    ) -> ConnectResult<Paged<DonationRecord>> {
        authorize(caller, ResourceType::Donation, Action::Manage)?;
        let status = optional_filter(params.status.as_deref(), parse_status)?;
        let purpose = optional_filter(params.purpose.as_deref(), parse_purpose)?;
        let window = DateWindow::parse(params.from_date.as_deref(), params.to_date.as_deref())?;

        let donor_ids: Option<Vec<Uuid>> = match params.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                let matched = self
                    .store
                    .users
                    .find(|u| {
                        u.name.to_lowercase().contains(&term)
                            || u.email.to_lowercase().contains(&term)
                    })
                    .await;
                Some(matched.iter().map(|u| u.id).collect())
            }
            _ => None,
        };

        let donations = self
            .store
            .donations
            .find(|d| {
                status.map_or(true, |s| d.status == s)
                    && purpose.map_or(true, |p| d.purpose == p)
                    && window.contains(d.created_at)
                    && donor_ids.as_ref().map_or(true, |ids| ids.contains(&d.user))
            })
            .await;

        let page = PageRequest {
            page: params.page,
            limit: params.limit,
        }
        .apply(donations, DEFAULT_DONATION_PAGE_SIZE);

        let donors = author_index(&self.store, page.items.iter().map(|d| d.user)).await;
        Ok(Paged {
            items: page
                .items
                .into_iter()
                .map(|d| DonationRecord {
                    donor: donors.get(&d.user).cloned(),
                    view: DonationView::from(d),
                })
                .collect(),
            meta: page.meta,
        })
    }

    /// Top donors by successful, non-anonymous amount. Public.
    pub async fn leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_DONATION_PAGE_SIZE);
        let donations = self
            .store
            .donations
            .find(|d| d.is_successful() && !d.is_anonymous)
            .await;

        let totals = sum_by(&donations, |d| Some(d.user), |d| d.amount);
        let mut entries = Vec::with_capacity(totals.len());
        for (user, total_amount, donations_count) in totals {
            let Some(user) = user else { continue };
            // donors whose account is gone drop off the board
            if let Some(donor) = self.store.users.find_by_id(user).await {
                entries.push(LeaderboardEntry {
                    user_id: donor.id,
                    name: donor.name,
                    email: donor.email,
                    avatar: donor.avatar,
                    role: donor.role,
                    total_amount,
                    donations_count,
                });
            }
        }
        top_n(entries, limit, |e| e.total_amount)
    }

    /// Summary of successful donations within an optional date window.
    pub async fn stats(
        &self,
        caller: &Caller,
        params: DonationStatsParams,
    ) -> ConnectResult<DonationStats> {
        authorize(caller, ResourceType::Donation, Action::Manage)?;
        let window = DateWindow::parse(params.from_date.as_deref(), params.to_date.as_deref())?;
        let donations = self
            .store
            .donations
            .find(|d| d.is_successful() && window.contains(d.created_at))
            .await;
        Ok(summarize(&donations))
    }
}

fn summarize(donations: &[Donation]) -> DonationStats {
    let total_donations = donations.len();
    let total_amount: f64 = donations.iter().map(|d| d.amount).sum();
    let mut donors: Vec<Uuid> = donations.iter().map(|d| d.user).collect();
    donors.sort();
    donors.dedup();

    let amounts = donations.iter().map(|d| d.amount);
    let min_amount = amounts.clone().reduce(f64::min).unwrap_or(0.0);
    let max_amount = amounts.reduce(f64::max).unwrap_or(0.0);

    DonationStats {
        total_amount,
        total_donations,
        unique_donors: donors.len(),
        min_amount,
        max_amount,
        avg_amount: if total_donations == 0 {
            0.0
        } else {
            total_amount / total_donations as f64
        },
        by_purpose: sum_by(donations, |d| Some(d.purpose), |d| d.amount)
            .into_iter()
            .filter_map(|(purpose, total_amount, count)| {
                purpose.map(|purpose| PurposeTotal {
                    purpose,
                    total_amount,
                    count,
                })
            })
            .collect(),
        monthly: monthly_totals(donations, |d| d.created_at, |d| d.amount),
    }
}

fn parse_status(raw: &str) -> ConnectResult<DonationStatus> {
    DonationStatus::parse(raw).ok_or_else(|| {
        ConnectError::ValidationFailed(
            "\"status\" must be one of [success, pending, failed]".to_string(),
        )
    })
}

fn parse_purpose(raw: &str) -> ConnectResult<DonationPurpose> {
    DonationPurpose::parse(raw).ok_or_else(|| {
        ConnectError::ValidationFailed(
            "Purpose must be one of: general, scholarship, infrastructure, event, community"
                .to_string(),
        )
    })
}

fn optional_filter<T>(
    raw: Option<&str>,
    parse: fn(&str) -> ConnectResult<T>,
) -> ConnectResult<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse(raw).map(Some),
    }
}

/// Inclusive `created_at` window; `to` covers its whole day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DateWindow {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl DateWindow {
    fn parse(from: Option<&str>, to: Option<&str>) -> ConnectResult<Self> {
        let mut v = Validator::new();
        let from = parse_day(&mut v, "fromDate", from).map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let to = parse_day(&mut v, "toDate", to).and_then(|d| {
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).map(|end| d.and_time(end).and_utc())
        });
        v.finish()?;
        Ok(Self { from, to })
    }

    fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_day(v: &mut Validator, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|d| d.with_timezone(&Utc).date_naive())
    });
    v.check(day.is_some(), format!("\"{field}\" must be a valid date"));
    day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_includes_whole_end_day() {
        let window = DateWindow::parse(Some("2025-01-01"), Some("2025-01-31")).unwrap();
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap()));
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap()));
    }

    #[test]
    fn test_window_rejects_garbage() {
        let err = DateWindow::parse(Some("yesterday"), None).unwrap_err();
        assert_eq!(err.to_string(), "\"fromDate\" must be a valid date");
        assert_eq!(DateWindow::parse(None, None).unwrap(), DateWindow::default());
    }

    #[test]
    fn test_summarize_empty() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_amount, 0.0);
        assert_eq!(stats.total_donations, 0);
        assert_eq!(stats.avg_amount, 0.0);
        assert!(stats.by_purpose.is_empty());
        assert!(stats.monthly.is_empty());
    }

    #[test]
    fn test_summarize_groups_by_purpose() {
        let donor = Uuid::now_v7();
        let donations = vec![
            Donation::new(donor, 100.0, DonationPurpose::Scholarship),
            Donation::new(donor, 300.0, DonationPurpose::General),
            Donation::new(Uuid::now_v7(), 50.0, DonationPurpose::Scholarship),
        ];
        let stats = summarize(&donations);
        assert_eq!(stats.total_amount, 450.0);
        assert_eq!(stats.unique_donors, 2);
        assert_eq!(stats.min_amount, 50.0);
        assert_eq!(stats.max_amount, 300.0);
        assert_eq!(stats.by_purpose[0].purpose, DonationPurpose::General);
        assert_eq!(stats.by_purpose[1].count, 2);
    }
}
