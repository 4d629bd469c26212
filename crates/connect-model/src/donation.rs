//! Donation models
//!
//! Invariant: a donation whose status is `success` always carries a
//! transaction id. [`Donation::validate`] enforces it before every persist,
//! and the store keeps `transaction_id` sparse-unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{document_timestamps, Document};
use crate::error::{ConnectError, ConnectResult};
use crate::user::User;
use crate::validation::Validator;

/// Smallest accepted donation.
pub const MIN_DONATION_AMOUNT: f64 = 10.0;

/// Largest accepted donation.
pub const MAX_DONATION_AMOUNT: f64 = 1_000_000.0;

/// Longest donor message.
pub const MAX_MESSAGE_LEN: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "INR" => Some(Self::Inr),
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationPurpose {
    #[default]
    General,
    Scholarship,
    Infrastructure,
    Event,
    Community,
}

impl DonationPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Scholarship => "scholarship",
            Self::Infrastructure => "infrastructure",
            Self::Event => "event",
            Self::Community => "community",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(Self::General),
            "scholarship" => Some(Self::Scholarship),
            "infrastructure" => Some(Self::Infrastructure),
            "event" => Some(Self::Event),
            "community" => Some(Self::Community),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    #[default]
    Manual,
    Razorpay,
    Upi,
    BankTransfer,
    Stripe,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A donation by an alumni user.
///
/// # Examples
///
/// ```
/// use connect_model::{Document, Donation, DonationPurpose, DonationStatus};
/// use uuid::Uuid;
///
/// let mut donation = Donation::new(Uuid::now_v7(), 500.0, DonationPurpose::Scholarship);
/// assert!(donation.validate().is_ok());
///
/// // success needs a transaction id
/// assert!(donation.set_status(DonationStatus::Success, None).is_err());
/// assert!(donation.set_status(DonationStatus::Success, Some("TXN-1".into())).is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub user: Uuid,

    // Snapshot of the donor at donation time
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub batch_year: Option<i32>,

    pub amount: f64,
    pub currency: Currency,
    pub purpose: DonationPurpose,

    /// Gateway or manual reference; sparse-unique
    pub transaction_id: Option<String>,

    pub payment_provider: PaymentProvider,
    pub status: DonationStatus,
    pub is_anonymous: bool,
    pub verified_by_admin: bool,

    #[serde(default)]
    pub message: String,

    pub receipt_url: Option<String>,

    #[serde(default)]
    pub meta: serde_json::Value,

    pub flagged: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    /// Creates a pending donation.
    pub fn new(user: Uuid, amount: f64, purpose: DonationPurpose) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user,
            donor_name: None,
            donor_email: None,
            batch_year: None,
            amount,
            currency: Currency::default(),
            purpose,
            transaction_id: None,
            payment_provider: PaymentProvider::default(),
            status: DonationStatus::Pending,
            is_anonymous: false,
            verified_by_admin: false,
            message: String::new(),
            receipt_url: None,
            meta: serde_json::Value::Object(Default::default()),
            flagged: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fill the donor snapshot from the user record, keeping any value already set.
    pub fn with_donor(mut self, user: &User) -> Self {
        if self.donor_name.is_none() {
            self.donor_name = Some(user.name.clone());
        }
        if self.donor_email.is_none() {
            self.donor_email = Some(user.email.clone());
        }
        if self.batch_year.is_none() {
            self.batch_year = user.batch_year();
        }
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_provider(mut self, provider: PaymentProvider) -> Self {
        self.payment_provider = provider;
        self
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = normalize_transaction_id(transaction_id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into().trim().to_string();
        self
    }

    pub fn anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = meta;
        self
    }

    /// Move to `status`, optionally recording a transaction id first.
    ///
    /// `success` is refused unless a transaction id is supplied now or
    /// already stored.
    pub fn set_status(
        &mut self,
        status: DonationStatus,
        transaction_id: Option<String>,
    ) -> ConnectResult<()> {
        if let Some(tx) = transaction_id.and_then(normalize_transaction_id) {
            self.transaction_id = Some(tx);
        }
        if status == DonationStatus::Success && self.transaction_id.is_none() {
            return Err(missing_transaction_id());
        }
        self.status = status;
        Ok(())
    }

    /// Name shown publicly.
    pub fn display_donor_name(&self) -> String {
        if self.is_anonymous {
            return "Anonymous Donor".to_string();
        }
        self.donor_name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.donor_email.clone().filter(|e| !e.is_empty()))
            .unwrap_or_else(|| "Alumni Donor".to_string())
    }

    pub fn is_successful(&self) -> bool {
        self.status == DonationStatus::Success
    }
}

fn normalize_transaction_id(tx: String) -> Option<String> {
    let tx = tx.trim();
    (!tx.is_empty()).then(|| tx.to_string())
}

fn missing_transaction_id() -> ConnectError {
    ConnectError::ValidationFailed(
        "transaction_id required for successful donation payment".to_string(),
    )
}

impl Document for Donation {
    const COLLECTION: &'static str = "donations";
    const LABEL: &'static str = "Donation";

    document_timestamps!();

    fn validate(&self) -> ConnectResult<()> {
        if self.status == DonationStatus::Success && self.transaction_id.is_none() {
            return Err(missing_transaction_id());
        }
        let mut v = Validator::new();
        v.range("amount", self.amount, MIN_DONATION_AMOUNT, MAX_DONATION_AMOUNT);
        v.check(
            self.message.chars().count() <= MAX_MESSAGE_LEN,
            format!("\"message\" length must be less than or equal to {MAX_MESSAGE_LEN} characters long"),
        );
        v.finish()
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        self.transaction_id
            .iter()
            .map(|tx| ("transaction_id", tx.clone()))
            .collect()
    }
}

/// A donation plus its public donor name.
#[derive(Debug, Clone, Serialize)]
pub struct DonationView {
    #[serde(flatten)]
    pub donation: Donation,
    pub display_donor_name: String,
}

impl From<Donation> for DonationView {
    fn from(donation: Donation) -> Self {
        let display_donor_name = donation.display_donor_name();
        Self {
            donation,
            display_donor_name,
        }
    }
}
