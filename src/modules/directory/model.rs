use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::services::analysis::geo::Coordinates;

// =============================================================================
// BUSINESS STATUS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl BusinessStatus {
    pub const ALL: [BusinessStatus; 4] = [
        Self::Pending,
        Self::UnderReview,
        Self::Approved,
        Self::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Moves allowed by the verification queue.
    pub fn can_transition_to(&self, next: BusinessStatus) -> bool {
        use BusinessStatus::*;
        matches!(
            (self, next),
            (Pending, UnderReview)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (UnderReview, Pending)
                | (Rejected, UnderReview)
                | (Approved, Rejected)
        )
    }
}

impl fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown business status: {}", s))
    }
}

// =============================================================================
// PAYMENT METHOD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Gcash,
    Maya,
    BankTransfer,
    CreditCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        Self::Cash,
        Self::Gcash,
        Self::Maya,
        Self::BankTransfer,
        Self::CreditCard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Gcash => "gcash",
            Self::Maya => "maya",
            Self::BankTransfer => "bank_transfer",
            Self::CreditCard => "credit_card",
        }
    }

    pub fn is_digital(&self) -> bool {
        !matches!(self, Self::Cash)
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown payment method: {}", s))
    }
}

// =============================================================================
// BUSINESS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: u32,
    pub name: String,
    pub owner_name: String,
    pub owner_email: String,
    pub municipality: String,
    pub category: String,
    pub description: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: BusinessStatus,
    pub payment_methods: Vec<PaymentMethod>,
    pub rating: f64,
    pub review_count: u32,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    /// Both halves must be present; a lone latitude is treated as missing.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        }
    }

    pub fn accepts(&self, method: PaymentMethod) -> bool {
        self.payment_methods.contains(&method)
    }
}

// =============================================================================
// REVIEW
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Visible,
    Flagged,
    Hidden,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Flagged => "flagged",
            Self::Hidden => "hidden",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visible" => Ok(Self::Visible),
            "flagged" => Ok(Self::Flagged),
            "hidden" => Ok(Self::Hidden),
            other => Err(format!("Unknown review status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u32,
    pub business_id: u32,
    pub reviewer_name: String,
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// STATUS COUNTS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub under_review: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally<'a>(businesses: impl IntoIterator<Item = &'a Business>) -> Self {
        businesses.into_iter().fold(Self::default(), |mut counts, b| {
            match b.status {
                BusinessStatus::Pending => counts.pending += 1,
                BusinessStatus::UnderReview => counts.under_review += 1,
                BusinessStatus::Approved => counts.approved += 1,
                BusinessStatus::Rejected => counts.rejected += 1,
            }
            counts
        })
    }

    pub fn get(&self, status: BusinessStatus) -> usize {
        match status {
            BusinessStatus::Pending => self.pending,
            BusinessStatus::UnderReview => self.under_review,
            BusinessStatus::Approved => self.approved,
            BusinessStatus::Rejected => self.rejected,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.under_review + self.approved + self.rejected
    }
}
