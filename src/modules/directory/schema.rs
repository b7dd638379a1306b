use serde::{Deserialize, Serialize};

use super::model::{Business, BusinessStatus, ReviewStatus, StatusCounts};

// =============================================================================
// QUERIES
// =============================================================================

/// Query string of the public feed and the admin SME queue. `status` is
/// ignored by the public feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessListQuery {
    pub search: Option<String>,
    pub municipality: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "payment_method")]
    pub payment_method: Option<String>,
    #[serde(alias = "min_rating")]
    pub min_rating: Option<f64>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListQuery {
    pub status: Option<String>,
    #[serde(alias = "business_id")]
    pub business_id: Option<u32>,
    #[serde(alias = "min_rating")]
    pub min_rating: Option<u8>,
    #[serde(alias = "max_rating")]
    pub max_rating: Option<u8>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BusinessStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub status: ReviewStatus,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct BusinessDetailResponse {
    pub business: Business,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeResponse {
    pub business: Business,
    pub previous_status: BusinessStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmeStatsResponse {
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct FacetsResponse {
    pub municipalities: Vec<String>,
    pub categories: Vec<String>,
}
