use chrono::Utc;
use tokio::sync::RwLock;

use super::interface::DirectoryError;
use super::model::{Business, BusinessStatus, Review, ReviewStatus, StatusCounts};
use crate::modules::seed;

/// Outcome of a status change, used for audit rows and notifications.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub previous: BusinessStatus,
    pub business: Business,
}

// =============================================================================
// DIRECTORY STORE
// =============================================================================

/// Businesses and reviews held in process memory.
pub struct DirectoryStore {
    businesses: RwLock<Vec<Business>>,
    reviews: RwLock<Vec<Review>>,
}

impl DirectoryStore {
    pub fn new(businesses: Vec<Business>, reviews: Vec<Review>) -> Self {
        Self {
            businesses: RwLock::new(businesses),
            reviews: RwLock::new(reviews),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::seed_businesses(), seed::seed_reviews())
    }

    pub async fn businesses(&self) -> Vec<Business> {
        self.businesses.read().await.clone()
    }

    pub async fn approved_businesses(&self) -> Vec<Business> {
        self.businesses
            .read()
            .await
            .iter()
            .filter(|b| b.status == BusinessStatus::Approved)
            .cloned()
            .collect()
    }

    pub async fn find_business(&self, id: u32) -> Option<Business> {
        self.businesses.read().await.iter().find(|b| b.id == id).cloned()
    }

    pub async fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(self.businesses.read().await.iter())
    }

    /// Applies a verification decision. Rejections must carry a reason;
    /// any other status clears a previous rejection reason.
    pub async fn update_status(
        &self,
        id: u32,
        next: BusinessStatus,
        reason: Option<String>,
    ) -> Result<StatusChange, DirectoryError> {
        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        if next == BusinessStatus::Rejected && reason.is_none() {
            return Err(DirectoryError::ReasonRequired);
        }

        let mut businesses = self.businesses.write().await;
        let business = businesses
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(DirectoryError::BusinessNotFound)?;

        let previous = business.status;
        if !previous.can_transition_to(next) {
            return Err(DirectoryError::InvalidTransition {
                from: previous,
                to: next,
            });
        }

        business.status = next;
        business.rejection_reason = if next == BusinessStatus::Rejected { reason } else { None };
        business.updated_at = Utc::now();

        Ok(StatusChange {
            previous,
            business: business.clone(),
        })
    }

    pub async fn reviews(&self) -> Vec<Review> {
        self.reviews.read().await.clone()
    }

    pub async fn visible_reviews_for(&self, business_id: u32) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .read()
            .await
            .iter()
            .filter(|r| r.business_id == business_id && r.status == ReviewStatus::Visible)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    /// Returns the previous status alongside the updated review.
    pub async fn set_review_status(
        &self,
        id: u32,
        status: ReviewStatus,
    ) -> Result<(ReviewStatus, Review), DirectoryError> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DirectoryError::ReviewNotFound)?;

        let previous = review.status;
        review.status = status;
        Ok((previous, review.clone()))
    }
}
