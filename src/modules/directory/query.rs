//! Filtering and sorting over in-memory directory lists, shared by the
//! public feed and the admin verification queue.

use std::cmp::Ordering;
use std::str::FromStr;

use super::model::{Business, BusinessStatus, PaymentMethod, Review, ReviewStatus};
use super::schema::{BusinessListQuery, ReviewListQuery};
use super::interface::DirectoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusinessSort {
    #[default]
    Name,
    Rating,
    Newest,
    Reviews,
}

impl FromStr for BusinessSort {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            "newest" => Ok(Self::Newest),
            "reviews" => Ok(Self::Reviews),
            other => Err(DirectoryError::InvalidFilter(format!("unknown sort '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BusinessFilter {
    pub search: Option<String>,
    pub municipality: Option<String>,
    pub category: Option<String>,
    pub status: Option<BusinessStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub min_rating: Option<f64>,
    pub sort: BusinessSort,
}

impl BusinessFilter {
    pub fn from_query(query: &BusinessListQuery) -> Result<Self, DirectoryError> {
        let status = query
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty() && !s.eq_ignore_ascii_case("all"))
            .map(BusinessStatus::from_str)
            .transpose()
            .map_err(DirectoryError::InvalidFilter)?;

        let payment_method = query
            .payment_method
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PaymentMethod::from_str)
            .transpose()
            .map_err(DirectoryError::InvalidFilter)?;

        let sort = query
            .sort
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(BusinessSort::from_str)
            .transpose()?
            .unwrap_or_default();

        if let Some(rating) = query.min_rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(DirectoryError::InvalidFilter("minRating must be between 0 and 5".to_string()));
            }
        }

        Ok(Self {
            search: non_blank(query.search.as_deref()),
            municipality: non_blank(query.municipality.as_deref()),
            category: non_blank(query.category.as_deref()),
            status,
            payment_method,
            min_rating: query.min_rating,
            sort,
        })
    }

    pub fn matches(&self, business: &Business) -> bool {
        if let Some(status) = self.status {
            if business.status != status {
                return false;
            }
        }
        if let Some(municipality) = &self.municipality {
            if !business.municipality.eq_ignore_ascii_case(municipality) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !business.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(method) = self.payment_method {
            if !business.accepts(method) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if business.rating < min {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                [&business.name, &business.description, &business.category, &business.municipality]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }

    /// Filters then sorts; ties fall back to name, then id.
    pub fn apply(&self, businesses: Vec<Business>) -> Vec<Business> {
        let mut matched: Vec<Business> = businesses.into_iter().filter(|b| self.matches(b)).collect();
        matched.sort_by(|a, b| compare(self.sort, a, b));
        matched
    }
}

fn compare(sort: BusinessSort, a: &Business, b: &Business) -> Ordering {
    let primary = match sort {
        BusinessSort::Name => Ordering::Equal,
        BusinessSort::Rating => b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal),
        BusinessSort::Newest => b.created_at.cmp(&a.created_at),
        BusinessSort::Reviews => b.review_count.cmp(&a.review_count),
    };
    primary
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

// =============================================================================
// REVIEWS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub status: Option<ReviewStatus>,
    pub business_id: Option<u32>,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
}

impl ReviewFilter {
    pub fn from_query(query: &ReviewListQuery) -> Result<Self, DirectoryError> {
        let status = query
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty() && !s.eq_ignore_ascii_case("all"))
            .map(ReviewStatus::from_str)
            .transpose()
            .map_err(DirectoryError::InvalidFilter)?;

        Ok(Self {
            status,
            business_id: query.business_id,
            min_rating: query.min_rating,
            max_rating: query.max_rating,
        })
    }

    /// Newest first.
    pub fn apply(&self, reviews: Vec<Review>) -> Vec<Review> {
        let mut matched: Vec<Review> = reviews
            .into_iter()
            .filter(|r| self.status.is_none_or(|s| r.status == s))
            .filter(|r| self.business_id.is_none_or(|id| r.business_id == id))
            .filter(|r| self.min_rating.is_none_or(|min| r.rating >= min))
            .filter(|r| self.max_rating.is_none_or(|max| r.rating <= max))
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        matched
    }
}
