//! Dashboard statistics derived from the current directory.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::modules::directory::model::{Business, BusinessStatus, PaymentMethod, StatusCounts};

const TOP_RATED_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    pub category: String,
    pub count: usize,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAdoption {
    pub method: PaymentMethod,
    pub count: usize,
    /// Share of approved businesses, 0.0..=1.0.
    pub share: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRated {
    pub id: u32,
    pub name: String,
    pub municipality: String,
    pub category: String,
    pub rating: f64,
    pub review_count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrends {
    pub total_businesses: usize,
    pub status_counts: StatusCounts,
    pub by_municipality: BTreeMap<String, usize>,
    pub by_category: Vec<CategoryTrend>,
    pub payment_adoption: Vec<PaymentAdoption>,
    pub top_rated: Vec<TopRated>,
}

impl MarketTrends {
    pub fn compute(businesses: &[Business]) -> Self {
        let approved: Vec<&Business> = businesses
            .iter()
            .filter(|b| b.status == BusinessStatus::Approved)
            .collect();

        let mut by_municipality = BTreeMap::new();
        let mut categories: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for business in &approved {
            *by_municipality.entry(business.municipality.clone()).or_insert(0) += 1;
            let entry = categories.entry(business.category.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += business.rating;
        }

        let by_category = categories
            .into_iter()
            .map(|(category, (count, rating_sum))| CategoryTrend {
                category: category.to_string(),
                count,
                average_rating: round2(rating_sum / count as f64),
            })
            .collect();

        let payment_adoption = PaymentMethod::ALL
            .into_iter()
            .map(|method| {
                let count = approved.iter().filter(|b| b.accepts(method)).count();
                let share = if approved.is_empty() {
                    0.0
                } else {
                    round2(count as f64 / approved.len() as f64)
                };
                PaymentAdoption { method, count, share }
            })
            .collect();

        let mut ranked = approved.clone();
        ranked.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| b.review_count.cmp(&a.review_count))
        });
        let top_rated = ranked
            .into_iter()
            .take(TOP_RATED_LIMIT)
            .map(|b| TopRated {
                id: b.id,
                name: b.name.clone(),
                municipality: b.municipality.clone(),
                category: b.category.clone(),
                rating: b.rating,
                review_count: b.review_count,
            })
            .collect();

        Self {
            total_businesses: businesses.len(),
            status_counts: StatusCounts::tally(businesses),
            by_municipality,
            by_category,
            payment_adoption,
            top_rated,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
