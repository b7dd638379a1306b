//! Same-category proximity analysis around a selected business.

use serde::Serialize;
use thiserror::Error;

use super::geo::haversine_km;
use crate::modules::directory::model::{Business, PaymentMethod};

pub const MIN_RADIUS_KM: f64 = 0.5;
pub const MAX_RADIUS_KM: f64 = 10.0;

/// Competitors closer than this trigger differentiation advice.
pub const CLOSE_COMPETITOR_KM: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("Business {business_id} has no coordinates")]
    MissingCoordinates { business_id: u32 },

    #[error("Radius must be between 0.5 and 10 km, got {0}")]
    InvalidRadius(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketSaturation {
    Low,
    Medium,
    High,
}

impl MarketSaturation {
    pub fn classify(competitor_count: usize) -> Self {
        match competitor_count {
            0..=2 => Self::Low,
            3..=5 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub business: Business,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis {
    pub business: Business,
    pub radius_km: f64,
    pub competitors: Vec<Competitor>,
    pub competitor_count: usize,
    pub average_rating: Option<f64>,
    pub average_distance_km: Option<f64>,
    pub nearest: Option<Competitor>,
    pub saturation: MarketSaturation,
    pub recommendations: Vec<String>,
}

pub fn validate_radius(radius_km: f64) -> Result<f64, AnalysisError> {
    if radius_km.is_finite() && (MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
        Ok(radius_km)
    } else {
        Err(AnalysisError::InvalidRadius(radius_km))
    }
}

/// Other businesses in the exact same category within `radius_km`, nearest first.
pub fn find_competitors(
    selected: &Business,
    candidates: &[Business],
    radius_km: f64,
) -> Result<Vec<Competitor>, AnalysisError> {
    let origin = selected
        .coordinates()
        .ok_or(AnalysisError::MissingCoordinates { business_id: selected.id })?;

    let mut competitors: Vec<Competitor> = candidates
        .iter()
        .filter(|c| c.id != selected.id && c.category == selected.category)
        .filter_map(|c| {
            let distance_km = haversine_km(origin, c.coordinates()?);
            (distance_km <= radius_km).then(|| Competitor {
                business: c.clone(),
                distance_km,
            })
        })
        .collect();

    competitors.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(competitors)
}

pub fn analyze(
    selected: &Business,
    candidates: &[Business],
    radius_km: f64,
) -> Result<CompetitorAnalysis, AnalysisError> {
    let radius_km = validate_radius(radius_km)?;
    let competitors = find_competitors(selected, candidates, radius_km)?;

    let count = competitors.len();
    let average_rating = mean(competitors.iter().map(|c| c.business.rating));
    let average_distance_km = mean(competitors.iter().map(|c| c.distance_km));
    let nearest = competitors.first().cloned();
    let saturation = MarketSaturation::classify(count);
    let recommendations = recommendations(selected, &competitors, saturation, average_rating);

    Ok(CompetitorAnalysis {
        business: selected.clone(),
        radius_km,
        competitors,
        competitor_count: count,
        average_rating,
        average_distance_km,
        nearest,
        saturation,
        recommendations,
    })
}

pub fn recommendations(
    selected: &Business,
    competitors: &[Competitor],
    saturation: MarketSaturation,
    average_rating: Option<f64>,
) -> Vec<String> {
    let mut advice = vec![match saturation {
        MarketSaturation::Low => {
            "Low competition in this area. Good opportunity to establish market presence.".to_string()
        }
        MarketSaturation::Medium => {
            "Moderate competition. Focus on unique value propositions to stand out.".to_string()
        }
        MarketSaturation::High => {
            "High market saturation. Consider differentiation strategies or alternative locations.".to_string()
        }
    }];

    if average_rating.is_some_and(|avg| avg > selected.rating) {
        advice.push(
            "Competitors have higher average ratings. Focus on improving service quality and customer satisfaction."
                .to_string(),
        );
    }

    let missing: Vec<PaymentMethod> = PaymentMethod::ALL
        .into_iter()
        .filter(|m| m.is_digital() && !selected.accepts(*m))
        .filter(|m| competitors.iter().any(|c| c.business.accepts(*m)))
        .collect();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(PaymentMethod::as_str).collect();
        advice.push(format!(
            "Nearby competitors accept digital payments you do not ({}). Consider adding them.",
            names.join(", ")
        ));
    }

    if competitors.first().is_some_and(|c| c.distance_km <= CLOSE_COMPETITOR_KM) {
        advice.push(
            "A direct competitor is within 500 m. Differentiate through products, pricing, or service hours."
                .to_string(),
        );
    }

    advice
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
