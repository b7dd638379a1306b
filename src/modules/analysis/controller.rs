use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use super::interface::AnalysisApiError;
use super::schema::CompetitorQuery;
use crate::modules::auth::guard::AuthUser;
use crate::modules::directory::DirectoryError;
use crate::services::analysis::{analyze, CompetitorAnalysis, MarketTrends};
use crate::AppState;

/// GET /api/analysis/competitors?businessId=&radiusKm=
///
/// The selected business may have any status; only approved listings are
/// counted as competitors.
pub async fn competitor_analysis(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompetitorQuery>,
) -> Result<Json<CompetitorAnalysis>, AnalysisApiError> {
    let selected = state
        .directory
        .find_business(query.business_id)
        .await
        .ok_or(DirectoryError::BusinessNotFound)?;

    let radius_km = match query.radius_km {
        Some(radius) => radius,
        None => state.settings.get().await.default_search_radius_km,
    };

    let candidates = state.directory.approved_businesses().await;
    let analysis = analyze(&selected, &candidates, radius_km)?;

    state
        .metrics
        .competitor_analyses_total
        .with_label_values(&[analysis.saturation.as_str()])
        .inc();
    state
        .metrics
        .competitors_found
        .with_label_values(&[selected.category.as_str()])
        .observe(analysis.competitor_count as f64);

    tracing::debug!(
        business_id = selected.id,
        radius_km,
        competitors = analysis.competitor_count,
        saturation = analysis.saturation.as_str(),
        "Competitor analysis"
    );

    Ok(Json(analysis))
}

/// GET /api/analysis/trends
pub async fn market_trends(_user: AuthUser, State(state): State<Arc<AppState>>) -> Json<MarketTrends> {
    Json(MarketTrends::compute(&state.directory.businesses().await))
}
