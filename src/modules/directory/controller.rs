use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::interface::DirectoryError;
use super::model::{Business, BusinessStatus, Review};
use super::query::{BusinessFilter, ReviewFilter};
use super::schema::{
    BusinessDetailResponse, BusinessListQuery, FacetsResponse, ReviewListQuery, SmeStatsResponse,
    StatusChangeResponse, UpdateReviewRequest, UpdateStatusRequest,
};
use crate::modules::admin::AdminResult;
use crate::modules::audit::{model::actions, AuditCrud, NewAuditLog};
use crate::modules::auth::guard::RequireAdmin;
use crate::modules::notifications::model::NotificationKind;
use crate::services::client_info::ClientInfo;
use crate::services::pagination::{paginate, Page};
use crate::AppState;

// =============================================================================
// PUBLIC FEED
// =============================================================================

/// GET /api/businesses - approved listings only
pub async fn list_businesses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BusinessListQuery>,
) -> Result<Json<Page<Business>>, DirectoryError> {
    let mut filter = BusinessFilter::from_query(&query)?;
    filter.status = None;

    let businesses = filter.apply(state.directory.approved_businesses().await);
    Ok(Json(paginate(businesses, query.page, query.limit)))
}

/// GET /api/businesses/{id}
pub async fn get_business(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<BusinessDetailResponse>, DirectoryError> {
    let business = find_approved(&state, id).await?;
    Ok(Json(BusinessDetailResponse { business }))
}

/// GET /api/businesses/{id}/reviews
pub async fn list_business_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Vec<Review>>, DirectoryError> {
    find_approved(&state, id).await?;
    Ok(Json(state.directory.visible_reviews_for(id).await))
}

/// GET /api/directory/facets
pub async fn get_facets(State(state): State<Arc<AppState>>) -> Json<FacetsResponse> {
    let approved = state.directory.approved_businesses().await;
    let municipalities: BTreeSet<String> = approved.iter().map(|b| b.municipality.clone()).collect();
    let categories: BTreeSet<String> = approved.iter().map(|b| b.category.clone()).collect();

    Json(FacetsResponse {
        municipalities: municipalities.into_iter().collect(),
        categories: categories.into_iter().collect(),
    })
}

async fn find_approved(state: &AppState, id: u32) -> Result<Business, DirectoryError> {
    state
        .directory
        .find_business(id)
        .await
        .filter(|b| b.status == BusinessStatus::Approved)
        .ok_or(DirectoryError::BusinessNotFound)
}

// =============================================================================
// ADMIN SME QUEUE
// =============================================================================

/// GET /api/admin/smes
pub async fn list_smes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<BusinessListQuery>,
) -> AdminResult<Json<Page<Business>>> {
    let filter = BusinessFilter::from_query(&query)?;
    let businesses = filter.apply(state.directory.businesses().await);
    Ok(Json(paginate(businesses, query.page, query.limit)))
}

/// GET /api/admin/smes/stats
pub async fn sme_stats(RequireAdmin(_admin): RequireAdmin, State(state): State<Arc<AppState>>) -> Json<SmeStatsResponse> {
    let counts = state.directory.status_counts().await;
    Json(SmeStatsResponse {
        total: counts.total(),
        counts,
    })
}

/// PATCH /api/admin/smes/{id}/status
pub async fn update_sme_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Path(id): Path<u32>,
    Json(req): Json<UpdateStatusRequest>,
) -> AdminResult<Json<StatusChangeResponse>> {
    let change = state.directory.update_status(id, req.status, req.reason).await?;
    let business = &change.business;

    tracing::info!(
        business_id = business.id,
        from = %change.previous,
        to = %business.status,
        admin_id = %admin.id,
        "SME status changed"
    );

    state
        .metrics
        .sme_status_changes_total
        .with_label_values(&[change.previous.as_str(), business.status.as_str()])
        .inc();
    state.metrics.set_business_counts(&state.directory.status_counts().await);

    AuditCrud::new(state.db.clone())
        .record_or_log(&NewAuditLog::new(
            Some(admin.id),
            actions::SME_STATUS_CHANGED,
            json!({
                "businessId": business.id,
                "businessName": business.name,
                "from": change.previous,
                "to": business.status,
                "reason": business.rejection_reason,
            }),
            &client,
        ))
        .await;

    state
        .notifications
        .push(
            NotificationKind::SmeRegistration,
            format!("Listing {}", business.status.as_str().replace('_', " ")),
            format!("{} moved from {} to {}.", business.name, change.previous, business.status),
        )
        .await;

    Ok(Json(StatusChangeResponse {
        previous_status: change.previous,
        business: change.business,
    }))
}

// =============================================================================
// ADMIN REVIEW MODERATION
// =============================================================================

/// GET /api/admin/reviews
pub async fn list_reviews(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReviewListQuery>,
) -> AdminResult<Json<Page<Review>>> {
    let filter = ReviewFilter::from_query(&query)?;
    let reviews = filter.apply(state.directory.reviews().await);
    Ok(Json(paginate(reviews, query.page, query.limit)))
}

/// PATCH /api/admin/reviews/{id}
pub async fn update_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Path(id): Path<u32>,
    Json(req): Json<UpdateReviewRequest>,
) -> AdminResult<Json<Review>> {
    let (previous, review) = state.directory.set_review_status(id, req.status).await?;

    if previous != review.status {
        tracing::info!(review_id = review.id, from = previous.as_str(), to = review.status.as_str(), "Review moderated");
        AuditCrud::new(state.db.clone())
            .record_or_log(&NewAuditLog::new(
                Some(admin.id),
                actions::REVIEW_STATUS_CHANGED,
                json!({
                    "reviewId": review.id,
                    "businessId": review.business_id,
                    "from": previous,
                    "to": review.status,
                }),
                &client,
            ))
            .await;
    }

    Ok(Json(review))
}
