use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::str::FromStr;
use std::sync::Arc;

use super::model::{Notification, NotificationKind};
use super::schema::{MarkAllReadResponse, NotificationListQuery, NotificationListResponse};
use crate::modules::admin::{AdminError, AdminResult};
use crate::modules::auth::guard::RequireAdmin;
use crate::services::pagination::paginate;
use crate::AppState;

/// GET /api/admin/notifications
pub async fn list_notifications(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<NotificationListQuery>,
) -> AdminResult<Json<NotificationListResponse>> {
    let kind = query
        .kind
        .as_deref()
        .filter(|k| !k.is_empty() && !k.eq_ignore_ascii_case("all"))
        .map(NotificationKind::from_str)
        .transpose()
        .map_err(AdminError::BadRequest)?;

    let items: Vec<Notification> = state
        .notifications
        .list()
        .await
        .into_iter()
        .filter(|n| kind.is_none_or(|k| n.kind == k))
        .filter(|n| !query.unread_only || !n.read)
        .collect();

    Ok(Json(NotificationListResponse {
        page: paginate(items, query.page, query.limit),
        unread_count: state.notifications.unread_count().await,
    }))
}

/// POST /api/admin/notifications/{id}/read
pub async fn mark_read(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> AdminResult<Json<Notification>> {
    state
        .notifications
        .mark_read(id)
        .await
        .map(Json)
        .ok_or(AdminError::NotFound("Notification"))
}

/// POST /api/admin/notifications/read-all
pub async fn mark_all_read(RequireAdmin(_admin): RequireAdmin, State(state): State<Arc<AppState>>) -> Json<MarkAllReadResponse> {
    Json(MarkAllReadResponse {
        updated: state.notifications.mark_all_read().await,
    })
}

/// DELETE /api/admin/notifications/{id}
pub async fn delete_notification(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> AdminResult<StatusCode> {
    if state.notifications.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AdminError::NotFound("Notification"))
    }
}
