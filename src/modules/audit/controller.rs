use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use super::crud::{AuditCrud, AuditFilter};
use super::model::AuditLog;
use super::schema::AuditLogQuery;
use crate::modules::admin::{AdminError, AdminResult};
use crate::modules::auth::guard::RequireAdmin;
use crate::services::pagination::{clamp_limit, clamp_page, sql_offset, Page};
use crate::AppState;

/// GET /api/admin/audit-logs - newest first
pub async fn list_audit_logs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuditLogQuery>,
) -> AdminResult<Json<Page<AuditLog>>> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(AdminError::BadRequest("'from' must not be after 'to'".to_string()));
        }
    }

    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit);
    let filter = AuditFilter {
        user_id: query.user_id,
        action: query.action.filter(|a| !a.trim().is_empty()),
        from: query.from,
        to: query.to,
    };

    let crud = AuditCrud::new(state.db.clone());
    let total = crud.count(&filter).await? as usize;
    let items = match sql_offset(page, limit) {
        Some(offset) => crud.list(&filter, limit as i64, offset).await?,
        None => Vec::new(),
    };

    Ok(Json(Page {
        items,
        total,
        page,
        limit,
        total_pages: total.div_ceil(limit),
    }))
}
