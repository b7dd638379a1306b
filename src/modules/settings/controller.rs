use axum::{extract::State, Json};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::model::SystemSettings;
use crate::modules::admin::{AdminError, AdminResult};
use crate::modules::audit::{model::actions, AuditCrud, NewAuditLog};
use crate::modules::auth::guard::RequireAdmin;
use crate::response::validation_details;
use crate::services::client_info::ClientInfo;
use crate::AppState;

/// GET /api/admin/settings
pub async fn get_settings(RequireAdmin(_admin): RequireAdmin, State(state): State<Arc<AppState>>) -> Json<SystemSettings> {
    Json(state.settings.get().await)
}

/// PUT /api/admin/settings - full replacement
pub async fn update_settings(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<SystemSettings>,
) -> AdminResult<Json<SystemSettings>> {
    req.validate()
        .map_err(|e| AdminError::Validation(validation_details(&e)))?;

    let previous = state.settings.replace(req.clone()).await;
    let changed = previous.changed_fields(&req);

    if !changed.is_empty() {
        tracing::info!(admin_id = %admin.id, changed = ?changed, "System settings updated");
        AuditCrud::new(state.db.clone())
            .record_or_log(&NewAuditLog::new(
                Some(admin.id),
                actions::SETTINGS_UPDATED,
                json!({ "changed": changed }),
                &client,
            ))
            .await;
    }

    Ok(Json(req))
}
