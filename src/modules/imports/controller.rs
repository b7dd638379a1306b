use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::model::{inspect, ImportKind, ImportReport};
use crate::modules::admin::{AdminError, AdminResult};
use crate::modules::audit::{model::actions, AuditCrud, NewAuditLog};
use crate::modules::auth::guard::RequireAdmin;
use crate::services::client_info::ClientInfo;
use crate::AppState;

/// POST /api/admin/imports/{kind} - multipart field `file`
pub async fn validate_import(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> AdminResult<Json<ImportReport>> {
    let kind: ImportKind = kind.parse().map_err(bad_request)?;
    let limit = state.settings.get().await.max_upload_bytes();

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AdminError::BadRequest(e.body_text()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| bad_request(super::model::ImportError::MissingFile))?;
    let report = inspect(kind, &file_name, &bytes, limit).map_err(bad_request)?;

    tracing::info!(
        kind = ?report.kind,
        file = %report.file_name,
        rows = report.row_count,
        valid = report.valid,
        "CSV import validated"
    );

    AuditCrud::new(state.db.clone())
        .record_or_log(&NewAuditLog::new(
            Some(admin.id),
            actions::IMPORT_VALIDATED,
            json!({
                "kind": report.kind,
                "fileName": report.file_name,
                "rowCount": report.row_count,
                "missingColumns": report.missing_columns,
            }),
            &client,
        ))
        .await;

    Ok(Json(report))
}

fn bad_request(err: super::model::ImportError) -> AdminError {
    AdminError::BadRequest(err.to_string())
}
