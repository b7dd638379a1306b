use serde::{Deserialize, Serialize};

use super::model::Notification;
use crate::services::pagination::Page;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    pub kind: Option<String>,
    #[serde(default, alias = "unread_only")]
    pub unread_only: bool,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    #[serde(flatten)]
    pub page: Page<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}
