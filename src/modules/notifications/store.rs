use chrono::Utc;
use tokio::sync::RwLock;

use super::model::{Notification, NotificationKind};
use crate::modules::seed;

/// Admin notification feed held in process memory.
pub struct NotificationStore {
    items: RwLock<Vec<Notification>>,
}

impl NotificationStore {
    pub fn new(items: Vec<Notification>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::seed_notifications())
    }

    /// Newest first.
    pub async fn list(&self) -> Vec<Notification> {
        let mut items = self.items.read().await.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        items
    }

    pub async fn unread_count(&self) -> usize {
        self.items.read().await.iter().filter(|n| !n.read).count()
    }

    pub async fn push(&self, kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Notification {
        let mut items = self.items.write().await;
        let id = items.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        let notification = Notification {
            id,
            kind,
            title: title.into(),
            message: message.into(),
            read: false,
            created_at: Utc::now(),
        };
        items.push(notification.clone());
        notification
    }

    /// Returns `None` when the id is unknown.
    pub async fn mark_read(&self, id: u32) -> Option<Notification> {
        let mut items = self.items.write().await;
        let notification = items.iter_mut().find(|n| n.id == id)?;
        notification.read = true;
        Some(notification.clone())
    }

    /// Number of notifications that were unread.
    pub async fn mark_all_read(&self) -> usize {
        let mut items = self.items.write().await;
        items
            .iter_mut()
            .filter(|n| !n.read)
            .map(|n| n.read = true)
            .count()
    }

    pub async fn delete(&self, id: u32) -> bool {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|n| n.id != id);
        items.len() != before
    }
}
