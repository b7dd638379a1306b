use tokio::sync::RwLock;

use super::model::SystemSettings;

/// Platform settings held in process memory; defaults on every start.
#[derive(Default)]
pub struct SettingsStore {
    current: RwLock<SystemSettings>,
}

impl SettingsStore {
    pub fn new(settings: SystemSettings) -> Self {
        Self {
            current: RwLock::new(settings),
        }
    }

    pub async fn get(&self) -> SystemSettings {
        self.current.read().await.clone()
    }

    /// Swaps in `next` and returns the settings it replaced.
    pub async fn replace(&self, next: SystemSettings) -> SystemSettings {
        std::mem::replace(&mut *self.current.write().await, next)
    }
}
