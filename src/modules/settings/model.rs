use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    #[validate(length(min = 1, max = 100, message = "Site name must be 1-100 characters"))]
    pub site_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: String,
    pub maintenance_mode: bool,
    pub allow_registrations: bool,
    pub require_email_verification: bool,
    #[validate(range(min = 1, max = 5, message = "Upload size must be between 1 and 5 MB"))]
    pub max_upload_size_mb: u32,
    #[validate(range(min = 0.5, max = 10.0, message = "Search radius must be between 0.5 and 10 km"))]
    pub default_search_radius_km: f64,
    #[validate(range(min = 5, max = 1440, message = "Session timeout must be between 5 and 1440 minutes"))]
    pub session_timeout_minutes: u32,
    pub require_admin_two_factor: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            site_name: "GeoSME Batangas".to_string(),
            contact_email: "admin@geosme.ph".to_string(),
            maintenance_mode: false,
            allow_registrations: true,
            require_email_verification: false,
            max_upload_size_mb: 5,
            default_search_radius_km: 5.0,
            session_timeout_minutes: 60,
            require_admin_two_factor: false,
        }
    }
}

impl SystemSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb as usize * 1024 * 1024
    }

    /// camelCase names of the fields that differ from `other`.
    pub fn changed_fields(&self, other: &SystemSettings) -> Vec<String> {
        let (Ok(serde_json::Value::Object(a)), Ok(serde_json::Value::Object(b))) =
            (serde_json::to_value(self), serde_json::to_value(other))
        else {
            return Vec::new();
        };
        a.iter()
            .filter(|(key, value)| b.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect()
    }
}
