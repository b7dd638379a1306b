use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SmeRegistration,
    Review,
    System,
    User,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SmeRegistration => "sme_registration",
            Self::Review => "review",
            Self::System => "system",
            Self::User => "user",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sme_registration" => Ok(Self::SmeRegistration),
            "review" => Ok(Self::Review),
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            other => Err(format!("Unknown notification kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u32,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
