use serde::{Deserialize, Serialize};

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PriceAlert,
    WeatherAlert,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::PriceAlert => write!(f, "price_alert"),
            NotificationKind::WeatherAlert => write!(f, "weather_alert"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub title: String,
    pub description: String,
}

/// An event as produced by the simulated feed, before it is logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub data: NotificationData,
}

impl AlertMessage {
    pub fn new(kind: NotificationKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            data: NotificationData {
                title: title.into(),
                description: description.into(),
            },
        }
    }
}

/// A logged notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// `notification-{millis}-{suffix}`; unique with high probability only
    pub id: String,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Creation time, unix milliseconds
    pub timestamp: i64,

    pub read: bool,

    pub data: NotificationData,
}
