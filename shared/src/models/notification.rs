//! Notification Models

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Read state; the wire uses the capitalized form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NotificationStatus {
    #[default]
    Unread,
    Read,
}

/// Priority; the wire uses the capitalized form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NotificationPriority {
    High,
    #[default]
    Normal,
    Low,
}

impl NotificationPriority {
    /// Sort weight, highest first.
    pub fn weight(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Normal => 2,
            Self::Low => 1,
        }
    }
}

/// Inbox notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Server IDs look like "N001"; locally created ones never do
    pub id: String,
    pub title: String,
    pub message: String,
    /// e.g. "Stock Alert", "Expense", "Task"
    #[serde(rename = "type", default)]
    pub notification_type: String,
    pub date: String,
    #[serde(default)]
    pub status: NotificationStatus,
    #[serde(default)]
    pub priority: NotificationPriority,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }

    /// Whether the ID matches the server's scheme.
    pub fn is_server_record(&self) -> bool {
        is_server_id(&self.id)
    }
}

/// Server-assigned notification IDs: "N" followed by exactly three digits.
pub fn is_server_id(id: &str) -> bool {
    match id.strip_prefix('N') {
        Some(rest) => rest.len() == 3 && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Inbox ordering: unread first, then priority weight descending, then
/// date descending (dates compare lexically in their ISO form).
pub fn compare_for_inbox(a: &Notification, b: &Notification) -> Ordering {
    (b.is_unread() as u8)
        .cmp(&(a.is_unread() as u8))
        .then_with(|| b.priority.weight().cmp(&a.priority.weight()))
        .then_with(|| b.date.cmp(&a.date))
}

/// Create notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreate {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub priority: Option<NotificationPriority>,
}
