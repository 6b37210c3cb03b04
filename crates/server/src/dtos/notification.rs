use chrono::NaiveDateTime;
use database::entities::notifications;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(notification: notifications::Model) -> Self {
        Self {
            id: notification.id.to_string(),
            message: notification.message,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}
