use axum::{
    Json,
    extract::{Path, State},
};
use database::services::notification::NotificationService;
use models::policy::{Action, authorize};
use sea_orm::{DatabaseConnection, prelude::Uuid};

use crate::dtos::notification::NotificationResponse;
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// Get the caller's notifications, newest first
pub async fn get_notifications(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    authorize(Some(&caller), Action::NotificationList, None)?;

    let inbox = NotificationService::list(&db, &caller).await?;

    Ok(Json(
        inbox.into_iter().map(NotificationResponse::from).collect(),
    ))
}

/// Mark one of the caller's notifications as read
pub async fn mark_notification_read(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification = NotificationService::mark_read(&db, &caller, id).await?;

    Ok(Json(notification.into()))
}
