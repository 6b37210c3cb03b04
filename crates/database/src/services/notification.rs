use chrono::Utc;
use models::error::{CoreError, Result};
use models::identity::AuthIdentity;
use models::policy::{Action, Owned, authorize};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::notifications;
use crate::services::{fk_violation_as_not_found, record_not_updated_as_not_found};

pub struct NotificationService;

impl NotificationService {
    /// Record a notification for a user. Business events call this; there
    /// is no external write path.
    pub async fn notify<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        message: String,
    ) -> Result<notifications::Model> {
        let notification = notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            message: Set(message),
            is_read: Set(false),
            created_at: Set(Utc::now().naive_utc()),
        };

        notification
            .insert(conn)
            .await
            .map_err(|err| fk_violation_as_not_found(err, "user"))
    }

    /// The caller's notifications, newest first
    pub async fn list(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
    ) -> Result<Vec<notifications::Model>> {
        let rows = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(caller.id))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(rows)
    }

    /// Mark one of the caller's notifications as read. Marking an
    /// already-read notification succeeds without change.
    pub async fn mark_read(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        notification_id: Uuid,
    ) -> Result<notifications::Model> {
        let notification = notifications::Entity::find_by_id(notification_id)
            .one(db)
            .await?
            .ok_or(CoreError::NotFound("notification"))?;

        authorize(
            Some(caller),
            Action::NotificationMarkRead,
            Some(notification.owner_id()),
        )?;

        if notification.is_read {
            return Ok(notification);
        }

        let mut active: notifications::ActiveModel = notification.into();
        active.is_read = Set(true);
        active
            .update(db)
            .await
            .map_err(|err| record_not_updated_as_not_found(err, "notification"))
    }
}
