use chrono::Utc;
use models::error::{CoreError, Result};
use models::identity::AuthIdentity;
use models::policy::{Action, Owned, authorize};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{cart_items, courses};
use crate::services::fk_violation_as_not_found;

pub struct CartService;

impl CartService {
    /// Put a course in the caller's cart. Adding a course that is already
    /// in the cart raises the line item's quantity instead of creating a
    /// second row.
    pub async fn add(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        course_id: Uuid,
        qty: i32,
    ) -> Result<(cart_items::Model, courses::Model)> {
        if qty < 1 {
            return Err(CoreError::Validation("qty must be at least 1".to_string()));
        }

        authorize(Some(caller), Action::CartAdd, None)?;

        let txn = db.begin().await?;

        let course = courses::Entity::find_by_id(course_id)
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("course"))?;

        let existing = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(caller.id))
            .filter(cart_items::Column::CourseId.eq(course_id))
            .one(&txn)
            .await?;

        let item = match existing {
            Some(item) => {
                let qty = item.qty.checked_add(qty).ok_or_else(|| {
                    CoreError::Validation("qty exceeds the supported range".to_string())
                })?;
                let mut active: cart_items::ActiveModel = item.into();
                active.qty = Set(qty);
                active.update(&txn).await?
            }
            None => {
                let item = cart_items::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(caller.id),
                    course_id: Set(course_id),
                    qty: Set(qty),
                    added_on: Set(Utc::now().naive_utc()),
                };

                item.insert(&txn)
                    .await
                    .map_err(|err| fk_violation_as_not_found(err, "course"))?
            }
        };

        txn.commit().await?;
        Ok((item, course))
    }

    /// The caller's cart with the course data for each line item, in the
    /// order the items were added
    pub async fn list(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
    ) -> Result<Vec<(cart_items::Model, courses::Model)>> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(caller.id))
            .order_by_asc(cart_items::Column::AddedOn)
            .find_also_related(courses::Entity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(item, course)| course.map(|course| (item, course)))
            .collect())
    }

    /// Remove a line item the caller owns
    pub async fn remove(db: &DatabaseConnection, caller: &AuthIdentity, item_id: Uuid) -> Result<()> {
        let item = cart_items::Entity::find_by_id(item_id)
            .one(db)
            .await?
            .ok_or(CoreError::NotFound("cart item"))?;

        authorize(Some(caller), Action::CartRemove, Some(item.owner_id()))?;

        cart_items::Entity::delete_by_id(item.id).exec(db).await?;
        Ok(())
    }
}
