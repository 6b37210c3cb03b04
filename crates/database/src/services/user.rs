use models::error::Result;
use models::identity::Role;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::users;

pub struct UserService;

impl UserService {
    /// Look up a user by email, ignoring case
    pub async fn find_by_email<C: ConnectionTrait>(
        conn: &C,
        email: &str,
    ) -> Result<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(users::Column::Email))).eq(email.to_lowercase()),
            )
            .one(conn)
            .await?;

        Ok(user)
    }

    /// All users holding the teacher role
    pub async fn list_teachers(db: &DatabaseConnection) -> Result<Vec<users::Model>> {
        let teachers = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Teacher))
            .order_by_asc(users::Column::FullName)
            .all(db)
            .await?;

        Ok(teachers)
    }
}
