use chrono::Utc;
use models::error::{CoreError, Result};
use models::identity::AuthIdentity;
use models::policy::{Action, authorize};
use models::rating::{self, RateOutcome, RatingValue};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{course_ratings, courses, users};
use crate::services::fk_violation_as_not_found;

pub struct RatingService;

impl RatingService {
    /// Submit the caller's rating for a course. The first submission
    /// creates the record; a repeat submission replaces the stored value
    /// and keeps the original id and submission time.
    pub async fn rate(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        course_id: Uuid,
        value: i16,
    ) -> Result<(RateOutcome, course_ratings::Model)> {
        let value = RatingValue::new(value)?;

        authorize(Some(caller), Action::Rate, None)?;

        let txn = db.begin().await?;

        if courses::Entity::find_by_id(course_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(CoreError::NotFound("course"));
        }

        let existing = course_ratings::Entity::find()
            .filter(course_ratings::Column::CourseId.eq(course_id))
            .filter(course_ratings::Column::UserId.eq(caller.id))
            .one(&txn)
            .await?;
        let outcome = if existing.is_some() {
            RateOutcome::Updated
        } else {
            RateOutcome::Created
        };

        let submission = course_ratings::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course_id),
            user_id: Set(caller.id),
            rating: Set(value.get()),
            created_at: Set(Utc::now().naive_utc()),
        };

        // Upsert on the unique (course_id, user_id) pair
        course_ratings::Entity::insert(submission)
            .on_conflict(
                OnConflict::columns([
                    course_ratings::Column::CourseId,
                    course_ratings::Column::UserId,
                ])
                .update_column(course_ratings::Column::Rating)
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|err| fk_violation_as_not_found(err, "course"))?;

        let stored = course_ratings::Entity::find()
            .filter(course_ratings::Column::CourseId.eq(course_id))
            .filter(course_ratings::Column::UserId.eq(caller.id))
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("course rating after upsert".to_string()))?;

        txn.commit().await?;
        Ok((outcome, stored))
    }

    /// The caller's own rating for the course
    pub async fn get_my_rating(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        course_id: Uuid,
    ) -> Result<course_ratings::Model> {
        if courses::Entity::find_by_id(course_id).one(db).await?.is_none() {
            return Err(CoreError::NotFound("course"));
        }

        course_ratings::Entity::find()
            .filter(course_ratings::Column::CourseId.eq(course_id))
            .filter(course_ratings::Column::UserId.eq(caller.id))
            .one(db)
            .await?
            .ok_or(CoreError::NotFound("rating"))
    }

    /// All ratings for the course with their authors, oldest first
    pub async fn list_ratings(
        db: &DatabaseConnection,
        course_id: Uuid,
    ) -> Result<Vec<(course_ratings::Model, users::Model)>> {
        if courses::Entity::find_by_id(course_id).one(db).await?.is_none() {
            return Err(CoreError::NotFound("course"));
        }

        let rows = course_ratings::Entity::find()
            .filter(course_ratings::Column::CourseId.eq(course_id))
            .order_by_asc(course_ratings::Column::CreatedAt)
            .find_also_related(users::Entity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(row, user)| user.map(|user| (row, user)))
            .collect())
    }

    /// Average of all ratings for the course, 0.0 when there are none
    pub async fn average(db: &DatabaseConnection, course_id: Uuid) -> Result<f64> {
        if courses::Entity::find_by_id(course_id).one(db).await?.is_none() {
            return Err(CoreError::NotFound("course"));
        }

        let values: Vec<i16> = course_ratings::Entity::find()
            .filter(course_ratings::Column::CourseId.eq(course_id))
            .select_only()
            .column(course_ratings::Column::Rating)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rating::average(&values))
    }
}
