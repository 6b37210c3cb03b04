use std::collections::HashMap;

use chrono::Utc;
use futures::try_join;
use models::error::{CoreError, Result};
use models::identity::AuthIdentity;
use models::policy::{Action, Owned, authorize, authorize_role};
use models::rating;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{cart_items, course_ratings, courses, enrollments, users};
use crate::services::record_not_updated_as_not_found;

/// A course together with its teacher, enrolled student emails, and
/// average rating
pub type CourseDetail = (courses::Model, users::Model, Vec<String>, f64);

pub struct CourseService;

impl CourseService {
    /// Create a course owned by the caller
    pub async fn create_course(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        title: String,
        description: String,
        category: String,
        price: f64,
    ) -> Result<courses::Model> {
        authorize(Some(caller), Action::CourseCreate, None)?;

        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::Validation("title must not be empty".to_string()));
        }

        // The course is always bound to the caller; a client-supplied
        // teacher id is never trusted.
        let course = courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            category: Set(category),
            price: Set(price),
            teacher_id: Set(caller.id),
            created_at: Set(Utc::now().naive_utc()),
        };

        Ok(course.insert(db).await?)
    }

    pub async fn get_course(db: &DatabaseConnection, course_id: Uuid) -> Result<CourseDetail> {
        let course = courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(CoreError::NotFound("course"))?;

        let mut details = Self::assemble_details(db, vec![course]).await?;
        details.pop().ok_or(CoreError::NotFound("course"))
    }

    pub async fn list_courses(db: &DatabaseConnection) -> Result<Vec<CourseDetail>> {
        let courses = courses::Entity::find()
            .order_by_asc(courses::Column::CreatedAt)
            .all(db)
            .await?;

        Self::assemble_details(db, courses).await
    }

    /// Attach teacher, roster emails, and average rating to each course
    async fn assemble_details(
        db: &DatabaseConnection,
        courses: Vec<courses::Model>,
    ) -> Result<Vec<CourseDetail>> {
        if courses.is_empty() {
            return Ok(vec![]);
        }

        let course_ids: Vec<Uuid> = courses.iter().map(|course| course.id).collect();
        let teacher_ids: Vec<Uuid> = courses.iter().map(|course| course.teacher_id).collect();

        let (teachers, enrollment_rows, rating_rows) = try_join!(
            users::Entity::find()
                .filter(users::Column::Id.is_in(teacher_ids))
                .all(db),
            enrollments::Entity::find()
                .filter(enrollments::Column::CourseId.is_in(course_ids.clone()))
                .order_by_asc(enrollments::Column::EnrolledAt)
                .find_also_related(users::Entity)
                .all(db),
            course_ratings::Entity::find()
                .filter(course_ratings::Column::CourseId.is_in(course_ids))
                .all(db),
        )?;

        // Build lookup maps
        let teachers_by_id: HashMap<Uuid, users::Model> = teachers
            .into_iter()
            .map(|teacher| (teacher.id, teacher))
            .collect();

        let mut emails_by_course: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (enrollment, student) in enrollment_rows {
            if let Some(student) = student {
                emails_by_course
                    .entry(enrollment.course_id)
                    .or_default()
                    .push(student.email);
            }
        }

        let mut ratings_by_course: HashMap<Uuid, Vec<i16>> = HashMap::new();
        for row in rating_rows {
            ratings_by_course
                .entry(row.course_id)
                .or_default()
                .push(row.rating);
        }

        let mut details = Vec::new();
        for course in courses {
            // Teachers can own several courses, so the lookup map is not
            // consumed.
            let teacher = match teachers_by_id.get(&course.teacher_id) {
                Some(teacher) => teacher.clone(),
                None => continue,
            };

            let students = emails_by_course.remove(&course.id).unwrap_or_default();
            let values = ratings_by_course.remove(&course.id).unwrap_or_default();
            let average_rating = rating::average(&values);

            details.push((course, teacher, students, average_rating));
        }

        Ok(details)
    }

    /// Apply the given changes to a course owned by the caller
    pub async fn update_course(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        course_id: Uuid,
        title: Option<String>,
        description: Option<String>,
        category: Option<String>,
        price: Option<f64>,
    ) -> Result<courses::Model> {
        // The role refusal comes before the lookup, so non-teachers learn
        // nothing about which course ids exist.
        authorize_role(Some(caller), Action::CourseUpdate)?;

        let course = courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(CoreError::NotFound("course"))?;

        authorize(Some(caller), Action::CourseUpdate, Some(course.owner_id()))?;

        let mut active: courses::ActiveModel = course.clone().into();
        let mut changed = false;

        if let Some(title) = title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(CoreError::Validation("title must not be empty".to_string()));
            }
            active.title = Set(title);
            changed = true;
        }
        if let Some(description) = description {
            active.description = Set(description);
            changed = true;
        }
        if let Some(category) = category {
            active.category = Set(category);
            changed = true;
        }
        if let Some(price) = price {
            active.price = Set(price);
            changed = true;
        }

        if !changed {
            return Ok(course);
        }

        active
            .update(db)
            .await
            .map_err(|err| record_not_updated_as_not_found(err, "course"))
    }

    /// Delete a course owned by the caller along with everything that
    /// references it
    pub async fn delete_course(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        course_id: Uuid,
    ) -> Result<()> {
        authorize_role(Some(caller), Action::CourseDelete)?;

        let txn = db.begin().await?;

        let course = courses::Entity::find_by_id(course_id)
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("course"))?;

        authorize(Some(caller), Action::CourseDelete, Some(course.owner_id()))?;

        // Dependent rows go first; the FK cascade at the store remains the
        // backstop for writers racing this transaction.
        enrollments::Entity::delete_many()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .exec(&txn)
            .await?;
        course_ratings::Entity::delete_many()
            .filter(course_ratings::Column::CourseId.eq(course_id))
            .exec(&txn)
            .await?;
        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CourseId.eq(course_id))
            .exec(&txn)
            .await?;
        courses::Entity::delete_by_id(course_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
