use std::collections::HashSet;

use chrono::Utc;
use models::error::{CoreError, Result};
use models::identity::{AuthIdentity, Role};
use models::policy::{Action, Owned, authorize, authorize_role};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{courses, enrollments, users};
use crate::services::fk_violation_as_not_found;
use crate::services::notification::NotificationService;
use crate::services::user::UserService;

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enroll the student with the given email into a course owned by the
    /// caller. Re-enrolling an already-enrolled student is a no-op.
    /// Returns the roster after the change.
    pub async fn enroll(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        course_id: Uuid,
        student_email: &str,
    ) -> Result<Vec<users::Model>> {
        authorize_role(Some(caller), Action::Enroll)?;

        let email = student_email.trim();
        if email.is_empty() {
            return Err(CoreError::Validation(
                "student_email must not be empty".to_string(),
            ));
        }

        let txn = db.begin().await?;

        let course = courses::Entity::find_by_id(course_id)
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("course"))?;

        authorize(Some(caller), Action::Enroll, Some(course.owner_id()))?;

        let student = UserService::find_by_email(&txn, email)
            .await?
            .filter(|user| user.role == Role::Student)
            .ok_or(CoreError::NotFound("student"))?;

        let enrollment = enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            course_id: Set(course.id),
            enrolled_at: Set(Utc::now().naive_utc()),
        };

        // The unique (student_id, course_id) index makes re-enrollment a
        // no-op rather than an error or a duplicate row.
        let inserted = enrollments::Entity::insert(enrollment)
            .on_conflict(
                OnConflict::columns([
                    enrollments::Column::StudentId,
                    enrollments::Column::CourseId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|err| fk_violation_as_not_found(err, "course"))?;

        // Only a fresh enrollment notifies the student
        if inserted > 0 {
            NotificationService::notify(
                &txn,
                student.id,
                format!("You have been enrolled in {}", course.title),
            )
            .await?;
        }

        let roster = Self::roster(&txn, course.id).await?;
        txn.commit().await?;
        Ok(roster)
    }

    /// Remove the student with the given email from the roster of a course
    /// owned by the caller. Removing a student who is not enrolled is a
    /// no-op. Returns the roster after the change.
    pub async fn unenroll(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
        course_id: Uuid,
        student_email: &str,
    ) -> Result<Vec<users::Model>> {
        authorize_role(Some(caller), Action::Unenroll)?;

        let email = student_email.trim();
        if email.is_empty() {
            return Err(CoreError::Validation(
                "student_email must not be empty".to_string(),
            ));
        }

        let txn = db.begin().await?;

        let course = courses::Entity::find_by_id(course_id)
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("course"))?;

        authorize(Some(caller), Action::Unenroll, Some(course.owner_id()))?;

        let student = UserService::find_by_email(&txn, email)
            .await?
            .filter(|user| user.role == Role::Student)
            .ok_or(CoreError::NotFound("student"))?;

        enrollments::Entity::delete_many()
            .filter(enrollments::Column::StudentId.eq(student.id))
            .filter(enrollments::Column::CourseId.eq(course.id))
            .exec(&txn)
            .await?;

        let roster = Self::roster(&txn, course.id).await?;
        txn.commit().await?;
        Ok(roster)
    }

    /// Students enrolled in the course, in enrollment order
    pub async fn roster<C: ConnectionTrait>(
        conn: &C,
        course_id: Uuid,
    ) -> Result<Vec<users::Model>> {
        let rows = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .order_by_asc(enrollments::Column::EnrolledAt)
            .find_also_related(users::Entity)
            .all(conn)
            .await?;

        Ok(rows.into_iter().filter_map(|(_, student)| student).collect())
    }

    /// Distinct students enrolled in any course owned by the caller
    pub async fn students_of_teacher(
        db: &DatabaseConnection,
        caller: &AuthIdentity,
    ) -> Result<Vec<users::Model>> {
        authorize(Some(caller), Action::TaughtStudents, None)?;

        let course_ids: Vec<Uuid> = courses::Entity::find()
            .filter(courses::Column::TeacherId.eq(caller.id))
            .select_only()
            .column(courses::Column::Id)
            .into_tuple()
            .all(db)
            .await?;

        if course_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.is_in(course_ids))
            .order_by_asc(enrollments::Column::EnrolledAt)
            .find_also_related(users::Entity)
            .all(db)
            .await?;

        let mut seen = HashSet::new();
        let mut students = Vec::new();
        for (_, student) in rows {
            if let Some(student) = student {
                if seen.insert(student.id) {
                    students.push(student);
                }
            }
        }

        Ok(students)
    }
}
