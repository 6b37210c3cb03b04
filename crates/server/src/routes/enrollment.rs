use axum::{
    Json,
    extract::{Path, State},
};
use database::services::enrollment::EnrollmentService;
use sea_orm::{DatabaseConnection, prelude::Uuid};

use crate::dtos::course::EnrollmentRequest;
use crate::dtos::user::UserResponse;
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// Enroll a student by email into the caller's course, returning the roster
pub async fn enroll_student(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EnrollmentRequest>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let roster = EnrollmentService::enroll(&db, &caller, id, &payload.student_email).await?;

    Ok(Json(roster.into_iter().map(UserResponse::from).collect()))
}

/// Remove a student from the caller's course, returning the roster
pub async fn unenroll_student(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EnrollmentRequest>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let roster = EnrollmentService::unenroll(&db, &caller, id, &payload.student_email).await?;

    Ok(Json(roster.into_iter().map(UserResponse::from).collect()))
}

/// Get the distinct students enrolled across every course the caller teaches
pub async fn get_taught_students(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let students = EnrollmentService::students_of_teacher(&db, &caller).await?;

    Ok(Json(students.into_iter().map(UserResponse::from).collect()))
}
