use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::course::{CourseDetail, CourseService};
use models::policy::{Action, authorize};
use sea_orm::{DatabaseConnection, prelude::Uuid};

use crate::dtos::course::{
    CourseResponse, CreateCourseRequest, TeacherResponse, UpdateCourseRequest,
};
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// Get every course with its teacher, roster emails, and average rating
pub async fn get_courses(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    authorize(Some(&caller), Action::CourseList, None)?;

    let details = CourseService::list_courses(&db).await?;

    Ok(Json(
        details.into_iter().map(convert_to_course_response).collect(),
    ))
}

/// Get a specific course by ID
pub async fn get_course_by_id(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    authorize(Some(&caller), Action::CourseGet, None)?;

    let detail = CourseService::get_course(&db, id).await?;

    Ok(Json(convert_to_course_response(detail)))
}

/// Create a course owned by the calling teacher
pub async fn create_course(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let course = CourseService::create_course(
        &db,
        &caller,
        payload.title,
        payload.description,
        payload.category,
        payload.price,
    )
    .await?;

    let detail = CourseService::get_course(&db, course.id).await?;

    Ok((StatusCode::CREATED, Json(convert_to_course_response(detail))))
}

/// Update fields of a course owned by the calling teacher
pub async fn update_course(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    CourseService::update_course(
        &db,
        &caller,
        id,
        payload.title,
        payload.description,
        payload.category,
        payload.price,
    )
    .await?;

    let detail = CourseService::get_course(&db, id).await?;

    Ok(Json(convert_to_course_response(detail)))
}

/// Delete a course owned by the calling teacher along with its dependents
pub async fn delete_course(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    CourseService::delete_course(&db, &caller, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Helper function to convert assembled course data to an API response
fn convert_to_course_response(detail: CourseDetail) -> CourseResponse {
    let (course, teacher, students, average_rating) = detail;

    CourseResponse {
        id: course.id.to_string(),
        title: course.title,
        description: course.description,
        category: course.category,
        price: course.price,
        created_at: course.created_at,
        teacher: TeacherResponse {
            id: teacher.id.to_string(),
            full_name: teacher.full_name,
            email: teacher.email,
        },
        students,
        average_rating,
    }
}
