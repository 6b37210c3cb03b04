use axum::{Json, extract::State};
use database::services::user::UserService;
use models::policy::{Action, authorize};
use sea_orm::DatabaseConnection;

use crate::dtos::user::UserResponse;
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// Get the calling user's identity as the token presented it
pub async fn me(CurrentUser(caller): CurrentUser) -> Result<Json<UserResponse>, ApiError> {
    authorize(Some(&caller), Action::Me, None)?;

    Ok(Json(UserResponse::from(caller)))
}

/// Get the directory of teacher accounts
pub async fn get_teachers(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    authorize(Some(&caller), Action::TeachersList, None)?;

    let teachers = UserService::list_teachers(&db).await?;

    Ok(Json(teachers.into_iter().map(UserResponse::from).collect()))
}
