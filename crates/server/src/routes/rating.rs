use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::rating::RatingService;
use models::policy::{Action, authorize};
use models::rating::RateOutcome;
use sea_orm::{DatabaseConnection, prelude::Uuid};

use crate::dtos::rating::{AuthoredRatingResponse, RateRequest, RatingResponse};
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// Submit or revise the caller's rating for a course.
///
/// A first submission answers 201, a revision answers 200.
pub async fn rate_course(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateRequest>,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
    let (outcome, rating) = RatingService::rate(&db, &caller, id, payload.rating).await?;

    let status = match outcome {
        RateOutcome::Created => StatusCode::CREATED,
        RateOutcome::Updated => StatusCode::OK,
    };

    Ok((status, Json(RatingResponse::from(rating))))
}

/// Get a course's ratings in submission order, each with its author
pub async fn get_course_ratings(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AuthoredRatingResponse>>, ApiError> {
    authorize(Some(&caller), Action::RatingList, None)?;

    let ratings = RatingService::list_ratings(&db, id).await?;

    let responses = ratings
        .into_iter()
        .map(|(rating, author)| AuthoredRatingResponse {
            id: rating.id.to_string(),
            rating: rating.rating,
            created_at: rating.created_at,
            author: author.into(),
        })
        .collect();

    Ok(Json(responses))
}

/// Get the caller's own rating for a course
pub async fn get_my_rating(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RatingResponse>, ApiError> {
    authorize(Some(&caller), Action::RatingGet, None)?;

    let rating = RatingService::get_my_rating(&db, &caller, id).await?;

    Ok(Json(rating.into()))
}
