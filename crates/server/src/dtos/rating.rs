use chrono::NaiveDateTime;
use database::entities::course_ratings;
use serde::{Deserialize, Serialize};

use crate::dtos::user::UserResponse;

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i16,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub id: String,
    pub course_id: String,
    pub rating: i16,
    pub created_at: NaiveDateTime,
}

impl From<course_ratings::Model> for RatingResponse {
    fn from(rating: course_ratings::Model) -> Self {
        Self {
            id: rating.id.to_string(),
            course_id: rating.course_id.to_string(),
            rating: rating.rating,
            created_at: rating.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthoredRatingResponse {
    pub id: String,
    pub rating: i16,
    pub created_at: NaiveDateTime,
    pub author: UserResponse,
}
