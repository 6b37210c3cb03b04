use chrono::NaiveDateTime;
use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub course_id: Uuid,

    #[serde(default = "default_qty")]
    pub qty: i32,
}

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub id: String,
    pub qty: i32,
    pub added_on: NaiveDateTime,
    pub course: CartCourseResponse,
}

#[derive(Debug, Serialize)]
pub struct CartCourseResponse {
    pub id: String,
    pub title: String,
    pub category: String,
    pub price: f64,
}

fn default_qty() -> i32 {
    1
}
