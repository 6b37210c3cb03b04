use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::entities::{cart_items, courses};
use database::services::cart::CartService;
use models::policy::{Action, authorize};
use sea_orm::{DatabaseConnection, prelude::Uuid};

use crate::dtos::cart::{AddToCartRequest, CartCourseResponse, CartItemResponse};
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// Get the caller's cart with the course data for each line
pub async fn get_cart(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<CartItemResponse>>, ApiError> {
    authorize(Some(&caller), Action::CartList, None)?;

    let items = CartService::list(&db, &caller).await?;

    Ok(Json(
        items.into_iter().map(convert_to_cart_item_response).collect(),
    ))
}

/// Add a course to the caller's cart, merging into an existing line
pub async fn add_to_cart(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>), ApiError> {
    let line = CartService::add(&db, &caller, payload.course_id, payload.qty).await?;

    Ok((
        StatusCode::CREATED,
        Json(convert_to_cart_item_response(line)),
    ))
}

/// Remove one of the caller's cart lines
pub async fn remove_from_cart(
    State(db): State<DatabaseConnection>,
    CurrentUser(caller): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    CartService::remove(&db, &caller, item_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Helper function to convert a cart line and its course to an API response
fn convert_to_cart_item_response(line: (cart_items::Model, courses::Model)) -> CartItemResponse {
    let (item, course) = line;

    CartItemResponse {
        id: item.id.to_string(),
        qty: item.qty,
        added_on: item.added_on,
        course: CartCourseResponse {
            id: course.id.to_string(),
            title: course.title,
            category: course.category,
            price: course.price,
        },
    }
}
