use axum::Router;
use axum::routing::{delete, get, post};
use database::db::create_connection;
use log::info;
use migration::{Migrator, MigratorTrait};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;

use crate::extract::IdentityClaims;
use crate::routes::{cart, course, enrollment, health, notification, rating, user};
use crate::utils::shutdown::shutdown_signal;

mod dtos;
mod error;
mod extract;
mod routes;
mod utils;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let db = create_connection()
        .await
        .expect("Failed to connect to the database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to apply pending migrations");

    let issuer_url = std::env::var("OIDC_ISSUER_URL").expect("OIDC_ISSUER_URL is not set");
    let oauth2_resource_server = OAuth2ResourceServer::<IdentityClaims>::builder()
        .issuer_url(issuer_url)
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    // Everything except the health probe sits behind token validation.
    let protected = Router::new()
        .route("/user/me", get(user::me))
        .route("/teachers", get(user::get_teachers))
        .route("/teacher/students", get(enrollment::get_taught_students))
        .route(
            "/courses",
            get(course::get_courses).post(course::create_course),
        )
        .route(
            "/courses/{id}",
            get(course::get_course_by_id)
                .put(course::update_course)
                .delete(course::delete_course),
        )
        .route("/courses/{id}/enroll", post(enrollment::enroll_student))
        .route("/courses/{id}/unenroll", post(enrollment::unenroll_student))
        .route("/courses/{id}/rate", post(rating::rate_course))
        .route("/courses/{id}/ratings", get(rating::get_course_ratings))
        .route("/courses/{id}/ratings/me", get(rating::get_my_rating))
        .route("/cart", get(cart::get_cart).post(cart::add_to_cart))
        .route("/cart/{item_id}", delete(cart::remove_from_cart))
        .route("/notifications", get(notification::get_notifications))
        .route(
            "/notifications/{id}/read",
            post(notification::mark_notification_read),
        )
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()));

    let app = Router::new()
        .route("/health", get(health::health))
        .merge(protected)
        .layer(CompressionLayer::new())
        .with_state(db);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    info!("Running axum on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}
