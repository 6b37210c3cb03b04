#![allow(dead_code)]

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use models::error::CoreError;
use models::identity::{AuthIdentity, Role};
use models::policy::DenyReason;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use database::entities::{courses, users};
use database::services::course::CourseService;

/// In-memory database with the full schema applied. A single connection
/// keeps the database alive across queries.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");

    Migrator::up(&db, None).await.expect("apply schema");

    db
}

/// Provision an account the way the external identity service would
pub async fn seed_user(
    db: &DatabaseConnection,
    full_name: &str,
    email: &str,
    role: Role,
) -> AuthIdentity {
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        full_name: Set(full_name.to_string()),
        role: Set(role),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .expect("insert user");

    user.into()
}

pub async fn seed_course(
    db: &DatabaseConnection,
    teacher: &AuthIdentity,
    title: &str,
) -> courses::Model {
    CourseService::create_course(
        db,
        teacher,
        title.to_string(),
        format!("All about {title}"),
        "General".to_string(),
        49.99,
    )
    .await
    .expect("create course")
}

pub fn assert_forbidden(err: CoreError, expected: DenyReason) {
    match err {
        CoreError::Forbidden(deny) => assert_eq!(deny.reason, expected),
        other => panic!("expected forbidden {expected}, got {other:?}"),
    }
}
