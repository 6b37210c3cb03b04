mod common;

use common::{seed_course, seed_user, setup_db};
use database::entities::course_ratings;
use database::services::rating::RatingService;
use models::error::CoreError;
use models::identity::Role;
use models::rating::RateOutcome;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

#[tokio::test]
async fn rate_creates_then_updates_a_single_row() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    let (outcome, first) = RatingService::rate(&db, &student, course.id, 5)
        .await
        .expect("first rating");
    assert_eq!(outcome, RateOutcome::Created);
    assert_eq!(first.rating, 5);

    let (outcome, second) = RatingService::rate(&db, &student, course.id, 3)
        .await
        .expect("revised rating");
    assert_eq!(outcome, RateOutcome::Updated);
    assert_eq!(second.rating, 3);

    // The revision replaces the value in place rather than adding a row.
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);

    let stored = course_ratings::Entity::find()
        .filter(course_ratings::Column::CourseId.eq(course.id))
        .count(&db)
        .await
        .expect("count ratings");
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn rate_rejects_values_outside_the_scale() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    for value in [0, 6, -1] {
        let err = RatingService::rate(&db, &student, course.id, value)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    let stored = course_ratings::Entity::find()
        .count(&db)
        .await
        .expect("count ratings");
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn rate_on_missing_course_is_not_found() {
    let db = setup_db().await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;

    let err = RatingService::rate(&db, &student, Uuid::new_v4(), 4)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("course")));
}

#[tokio::test]
async fn any_authenticated_role_may_rate() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let other = seed_user(&db, "Ada Lovelace", "ada@example.edu", Role::Teacher).await;
    let admin = seed_user(&db, "Root Admin", "admin@example.edu", Role::Admin).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    for caller in [&other, &admin] {
        let (outcome, _) = RatingService::rate(&db, caller, course.id, 4)
            .await
            .expect("rating accepted");
        assert_eq!(outcome, RateOutcome::Created);
    }
}

#[tokio::test]
async fn average_is_zero_without_ratings() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    let average = RatingService::average(&db, course.id).await.expect("average");
    assert_eq!(average, 0.0);
}

#[tokio::test]
async fn average_reflects_the_latest_value_per_user() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let alan = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let barbara = seed_user(&db, "Barbara Liskov", "barbara@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    RatingService::rate(&db, &alan, course.id, 4).await.expect("rate");
    RatingService::rate(&db, &barbara, course.id, 5).await.expect("rate");

    let average = RatingService::average(&db, course.id).await.expect("average");
    assert_eq!(average, 4.5);

    RatingService::rate(&db, &alan, course.id, 2).await.expect("re-rate");

    let average = RatingService::average(&db, course.id).await.expect("average");
    assert_eq!(average, 3.5);
}

#[tokio::test]
async fn average_on_missing_course_is_not_found() {
    let db = setup_db().await;

    let err = RatingService::average(&db, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("course")));
}

#[tokio::test]
async fn list_ratings_keeps_submission_order_and_authors() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let alan = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let barbara = seed_user(&db, "Barbara Liskov", "barbara@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    RatingService::rate(&db, &alan, course.id, 4).await.expect("rate");
    RatingService::rate(&db, &barbara, course.id, 5).await.expect("rate");

    let listed = RatingService::list_ratings(&db, course.id)
        .await
        .expect("list ratings");

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].0.rating, 4);
    assert_eq!(listed[0].1.id, alan.id);
    assert_eq!(listed[1].0.rating, 5);
    assert_eq!(listed[1].1.id, barbara.id);
}

#[tokio::test]
async fn my_rating_round_trips_and_absence_is_not_found() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    let err = RatingService::get_my_rating(&db, &student, course.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("rating")));

    RatingService::rate(&db, &student, course.id, 4).await.expect("rate");

    let mine = RatingService::get_my_rating(&db, &student, course.id)
        .await
        .expect("my rating");
    assert_eq!(mine.rating, 4);
    assert_eq!(mine.user_id, student.id);

    // Another user still has no rating of their own here.
    let err = RatingService::get_my_rating(&db, &teacher, course.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("rating")));
}
