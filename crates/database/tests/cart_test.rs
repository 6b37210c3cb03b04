mod common;

use common::{assert_forbidden, seed_course, seed_user, setup_db};
use database::entities::cart_items;
use database::services::cart::CartService;
use models::error::CoreError;
use models::identity::Role;
use models::policy::DenyReason;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

#[tokio::test]
async fn add_creates_a_line_item_for_the_caller() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    let (item, listed_course) = CartService::add(&db, &student, course.id, 2)
        .await
        .expect("add to cart");

    assert_eq!(item.user_id, student.id);
    assert_eq!(item.course_id, course.id);
    assert_eq!(item.qty, 2);
    assert_eq!(listed_course.id, course.id);
}

#[tokio::test]
async fn adding_the_same_course_merges_into_one_line() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    let (first, _) = CartService::add(&db, &student, course.id, 1)
        .await
        .expect("first add");
    let (second, _) = CartService::add(&db, &student, course.id, 2)
        .await
        .expect("second add");

    assert_eq!(second.id, first.id);
    assert_eq!(second.qty, 3);

    let stored = cart_items::Entity::find()
        .filter(cart_items::Column::UserId.eq(student.id))
        .count(&db)
        .await
        .expect("count cart items");
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn merging_quantities_never_overflows() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    CartService::add(&db, &student, course.id, i32::MAX)
        .await
        .expect("add at the quantity ceiling");

    let err = CartService::add(&db, &student, course.id, 2).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    // The stored line keeps its quantity.
    let listed = CartService::list(&db, &student).await.expect("list cart");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0.qty, i32::MAX);
}

#[tokio::test]
async fn add_rejects_non_positive_quantities() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    for qty in [0, -3] {
        let err = CartService::add(&db, &student, course.id, qty)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}

#[tokio::test]
async fn add_on_missing_course_is_not_found() {
    let db = setup_db().await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;

    let err = CartService::add(&db, &student, Uuid::new_v4(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("course")));
}

#[tokio::test]
async fn list_is_scoped_to_the_caller() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let alan = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let barbara = seed_user(&db, "Barbara Liskov", "barbara@example.edu", Role::Student).await;
    let compilers = seed_course(&db, &teacher, "Compilers").await;
    let databases = seed_course(&db, &teacher, "Databases").await;

    CartService::add(&db, &alan, compilers.id, 1).await.expect("add");
    CartService::add(&db, &alan, databases.id, 1).await.expect("add");
    CartService::add(&db, &barbara, compilers.id, 1).await.expect("add");

    let listed = CartService::list(&db, &alan).await.expect("list alan's cart");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|(item, _)| item.user_id == alan.id));

    let titles: Vec<&str> = listed
        .iter()
        .map(|(_, course)| course.title.as_str())
        .collect();
    assert_eq!(titles, ["Compilers", "Databases"]);

    let listed = CartService::list(&db, &barbara).await.expect("list barbara's cart");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn remove_deletes_the_caller_own_line() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    let (item, _) = CartService::add(&db, &student, course.id, 1)
        .await
        .expect("add to cart");

    CartService::remove(&db, &student, item.id).await.expect("remove");

    let listed = CartService::list(&db, &student).await.expect("list cart");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn remove_refuses_other_users_lines() {
    let db = setup_db().await;
    let teacher = seed_user(&db, "Grace Hopper", "grace@example.edu", Role::Teacher).await;
    let owner = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;
    let other = seed_user(&db, "Barbara Liskov", "barbara@example.edu", Role::Student).await;
    let admin = seed_user(&db, "Root Admin", "admin@example.edu", Role::Admin).await;
    let course = seed_course(&db, &teacher, "Compilers").await;

    let (item, _) = CartService::add(&db, &owner, course.id, 1)
        .await
        .expect("add to cart");

    for caller in [&other, &admin] {
        let err = CartService::remove(&db, caller, item.id).await.unwrap_err();
        assert_forbidden(err, DenyReason::NotOwner);
    }

    let listed = CartService::list(&db, &owner).await.expect("list cart");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn remove_missing_line_is_not_found() {
    let db = setup_db().await;
    let student = seed_user(&db, "Alan Kay", "alan@example.edu", Role::Student).await;

    let err = CartService::remove(&db, &student, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("cart item")));
}
