pub mod cart_items;
pub mod course_ratings;
pub mod courses;
pub mod enrollments;
pub mod notifications;
pub mod users;
