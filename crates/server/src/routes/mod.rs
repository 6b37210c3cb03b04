pub mod cart;
pub mod course;
pub mod enrollment;
pub mod health;
pub mod notification;
pub mod rating;
pub mod user;
