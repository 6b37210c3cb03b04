pub mod cart;
pub mod course;
pub mod notification;
pub mod rating;
pub mod user;
