pub mod error;
pub mod identity;
pub mod policy;
pub mod rating;
