use models::error::CoreError;
use sea_orm::{DbErr, SqlErr};

pub mod cart;
pub mod course;
pub mod enrollment;
pub mod notification;
pub mod rating;
pub mod user;

/// Converts a foreign-key violation into `NotFound` for `what`.
///
/// A violation at this point means the referenced row vanished between the
/// existence check and the write, so the caller observes the same outcome
/// as if the row had already been gone.
pub(crate) fn fk_violation_as_not_found(err: DbErr, what: &'static str) -> CoreError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => CoreError::NotFound(what),
        _ => CoreError::Internal(err),
    }
}

/// Converts the zero-rows-affected update error into `NotFound` for `what`.
///
/// The row was present when it was loaded, so `RecordNotUpdated` means a
/// concurrent delete won the race and the caller observes the same outcome
/// as an initial miss.
pub(crate) fn record_not_updated_as_not_found(err: DbErr, what: &'static str) -> CoreError {
    match err {
        DbErr::RecordNotUpdated => CoreError::NotFound(what),
        other => CoreError::Internal(other),
    }
}
