use thiserror::Error;

use crate::policy::{Deny, DenyReason};

/// Failure taxonomy shared by the services and the HTTP layer.
///
/// Storage failures are absorbed into `Internal`; their detail is for the
/// server log, never for the client.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(Deny),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Internal(#[from] sea_orm::DbErr),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<Deny> for CoreError {
    fn from(deny: Deny) -> Self {
        match deny.reason {
            DenyReason::Unauthenticated => CoreError::Unauthenticated,
            DenyReason::NotTeacher | DenyReason::NotOwner => CoreError::Forbidden(deny),
        }
    }
}
