use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use models::error::CoreError;
use models::policy::Deny;
use serde::Serialize;

/// Wire shape of every failure: a stable machine-readable code plus a
/// human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorBody {
                code: "unauthenticated",
                message: "authentication required".to_string(),
            },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let (status, code) = match &err {
            CoreError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            CoreError::Forbidden(deny) => (StatusCode::FORBIDDEN, deny.reason.as_str()),
            CoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            CoreError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            CoreError::Internal(source) => {
                // The source stays in the server log; the client only ever
                // sees an opaque failure.
                log::error!("request failed: {source}");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: ErrorBody {
                        code: "internal_error",
                        message: "internal server error".to_string(),
                    },
                };
            }
        };

        Self {
            status,
            body: ErrorBody {
                code,
                message: err.to_string(),
            },
        }
    }
}

impl From<Deny> for ApiError {
    fn from(deny: Deny) -> Self {
        CoreError::from(deny).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
