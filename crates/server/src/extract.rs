use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use models::identity::{AuthIdentity, Role};
use sea_orm::prelude::Uuid;
use serde::Deserialize;

use crate::error::ApiError;

/// Claims the identity provider signs into each access token.
///
/// The resource-server layer validates the signature and attaches these to
/// the request; nothing here is trusted beyond that validation.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    pub sub: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl From<IdentityClaims> for AuthIdentity {
    fn from(claims: IdentityClaims) -> Self {
        AuthIdentity {
            id: claims.sub,
            email: claims.email,
            full_name: claims.full_name,
            role: claims.role,
        }
    }
}

/// The authenticated caller of the current request
pub struct CurrentUser(pub AuthIdentity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<IdentityClaims>()
            .cloned()
            .ok_or_else(ApiError::unauthenticated)?;

        Ok(CurrentUser(claims.into()))
    }
}
