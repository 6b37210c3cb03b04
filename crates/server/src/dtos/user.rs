use database::entities::users;
use models::identity::{AuthIdentity, Role};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            full_name: user.full_name,
            role: user.role,
        }
    }
}

impl From<AuthIdentity> for UserResponse {
    fn from(identity: AuthIdentity) -> Self {
        Self {
            id: identity.id.to_string(),
            email: identity.email,
            full_name: identity.full_name,
            role: identity.role,
        }
    }
}
