use async_graphql::{SimpleObject, ID};

use crate::auth::repo_types::User;
use crate::validation::rfc3339;

/// Public part of the user returned to the client. Has no password field.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User", rename_fields = "snake_case")]
pub struct PublicUser {
    pub id: ID,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: ID(u.id.to_string()),
            username: u.username,
            email: u.email,
            created_at: rfc3339(u.created_at),
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "AuthPayload")]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Arguments of the `signup` mutation.
#[derive(Debug, Clone, Default)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Arguments of the `login` query.
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub username_or_email: Option<String>,
    pub password: Option<String>,
}
