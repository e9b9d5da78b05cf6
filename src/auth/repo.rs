use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, User};
use crate::db::is_unique_violation;
use crate::error::{ApiError, ApiResult};

pub const USER_EXISTS: &str = "User already exists with that username or email";

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Find a user whose username equals `username` or whose email equals `email`.
    async fn find_by_username_or_email(&self, username: &str, email: &str)
        -> ApiResult<Option<User>>;

    /// Insert a new user. Duplicate username or email is a `Conflict`.
    async fn create(&self, user: NewUser) -> ApiResult<User>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1 OR email = $2
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> ApiResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict(USER_EXISTS)
            } else {
                e.into()
            }
        })
    }
}
