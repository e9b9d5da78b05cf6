use async_graphql::{Context, Object, Result};

use crate::auth::dto::{LoginRequest, LoginResponse, PublicUser, SignupRequest};
use crate::auth::services;
use crate::state::AppState;

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// Log in with a username or email plus password.
    async fn login(
        &self,
        ctx: &Context<'_>,
        username_or_email: Option<String>,
        password: Option<String>,
    ) -> Result<LoginResponse> {
        let st = ctx.data::<AppState>()?;
        let req = LoginRequest {
            username_or_email,
            password,
        };
        Ok(services::login(st, req).await?)
    }
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Create a new account.
    async fn signup(
        &self,
        ctx: &Context<'_>,
        username: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<PublicUser> {
        let st = ctx.data::<AppState>()?;
        let req = SignupRequest {
            username,
            email,
            password,
        };
        Ok(services::signup(st, req).await?.into())
    }
}
