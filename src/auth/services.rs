use tracing::{info, instrument, warn};

use crate::auth::dto::{LoginRequest, LoginResponse, SignupRequest};
use crate::auth::repo::USER_EXISTS;
use crate::auth::repo_types::{NewUser, User};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation::{is_valid_email, present, INVALID_EMAIL};

pub const MIN_PASSWORD_LEN: usize = 6;

#[instrument(skip(st, req), fields(username = ?req.username))]
pub async fn signup(st: &AppState, req: SignupRequest) -> ApiResult<User> {
    let (Some(username), Some(email), Some(password)) = (
        present(req.username),
        present(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation(
            "Username, email, and password are required",
        ));
    };

    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(ApiError::validation(INVALID_EMAIL));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let email = email.to_lowercase();
    if st
        .users
        .find_by_username_or_email(&username, &email)
        .await?
        .is_some()
    {
        warn!(%username, %email, "username or email already registered");
        return Err(ApiError::conflict(USER_EXISTS));
    }

    let hasher = st.hasher.clone();
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    let user = st
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

#[instrument(skip(st, req), fields(identifier = ?req.username_or_email))]
pub async fn login(st: &AppState, req: LoginRequest) -> ApiResult<LoginResponse> {
    let (Some(identifier), Some(password)) = (
        present(req.username_or_email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation(
            "Username/email and password are required",
        ));
    };

    let user = match st
        .users
        .find_by_username_or_email(&identifier, &identifier.to_lowercase())
        .await?
    {
        Some(u) => u,
        None => {
            warn!(%identifier, "login unknown user");
            return Err(ApiError::not_found(
                "User not found. Invalid username or email.",
            ));
        }
    };

    let hasher = st.hasher.clone();
    let stored = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored)).await??;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Auth("Incorrect password.".into()));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse {
        message: "Login successful".into(),
        user: user.into(),
    })
}
