use thiserror::Error;
use tracing::error;

/// Failure of a single API operation.
///
/// The `Display` output is exactly what the GraphQL client sees, so
/// `Internal` renders without its cause.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Upload(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        let err = err.into();
        error!(error = %err, "internal error");
        Self::Internal(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::internal(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_passed_through() {
        assert_eq!(
            ApiError::validation("Salary must be at least 1000").to_string(),
            "Salary must be at least 1000"
        );
        assert_eq!(ApiError::Auth("Incorrect password.".into()).to_string(), "Incorrect password.");
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = ApiError::from(anyhow::anyhow!("connection refused on 10.0.0.3:5432"));
        assert_eq!(err.to_string(), "Internal server error");
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
