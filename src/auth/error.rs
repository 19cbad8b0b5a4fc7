use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::repo::DirectoryError;

/// Failures surfaced by the credential service and the auth routes.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email in use")]
    EmailInUse,

    #[error("user not found")]
    UserNotFound,

    #[error("bad password")]
    BadPassword,

    /// Request body failed validation.
    #[error("{0}")]
    Invalid(String),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::EmailInUse | AuthError::BadPassword | AuthError::Invalid(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DirectoryError> for AuthError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Duplicate => AuthError::EmailInUse,
            DirectoryError::Other(e) => AuthError::Internal(e),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(e) = &self {
            error!(error = ?e, "internal error");
        }
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
