use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, PublicUser},
        error::AuthError,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

/// Reports unparseable, missing or mistyped fields as a 400 with a JSON body.
fn parse_body(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, AuthError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            warn!(status = %rejection.status(), "rejected request body");
            Err(AuthError::Invalid(rejection.body_text()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), AuthError> {
    let payload = parse_body(payload)?.validated()?;

    let user = match state.credentials.signup(&payload.email, &payload.password).await {
        Ok(u) => u,
        Err(AuthError::EmailInUse) => {
            warn!(email = %payload.email, "email already registered");
            return Err(AuthError::EmailInUse);
        }
        Err(e) => return Err(e),
    };

    info!(user_id = user.id, "user signed up");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AuthError> {
    let payload = parse_body(payload)?.validated()?;

    let user = match state.credentials.signin(&payload.email, &payload.password).await {
        Ok(u) => u,
        Err(AuthError::UserNotFound) => {
            warn!(email = %payload.email, "signin unknown email");
            return Err(AuthError::UserNotFound);
        }
        Err(e) => return Err(e),
    };

    info!(user_id = user.id, "user signed in");
    Ok(Json(user.into()))
}
