use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::dto::{
    AuthenticateRequest, GoogleAuthRequest, RefreshRequest, SessionData, UserData,
};
use crate::auth::error::AuthError;
use crate::auth::extractors::Principal;
use crate::auth::service;
use crate::config::IdentifierKind;
use crate::response;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/authenticate", post(authenticate))
        .route("/auth/google", post(google_authenticate))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .route("/users/:id", get(get_user))
}

fn bad_request(message: &str) -> Response {
    response::fail(StatusCode::BAD_REQUEST, message)
}

#[instrument(skip_all)]
async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<Response, AuthError> {
    let Ok(Json(mut payload)) = payload else {
        return Ok(bad_request("invalid request body"));
    };

    payload.identifier = payload.identifier.trim().to_string();
    if state.config.identifier_kind == IdentifierKind::Email {
        payload.identifier = payload.identifier.to_lowercase();
    }

    if !service::is_valid_identifier(state.config.identifier_kind, &payload.identifier)
        || payload.password.is_empty()
    {
        return Ok(bad_request("identifier and password required"));
    }

    let session = service::authenticate(&state, &payload.identifier, &payload.password).await?;
    info!(user_id = session.user.id, "user logged in");
    Ok(response::ok(
        "login successful",
        SessionData {
            user: session.user,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        },
    ))
}

#[instrument(skip_all)]
async fn google_authenticate(
    State(state): State<AppState>,
    payload: Result<Json<GoogleAuthRequest>, JsonRejection>,
) -> Result<Response, AuthError> {
    let Ok(Json(payload)) = payload else {
        return Ok(bad_request("invalid request body"));
    };

    if payload.id_token.is_empty() || payload.access_token.is_empty() {
        return Ok(bad_request("id_token and access_token required"));
    }

    let session =
        service::authenticate_google(&state, &payload.id_token, &payload.access_token).await?;
    info!(user_id = session.user.id, "user logged in via google");
    Ok(response::ok(
        "login successful",
        SessionData {
            user: session.user,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        },
    ))
}

#[instrument(skip_all)]
async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Response, AuthError> {
    let Ok(Json(payload)) = payload else {
        return Ok(bad_request("invalid request body"));
    };

    let session = service::refresh(&state, &payload.refresh_token).await?;
    info!(user_id = session.user.id, "session refreshed");
    Ok(response::ok(
        "token refreshed successfully",
        SessionData {
            user: session.user,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        },
    ))
}

#[instrument(skip_all, fields(user_id = principal.user_id))]
async fn me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Response, AuthError> {
    let user = service::current_user(&state, principal.user_id).await?;
    Ok(response::ok("current user fetched", UserData { user }))
}

#[instrument(skip_all, fields(user_id = principal.user_id))]
async fn logout(State(state): State<AppState>, principal: Principal) -> Response {
    service::logout(&state, principal.user_id).await;
    response::ok_empty("logout successful")
}

#[instrument(skip_all)]
async fn get_user(
    State(state): State<AppState>,
    _principal: Principal,
    Path(user_id): Path<i64>,
) -> Result<Response, AuthError> {
    match service::user_by_id(&state, user_id).await? {
        Some(user) => Ok(response::ok("user fetched successfully", UserData { user })),
        None => Ok(response::fail(StatusCode::NOT_FOUND, "user not found")),
    }
}
