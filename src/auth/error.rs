use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::response;

/// Failure taxonomy for the auth subsystem. Everything credential-shaped
/// collapses to a generic 401 at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("invalid or expired access token")]
    InvalidToken,
    #[error("invalid identity token")]
    InvalidIdentityToken,
    #[error("invalid provider access token")]
    InvalidAccessToken,
    #[error("identity provider unavailable")]
    ProviderUnavailable,
    #[error("entropy source failure")]
    EntropySource(#[source] rand::Error),
    #[error("session store timed out")]
    StoreUnavailable,
    #[error("session store error")]
    Store(#[from] sqlx::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid credentials"),
            AuthError::InvalidRefreshToken => (StatusCode::UNAUTHORIZED, "invalid refresh token"),
            AuthError::InvalidToken
            | AuthError::InvalidIdentityToken
            | AuthError::InvalidAccessToken => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AuthError::ProviderUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "identity provider unavailable")
            }
            AuthError::StoreUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "try again later"),
            AuthError::EntropySource(_) | AuthError::Store(_) | AuthError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        if status.is_server_error() {
            error!(error = %self, "auth failure");
        } else {
            warn!(error = %self, "auth rejection");
        }

        response::fail(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_map_to_401() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::InvalidRefreshToken,
            AuthError::InvalidToken,
            AuthError::InvalidIdentityToken,
            AuthError::InvalidAccessToken,
        ] {
            let res = err.into_response();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn unavailability_is_distinct_from_rejection() {
        let res = AuthError::ProviderUnavailable.into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let res = AuthError::StoreUnavailable.into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
