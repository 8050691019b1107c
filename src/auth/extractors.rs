use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::auth::error::AuthError;
use crate::auth::jwt::JwtKeys;
use crate::auth::repo::Role;

/// Authenticated identity attached to a request after bearer-token
/// verification. Handlers receive it as a typed parameter; nothing is
/// stashed in untyped request extensions.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: i64,
    pub identifier: String,
    pub role: Role,
}

impl Principal {
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    // Every failure, from a missing header to a bad signature, is the same
    // uniform 401 with no distinguishing detail.
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::InvalidToken)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(AuthError::InvalidToken)?
            .trim();

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token)?;

        Ok(Principal {
            user_id: claims.user_id,
            identifier: claims.identifier,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn extracts_principal_from_valid_bearer() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state)
            .sign(42, "t@example.com", Role::Provider)
            .unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let principal = Principal::from_request_parts(&mut parts, &state)
            .await
            .expect("principal");
        assert_eq!(principal.user_id, 42);
        assert_eq!(principal.identifier, "t@example.com");
        assert_eq!(principal.role, Role::Provider);
        assert!(!principal.is_superadmin());
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = Principal::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let err = Principal::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state)
            .sign(1, "t@example.com", Role::Client)
            .unwrap();
        let mut tampered = token;
        tampered.push('x');
        let mut parts = parts_with_auth(Some(&format!("Bearer {tampered}")));
        let err = Principal::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
