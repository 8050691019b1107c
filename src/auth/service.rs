use std::future::Future;
use std::time::Duration;

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::error::AuthError;
use crate::auth::google::GoogleIdClaims;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;
use crate::auth::token::generate_refresh_token;
use crate::config::IdentifierKind;
use crate::state::AppState;

const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Session material returned from login and refresh.
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{6,15}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

pub(crate) fn is_valid_identifier(kind: IdentifierKind, identifier: &str) -> bool {
    match kind {
        IdentifierKind::Email => is_valid_email(identifier),
        IdentifierKind::Phone => is_valid_phone(identifier),
    }
}

/// Every session-store round trip is bounded; an elapsed timeout is an
/// availability failure, never retried within the request.
async fn store<T, F>(fut: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(res) => res.map_err(AuthError::Store),
        Err(_) => Err(AuthError::StoreUnavailable),
    }
}

/// Mint a fresh token pair for `user`. The refresh-token write completes
/// before any token leaves this function: a client never holds a token that
/// was not durably stored first.
async fn issue_session(state: &AppState, user: User) -> Result<Session, AuthError> {
    let refresh_token = generate_refresh_token()?;
    store(User::set_refresh_token(&state.db, user.id, &refresh_token)).await?;

    let mut identifier = user.identifier(state.config.identifier_kind);
    if identifier.is_empty() {
        identifier = user.email.clone().unwrap_or_default();
    }
    let access_token = JwtKeys::from_ref(state).sign(user.id, &identifier, user.role)?;

    Ok(Session {
        user,
        access_token,
        refresh_token,
    })
}

/// Password login, self-registering variant: an unknown identifier creates
/// the account. A known identifier with a non-matching password (including
/// an OAuth-only account with no stored hash) fails with the same
/// `InvalidCredentials` in every case.
pub async fn authenticate(
    state: &AppState,
    identifier: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let kind = state.config.identifier_kind;

    let user = match store(User::find_by_identifier(&state.db, kind, identifier)).await? {
        Some(user) => {
            let ok = verify_password(password, user.password_hash.as_deref().unwrap_or(""));
            if !ok {
                return Err(AuthError::InvalidCredentials);
            }
            user
        }
        None => {
            let hash = hash_password(password)?;
            let user = store(User::create_with_password(&state.db, kind, identifier, &hash)).await?;
            info!(user_id = user.id, "account self-registered on first login");
            user
        }
    };

    issue_session(state, user).await
}

/// OAuth login. Both provider tokens must verify before any row is read or
/// written. Account resolution: by google_id, else by claimed email (links
/// the Google identity), else a fresh account from the claims.
pub async fn authenticate_google(
    state: &AppState,
    id_token: &str,
    access_token: &str,
) -> Result<Session, AuthError> {
    let claims: GoogleIdClaims = state.google.verify_id_token(id_token).await?;
    state.google.verify_access_token(access_token).await?;

    let user = match store(User::find_by_google_id(&state.db, &claims.sub)).await? {
        Some(user) => user,
        None => match store(User::find_by_email(&state.db, &claims.email)).await? {
            Some(existing) => {
                let user = store(User::link_google(
                    &state.db,
                    existing.id,
                    &claims.sub,
                    &claims.picture,
                ))
                .await?;
                info!(user_id = user.id, "google identity linked to existing account");
                user
            }
            None => {
                let user = store(User::create_with_google(
                    &state.db,
                    &claims.email,
                    &claims.sub,
                    &claims.name,
                    &claims.picture,
                ))
                .await?;
                info!(user_id = user.id, "account created from google identity");
                user
            }
        },
    };

    issue_session(state, user).await
}

/// Single-use rotation. The conditional UPDATE is the whole lookup: if the
/// presented token no longer matches a row, someone already rotated it and
/// the caller must log in again.
pub async fn refresh(state: &AppState, old_token: &str) -> Result<Session, AuthError> {
    let new_token = generate_refresh_token()?;

    let user = store(User::rotate_refresh_token(&state.db, old_token, &new_token))
        .await?
        .ok_or(AuthError::InvalidRefreshToken)?;

    let mut identifier = user.identifier(state.config.identifier_kind);
    if identifier.is_empty() {
        identifier = user.email.clone().unwrap_or_default();
    }
    let access_token = JwtKeys::from_ref(state).sign(user.id, &identifier, user.role)?;

    Ok(Session {
        user,
        access_token,
        refresh_token: new_token,
    })
}

/// The account behind an already-verified access token. A vanished row
/// invalidates the caller's session rather than surfacing detail.
pub async fn current_user(state: &AppState, user_id: i64) -> Result<User, AuthError> {
    store(User::find_by_id(&state.db, user_id))
        .await?
        .ok_or(AuthError::InvalidToken)
}

pub async fn user_by_id(state: &AppState, user_id: i64) -> Result<Option<User>, AuthError> {
    store(User::find_by_id(&state.db, user_id)).await
}

/// Best-effort and idempotent: a failed clear is logged but the client is
/// still told logout succeeded.
pub async fn logout(state: &AppState, user_id: i64) {
    if let Err(e) = store(User::clear_refresh_token(&state.db, user_id)).await {
        warn!(error = %e, user_id, "logout: clearing refresh token failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a @b.co"));
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("+8801712345678"));
        assert!(is_valid_phone("01712345678"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+880-171"));
    }

    #[test]
    fn identifier_validation_follows_kind() {
        assert!(is_valid_identifier(IdentifierKind::Email, "a@b.co"));
        assert!(!is_valid_identifier(IdentifierKind::Email, "+8801712345678"));
        assert!(is_valid_identifier(IdentifierKind::Phone, "+8801712345678"));
        assert!(!is_valid_identifier(IdentifierKind::Phone, "a@b.co"));
    }
}
