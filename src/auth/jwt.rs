use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::error::AuthError;
use crate::auth::repo::Role;
use crate::state::AppState;

/// Identity claims carried by a signed access token. Verification is
/// stateless: it never touches the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: i64,
    pub identifier: String,
    pub role: Role,
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// HS256 signing material plus the access-token TTL, built once from the
/// startup config and immutable afterwards.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self::new(&jwt.secret, Duration::from_secs(jwt.ttl_minutes.max(0) as u64 * 60))
    }
}

impl JwtKeys {
    pub fn new(secret: &str, access_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
        }
    }

    pub fn sign(&self, user_id: i64, identifier: &str, role: Role) -> Result<String, AuthError> {
        self.sign_with_ttl(
            user_id,
            identifier,
            role,
            TimeDuration::seconds(self.access_ttl.as_secs() as i64),
        )
    }

    fn sign_with_ttl(
        &self,
        user_id: i64,
        identifier: &str,
        role: Role,
        ttl: TimeDuration,
    ) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc();
        let claims = AccessClaims {
            user_id,
            identifier: identifier.to_string(),
            role,
            sub: identifier.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(anyhow::Error::new(e)))?;
        debug!(user_id, "access token signed");
        Ok(token)
    }

    /// All-or-nothing: bad signature, non-HS256 algorithm, expiry, a zero
    /// user id or an empty identifier all collapse to `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        let data = decode::<AccessClaims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims = data.claims;
        if claims.user_id == 0 || claims.identifier.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        debug!(user_id = claims.user_id, "access token verified");
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret", Duration::from_secs(300))
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = keys();
        let token = keys.sign(42, "user@example.com", Role::Client).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.identifier, "user@example.com");
        assert_eq!(claims.role, Role::Client);
        assert_eq!(claims.sub, "user@example.com");
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = keys().sign(1, "a@b.c", Role::Client).expect("sign");
        let other = JwtKeys::new("different-secret", Duration::from_secs(300));
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = keys();
        let token = keys
            .sign_with_ttl(1, "a@b.c", Role::Client, TimeDuration::seconds(-5))
            .expect("sign");
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_zero_user_id() {
        let keys = keys();
        let token = keys.sign(0, "a@b.c", Role::Client).expect("sign");
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_empty_identifier() {
        let keys = keys();
        let token = keys.sign(7, "", Role::Client).expect("sign");
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_foreign_algorithm() {
        // A token that merely claims another algorithm in its header must
        // not pass HS256 validation.
        let keys = keys();
        let token = keys.sign(9, "a@b.c", Role::Provider).expect("sign");
        let mut parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        // {"alg":"none","typ":"JWT"} base64url, unpadded
        let none_header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        parts[0] = none_header;
        let forged = parts.join(".");
        assert!(matches!(keys.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(matches!(
            keys().verify("not-a-jwt"),
            Err(AuthError::InvalidToken)
        ));
    }
}
