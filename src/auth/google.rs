use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::auth::error::AuthError;

const TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";
const PROVIDER_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Claims extracted from a verified Google ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleIdClaims {
    pub aud: String,
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

/// Introspection result for a Google OAuth access token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenInfo {
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub expires_in: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_verified: String,
}

/// Third-party identity verification, behind a trait so handlers can be
/// exercised without network access.
#[async_trait]
pub trait GoogleVerifier: Send + Sync {
    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdClaims, AuthError>;
    async fn verify_access_token(&self, access_token: &str) -> Result<GoogleTokenInfo, AuthError>;
}

pub struct GoogleAuth {
    http: reqwest::Client,
    client_id: String,
    tokeninfo_url: String,
}

impl GoogleAuth {
    pub fn new(client_id: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            client_id,
            tokeninfo_url: TOKENINFO_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_endpoint(http: reqwest::Client, client_id: String, tokeninfo_url: String) -> Self {
        Self {
            http,
            client_id,
            tokeninfo_url,
        }
    }
}

/// A 200 answer whose body never arrives (or arrives over a dying
/// connection) is a provider outage, not a verdict on the token. Only a
/// genuinely undecodable body counts against the token itself.
fn read_failure(e: reqwest::Error, invalid: AuthError) -> AuthError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        warn!(error = %e, "google tokeninfo response read failed");
        AuthError::ProviderUnavailable
    } else {
        invalid
    }
}

/// Audience must match the configured OAuth client id exactly; a token
/// minted for any other application is rejected.
fn check_audience(aud: &str, expected: &str) -> Result<(), AuthError> {
    if expected.is_empty() || aud != expected {
        return Err(AuthError::InvalidIdentityToken);
    }
    Ok(())
}

#[async_trait]
impl GoogleVerifier for GoogleAuth {
    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdClaims, AuthError> {
        let resp = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "google tokeninfo unreachable");
                AuthError::ProviderUnavailable
            })?;

        if !resp.status().is_success() {
            return Err(AuthError::InvalidIdentityToken);
        }

        let claims: GoogleIdClaims = resp
            .json()
            .await
            .map_err(|e| read_failure(e, AuthError::InvalidIdentityToken))?;
        check_audience(&claims.aud, &self.client_id)?;
        if claims.sub.is_empty() || claims.email.is_empty() {
            return Err(AuthError::InvalidIdentityToken);
        }
        Ok(claims)
    }

    async fn verify_access_token(&self, access_token: &str) -> Result<GoogleTokenInfo, AuthError> {
        let resp = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "google tokeninfo unreachable");
                AuthError::ProviderUnavailable
            })?;

        // Any non-success answer means the token is not currently valid.
        if !resp.status().is_success() {
            return Err(AuthError::InvalidAccessToken);
        }

        resp.json()
            .await
            .map_err(|e| read_failure(e, AuthError::InvalidAccessToken))
    }
}
