use serde::Deserialize;

/// Which unique external identifier password login is keyed on.
/// Picked once per deployment, never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Email,
    Phone,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
    /// Informational only: refresh tokens carry no server-side expiry,
    /// they are single-valid via overwrite.
    pub refresh_ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub identifier_kind: IdentifierKind,
    pub google_client_id: String,
    /// Seeded into whichever column `identifier_kind` selects, so the
    /// superadmin can always password-login on this deployment.
    pub superadmin_identifier: String,
    pub superadmin_password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: std::env::var("ACCESS_TOKEN_TTL_MIN")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
            refresh_ttl_days: std::env::var("REFRESH_TOKEN_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        let identifier_kind = match std::env::var("AUTH_IDENTIFIER").as_deref() {
            Ok("phone") => IdentifierKind::Phone,
            _ => IdentifierKind::Email,
        };
        let superadmin_identifier = std::env::var("SUPERADMIN_IDENTIFIER")
            .or_else(|_| std::env::var("SUPERADMIN_EMAIL"))?;
        let superadmin_password = std::env::var("SUPERADMIN_PASSWORD")?;
        Ok(Self {
            database_url,
            jwt,
            identifier_kind,
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            superadmin_identifier,
            superadmin_password,
        })
    }
}
