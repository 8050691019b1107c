use serde::{Deserialize, Serialize};

use crate::auth::repo::User;

/// Body for password login.
#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    pub identifier: String,
    pub password: String,
}

/// Body for Google OAuth login.
#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
    pub id_token: String,
    pub access_token: String,
}

/// Body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Payload of a successful login or refresh.
#[derive(Debug, Serialize)]
pub struct SessionData {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::{Role, UserStatus};
    use time::OffsetDateTime;

    #[test]
    fn session_data_never_leaks_password_material() {
        let data = SessionData {
            user: User {
                id: 1,
                verified: false,
                role: Role::Client,
                status: UserStatus::Review,
                name: None,
                avatar: None,
                bio: None,
                phone: Some("+8801712345678".into()),
                email: None,
                password_hash: Some("$argon2id$hash".into()),
                google_id: None,
                refresh_token: Some("stored".into()),
                refresh_token_at: Some(OffsetDateTime::UNIX_EPOCH),
                rating_avg: 0.0,
                rating_count: 0,
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
            access_token: "header.payload.sig".into(),
            refresh_token: "opaque".into(),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(!json["access_token"].as_str().unwrap().is_empty());
        assert!(!json["refresh_token"].as_str().unwrap().is_empty());
        assert!(json["user"].get("password_hash").is_none());
        assert!(json["user"].get("refresh_token").is_none());
    }
}
