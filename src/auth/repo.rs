use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::info;

use crate::config::IdentifierKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Provider,
    Superadmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Review,
    Suspended,
    Banned,
}

/// User record. Doubles as the session store: the current refresh token and
/// its issue time live on the row. Secrets never serialize into JSON.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub verified: bool,
    pub role: Role,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(skip_serializing)]
    pub google_id: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token_at: Option<OffsetDateTime>,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, verified, role, status, name, avatar, bio, phone, email, \
     password_hash, google_id, refresh_token, refresh_token_at, \
     rating_avg, rating_count, created_at";

fn identifier_column(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Email => "email",
        IdentifierKind::Phone => "phone",
    }
}

impl User {
    /// The identifier this deployment keys password login on.
    pub fn identifier(&self, kind: IdentifierKind) -> String {
        match kind {
            IdentifierKind::Email => self.email.clone().unwrap_or_default(),
            IdentifierKind::Phone => self.phone.clone().unwrap_or_default(),
        }
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(db).await
    }

    pub async fn find_by_identifier(
        db: &PgPool,
        kind: IdentifierKind,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} = $1",
            identifier_column(kind)
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(identifier)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_google_id(
        db: &PgPool,
        google_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE google_id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(google_id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn create_with_password(
        db: &PgPool,
        kind: IdentifierKind,
        identifier: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users ({}, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}",
            identifier_column(kind)
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(identifier)
            .bind(password_hash)
            .fetch_one(db)
            .await
    }

    pub async fn create_with_google(
        db: &PgPool,
        email: &str,
        google_id: &str,
        name: &str,
        avatar: &str,
    ) -> Result<User, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (email, google_id, name, avatar, verified) \
             VALUES ($1, $2, $3, $4, TRUE) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(google_id)
            .bind(name)
            .bind(avatar)
            .fetch_one(db)
            .await
    }

    /// Link a Google identity onto an existing email-registered account.
    /// Marks the account verified and backfills the avatar when empty.
    pub async fn link_google(
        db: &PgPool,
        user_id: i64,
        google_id: &str,
        avatar: &str,
    ) -> Result<User, sqlx::Error> {
        let sql = format!(
            "UPDATE users \
             SET google_id = $2, verified = TRUE, \
                 avatar = COALESCE(NULLIF(avatar, ''), $3) \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(google_id)
            .bind(avatar)
            .fetch_one(db)
            .await
    }

    /// Overwrite the stored refresh token. Token and issue time move
    /// together; the previous session, if any, is silently revoked.
    pub async fn set_refresh_token(
        db: &PgPool,
        user_id: i64,
        token: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET refresh_token = $2, refresh_token_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Single-statement conditional rotation: succeeds only while the stored
    /// token still equals the presented one, so of two concurrent refreshes
    /// exactly one wins and the other sees no matching row.
    pub async fn rotate_refresh_token(
        db: &PgPool,
        old_token: &str,
        new_token: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "UPDATE users SET refresh_token = $2, refresh_token_at = NOW() \
             WHERE refresh_token = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(old_token)
            .bind(new_token)
            .fetch_optional(db)
            .await
    }

    /// Idempotent: clearing an already-clear session is a no-op.
    pub async fn clear_refresh_token(db: &PgPool, user_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET refresh_token = NULL, refresh_token_at = NULL WHERE id = $1",
        )
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(())
    }
}

/// Startup guarantee: exactly one superadmin exists, keyed on the column
/// this deployment uses for password login, with the configured
/// credentials. Creates the row on first boot, updates it afterwards.
pub async fn ensure_superadmin(
    db: &PgPool,
    kind: IdentifierKind,
    identifier: &str,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    let column = identifier_column(kind);
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM users WHERE role = 'superadmin'")
            .fetch_optional(db)
            .await?;

    match existing {
        Some((id,)) => {
            let sql = format!("UPDATE users SET {column} = $1, password_hash = $2 WHERE id = $3");
            sqlx::query(&sql)
                .bind(identifier)
                .bind(password_hash)
                .bind(id)
                .execute(db)
                .await?;
            info!(user_id = id, "superadmin credentials refreshed");
        }
        None => {
            let sql = format!(
                "INSERT INTO users ({column}, password_hash, role, status, verified) \
                 VALUES ($1, $2, 'superadmin', 'active', TRUE)"
            );
            sqlx::query(&sql)
                .bind(identifier)
                .bind(password_hash)
                .execute(db)
                .await?;
            info!("superadmin created");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            verified: true,
            role: Role::Client,
            status: UserStatus::Active,
            name: Some("Test".into()),
            avatar: None,
            bio: None,
            phone: None,
            email: Some("t@example.com".into()),
            password_hash: Some("$argon2id$...".into()),
            google_id: Some("g-123".into()),
            refresh_token: Some("secret-token".into()),
            refresh_token_at: Some(OffsetDateTime::UNIX_EPOCH),
            rating_avg: 4.5,
            rating_count: 12,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn secrets_never_serialize() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("google_id").is_none());
        assert!(json.get("refresh_token").is_none());
        assert!(json.get("refresh_token_at").is_none());
        assert_eq!(json["email"], "t@example.com");
        assert_eq!(json["role"], "client");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("phone").is_none());
        assert!(json.get("avatar").is_none());
    }

    #[test]
    fn identifier_follows_deployment_kind() {
        let user = sample_user();
        assert_eq!(user.identifier(IdentifierKind::Email), "t@example.com");
        assert_eq!(user.identifier(IdentifierKind::Phone), "");
    }

    #[sqlx::test]
    async fn rotated_token_cannot_be_replayed(pool: PgPool) {
        let user =
            User::create_with_password(&pool, IdentifierKind::Email, "r@example.com", "hash")
                .await
                .unwrap();
        User::set_refresh_token(&pool, user.id, "old-token").await.unwrap();

        let winner = User::rotate_refresh_token(&pool, "old-token", "new-token")
            .await
            .unwrap();
        assert_eq!(winner.map(|u| u.id), Some(user.id));

        let replay = User::rotate_refresh_token(&pool, "old-token", "later-token")
            .await
            .unwrap();
        assert!(replay.is_none());
    }

    #[sqlx::test]
    async fn concurrent_rotation_has_exactly_one_winner(pool: PgPool) {
        let user =
            User::create_with_password(&pool, IdentifierKind::Email, "c@example.com", "hash")
                .await
                .unwrap();
        User::set_refresh_token(&pool, user.id, "shared-token").await.unwrap();

        let (a, b) = tokio::join!(
            User::rotate_refresh_token(&pool, "shared-token", "winner-a"),
            User::rotate_refresh_token(&pool, "shared-token", "winner-b"),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(a.is_some() != b.is_some());

        let stored = User::find_by_id(&pool, user.id).await.unwrap().unwrap();
        let token = stored.refresh_token.as_deref();
        assert!(token == Some("winner-a") || token == Some("winner-b"));
    }

    #[sqlx::test]
    async fn clearing_a_session_is_idempotent(pool: PgPool) {
        let user =
            User::create_with_password(&pool, IdentifierKind::Email, "l@example.com", "hash")
                .await
                .unwrap();
        User::set_refresh_token(&pool, user.id, "live-token").await.unwrap();

        User::clear_refresh_token(&pool, user.id).await.unwrap();
        User::clear_refresh_token(&pool, user.id).await.unwrap();

        let stored = User::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert!(stored.refresh_token.is_none());
        assert!(stored.refresh_token_at.is_none());
    }

    #[sqlx::test]
    async fn superadmin_seed_converges_to_one_row(pool: PgPool) {
        ensure_superadmin(&pool, IdentifierKind::Email, "root@example.com", "hash-1")
            .await
            .unwrap();
        ensure_superadmin(&pool, IdentifierKind::Email, "root2@example.com", "hash-2")
            .await
            .unwrap();

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'superadmin'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);

        let admin = User::find_by_email(&pool, "root2@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.password_hash.as_deref(), Some("hash-2"));
    }

    #[sqlx::test]
    async fn superadmin_seed_follows_identifier_kind(pool: PgPool) {
        ensure_superadmin(&pool, IdentifierKind::Phone, "+8801712345678", "hash")
            .await
            .unwrap();

        let admin = User::find_by_identifier(&pool, IdentifierKind::Phone, "+8801712345678")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Superadmin);
        assert!(admin.email.is_none());
    }
}
