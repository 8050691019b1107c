use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Per-country geographic taxonomy. The division/district/subdistrict trees
/// are stored as JSON documents and served to clients as-is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub country_code: String,
    pub country_name: String,
    pub country_flag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divisions: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub districts: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdistricts: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
}

/// Listing shape: the taxonomy documents stay out of the countries index.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CountrySummary {
    pub country_code: String,
    pub country_name: String,
    pub country_flag: String,
}

pub async fn list_countries(db: &PgPool) -> Result<Vec<CountrySummary>, sqlx::Error> {
    sqlx::query_as::<_, CountrySummary>(
        r#"
        SELECT country_code, country_name, country_flag
        FROM locations
        ORDER BY country_name
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn get_by_code(db: &PgPool, code: &str) -> Result<Option<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        r#"
        SELECT country_code, country_name, country_flag,
               divisions, districts, subdistricts, created_at
        FROM locations
        WHERE country_code = $1
        "#,
    )
    .bind(code)
    .fetch_optional(db)
    .await
}

pub async fn create(db: &PgPool, loc: &Location) -> Result<Location, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        r#"
        INSERT INTO locations (country_code, country_name, country_flag,
                               divisions, districts, subdistricts)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING country_code, country_name, country_flag,
                  divisions, districts, subdistricts, created_at
        "#,
    )
    .bind(&loc.country_code)
    .bind(&loc.country_name)
    .bind(&loc.country_flag)
    .bind(&loc.divisions)
    .bind(&loc.districts)
    .bind(&loc.subdistricts)
    .fetch_one(db)
    .await
}

pub async fn update(db: &PgPool, code: &str, loc: &Location) -> Result<Option<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        r#"
        UPDATE locations
        SET country_name = $2, country_flag = $3,
            divisions = $4, districts = $5, subdistricts = $6
        WHERE country_code = $1
        RETURNING country_code, country_name, country_flag,
                  divisions, districts, subdistricts, created_at
        "#,
    )
    .bind(code)
    .bind(&loc.country_name)
    .bind(&loc.country_flag)
    .bind(&loc.divisions)
    .bind(&loc.districts)
    .bind(&loc.subdistricts)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM locations WHERE country_code = $1")
        .bind(code)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
