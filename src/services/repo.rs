use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

const SERVICE_COLUMNS: &str = "id, active, user_id, category_id, subcategory_id, \
     division_id, district_id, subdistrict_id, area, title, caption, description, price, \
     features, hours, days, page_name, page_link, messenger_name, messenger_link, created_at";

/// A service listing, scoped to the geographic taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: i64,
    pub active: bool,
    pub user_id: i64,
    pub category_id: i64,
    pub subcategory_id: i64,
    pub division_id: i32,
    pub district_id: i32,
    pub subdistrict_id: i32,
    pub area: String,
    pub title: String,
    pub caption: String,
    pub description: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    pub days: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messenger_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messenger_link: Option<String>,
    pub created_at: OffsetDateTime,
}

pub async fn create_service(db: &PgPool, s: &Service) -> Result<Service, sqlx::Error> {
    let sql = format!(
        "INSERT INTO services (
            active, user_id, category_id, subcategory_id,
            division_id, district_id, subdistrict_id,
            area, title, caption, description, price,
            features, hours, days,
            page_name, page_link, messenger_name, messenger_link
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19)
        RETURNING {SERVICE_COLUMNS}"
    );
    sqlx::query_as::<_, Service>(&sql)
        .bind(s.active)
        .bind(s.user_id)
        .bind(s.category_id)
        .bind(s.subcategory_id)
        .bind(s.division_id)
        .bind(s.district_id)
        .bind(s.subdistrict_id)
        .bind(&s.area)
        .bind(&s.title)
        .bind(&s.caption)
        .bind(&s.description)
        .bind(&s.price)
        .bind(&s.features)
        .bind(&s.hours)
        .bind(&s.days)
        .bind(&s.page_name)
        .bind(&s.page_link)
        .bind(&s.messenger_name)
        .bind(&s.messenger_link)
        .fetch_one(db)
        .await
}

pub async fn get_service(db: &PgPool, id: i64) -> Result<Option<Service>, sqlx::Error> {
    let sql = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1");
    sqlx::query_as::<_, Service>(&sql).bind(id).fetch_optional(db).await
}

pub async fn update_service(db: &PgPool, s: &Service) -> Result<Service, sqlx::Error> {
    let sql = format!(
        "UPDATE services SET
            active = $2, category_id = $3, subcategory_id = $4,
            division_id = $5, district_id = $6, subdistrict_id = $7,
            area = $8, title = $9, caption = $10, description = $11, price = $12,
            features = $13, hours = $14, days = $15,
            page_name = $16, page_link = $17, messenger_name = $18, messenger_link = $19
        WHERE id = $1
        RETURNING {SERVICE_COLUMNS}"
    );
    sqlx::query_as::<_, Service>(&sql)
        .bind(s.id)
        .bind(s.active)
        .bind(s.category_id)
        .bind(s.subcategory_id)
        .bind(s.division_id)
        .bind(s.district_id)
        .bind(s.subdistrict_id)
        .bind(&s.area)
        .bind(&s.title)
        .bind(&s.caption)
        .bind(&s.description)
        .bind(&s.price)
        .bind(&s.features)
        .bind(&s.hours)
        .bind(&s.days)
        .bind(&s.page_name)
        .bind(&s.page_link)
        .bind(&s.messenger_name)
        .bind(&s.messenger_link)
        .fetch_one(db)
        .await
}

pub async fn delete_service(db: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn filter_services(
    db: &PgPool,
    division_id: i32,
    district_id: i32,
    subdistrict_id: i32,
    category_id: i64,
    subcategory_id: i64,
) -> Result<Vec<Service>, sqlx::Error> {
    let sql = format!(
        "SELECT {SERVICE_COLUMNS} FROM services
         WHERE active
           AND division_id = $1 AND district_id = $2 AND subdistrict_id = $3
           AND category_id = $4 AND subcategory_id = $5
         ORDER BY created_at DESC"
    );
    sqlx::query_as::<_, Service>(&sql)
        .bind(division_id)
        .bind(district_id)
        .bind(subdistrict_id)
        .bind(category_id)
        .bind(subcategory_id)
        .fetch_all(db)
        .await
}
