use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubCategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

pub async fn create_category(
    db: &PgPool,
    name: &str,
    description: &str,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(db)
    .await
}

pub async fn update_category(
    db: &PgPool,
    id: i64,
    name: &str,
    description: &str,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = $2, description = $3
        WHERE id = $1
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_optional(db)
    .await
}

pub async fn delete_category(db: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_categories(db: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, description, created_at
        FROM categories
        ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn create_subcategory(
    db: &PgPool,
    category_id: i64,
    name: &str,
    description: &str,
) -> Result<SubCategory, sqlx::Error> {
    sqlx::query_as::<_, SubCategory>(
        r#"
        INSERT INTO sub_categories (category_id, name, description)
        VALUES ($1, $2, $3)
        RETURNING id, category_id, name, description, created_at
        "#,
    )
    .bind(category_id)
    .bind(name)
    .bind(description)
    .fetch_one(db)
    .await
}

pub async fn update_subcategory(
    db: &PgPool,
    id: i64,
    category_id: i64,
    name: &str,
    description: &str,
) -> Result<Option<SubCategory>, sqlx::Error> {
    sqlx::query_as::<_, SubCategory>(
        r#"
        UPDATE sub_categories
        SET category_id = $2, name = $3, description = $4
        WHERE id = $1
        RETURNING id, category_id, name, description, created_at
        "#,
    )
    .bind(id)
    .bind(category_id)
    .bind(name)
    .bind(description)
    .fetch_optional(db)
    .await
}

pub async fn delete_subcategory(db: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sub_categories WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_subcategories(db: &PgPool) -> Result<Vec<SubCategory>, sqlx::Error> {
    sqlx::query_as::<_, SubCategory>(
        r#"
        SELECT id, category_id, name, description, created_at
        FROM sub_categories
        ORDER BY category_id, name
        "#,
    )
    .fetch_all(db)
    .await
}
