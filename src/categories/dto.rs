use serde::{Deserialize, Serialize};

use crate::categories::repo::{Category, SubCategory};

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct SubCategoryRequest {
    pub category_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryData {
    pub category: Category,
}

#[derive(Debug, Serialize)]
pub struct SubCategoryData {
    pub subcategory: SubCategory,
}

/// Combined listing consumed by the client's browse screen.
#[derive(Debug, Serialize)]
pub struct TaxonomyData {
    pub categories: Vec<Category>,
    pub subcategories: Vec<SubCategory>,
}
