use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, instrument};

use crate::auth::extractors::Principal;
use crate::categories::dto::{
    CategoryData, CategoryRequest, SubCategoryData, SubCategoryRequest, TaxonomyData,
};
use crate::categories::repo;
use crate::response;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route("/subcategories", post(create_subcategory))
        .route(
            "/subcategories/:id",
            put(update_subcategory).delete(delete_subcategory),
        )
        .route("/categories-subcategories", get(list_taxonomy))
}

fn require_admin(principal: &Principal) -> Option<Response> {
    if principal.is_superadmin() {
        None
    } else {
        Some(response::fail(StatusCode::FORBIDDEN, "admin access required"))
    }
}

#[instrument(skip_all)]
async fn create_category(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CategoryRequest>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    if payload.name.trim().is_empty() {
        return response::fail(StatusCode::BAD_REQUEST, "category name required");
    }
    match repo::create_category(&state.db, payload.name.trim(), &payload.description).await {
        Ok(category) => response::ok("category created", CategoryData { category }),
        Err(e) => {
            error!(error = %e, "create category failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot create category")
        }
    }
}

#[instrument(skip_all)]
async fn update_category(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryRequest>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    if payload.name.trim().is_empty() {
        return response::fail(StatusCode::BAD_REQUEST, "category name required");
    }
    match repo::update_category(&state.db, id, payload.name.trim(), &payload.description).await {
        Ok(Some(category)) => response::ok("category updated", CategoryData { category }),
        Ok(None) => response::fail(StatusCode::NOT_FOUND, "category not found"),
        Err(e) => {
            error!(error = %e, category_id = id, "update category failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot update category")
        }
    }
}

#[instrument(skip_all)]
async fn delete_category(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    match repo::delete_category(&state.db, id).await {
        Ok(true) => response::ok_empty("category deleted"),
        Ok(false) => response::fail(StatusCode::NOT_FOUND, "category not found"),
        Err(e) => {
            error!(error = %e, category_id = id, "delete category failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot delete category")
        }
    }
}

#[instrument(skip_all)]
async fn create_subcategory(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<SubCategoryRequest>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    if payload.name.trim().is_empty() {
        return response::fail(StatusCode::BAD_REQUEST, "subcategory name required");
    }
    match repo::create_subcategory(
        &state.db,
        payload.category_id,
        payload.name.trim(),
        &payload.description,
    )
    .await
    {
        Ok(subcategory) => response::ok("subcategory created", SubCategoryData { subcategory }),
        Err(e) => {
            error!(error = %e, "create subcategory failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot create subcategory")
        }
    }
}

#[instrument(skip_all)]
async fn update_subcategory(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<SubCategoryRequest>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    if payload.name.trim().is_empty() {
        return response::fail(StatusCode::BAD_REQUEST, "subcategory name required");
    }
    match repo::update_subcategory(
        &state.db,
        id,
        payload.category_id,
        payload.name.trim(),
        &payload.description,
    )
    .await
    {
        Ok(Some(subcategory)) => response::ok("subcategory updated", SubCategoryData { subcategory }),
        Ok(None) => response::fail(StatusCode::NOT_FOUND, "subcategory not found"),
        Err(e) => {
            error!(error = %e, subcategory_id = id, "update subcategory failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot update subcategory")
        }
    }
}

#[instrument(skip_all)]
async fn delete_subcategory(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    match repo::delete_subcategory(&state.db, id).await {
        Ok(true) => response::ok_empty("subcategory deleted"),
        Ok(false) => response::fail(StatusCode::NOT_FOUND, "subcategory not found"),
        Err(e) => {
            error!(error = %e, subcategory_id = id, "delete subcategory failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot delete subcategory")
        }
    }
}

#[instrument(skip_all)]
async fn list_taxonomy(State(state): State<AppState>, _principal: Principal) -> Response {
    let categories = match repo::list_categories(&state.db).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "list categories failed");
            return response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot fetch categories");
        }
    };
    let subcategories = match repo::list_subcategories(&state.db).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "list subcategories failed");
            return response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot fetch subcategories");
        }
    };
    response::ok(
        "categories fetched",
        TaxonomyData {
            categories,
            subcategories,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRef;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    use crate::auth::jwt::JwtKeys;
    use crate::auth::repo::Role;
    use crate::state::AppState;

    // Validation and admin checks run before any query, so the lazy test
    // pool is never touched on these paths.
    async fn put_json(role: Role, path: &str, body: &str) -> StatusCode {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state)
            .sign(1, "admin@test.local", role)
            .unwrap();
        let app = routes().with_state(state);
        let req = Request::builder()
            .method(Method::PUT)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn update_category_rejects_blank_name() {
        let status = put_json(Role::Superadmin, "/categories/1", r#"{"name":"   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_subcategory_rejects_blank_name() {
        let status = put_json(
            Role::Superadmin,
            "/subcategories/1",
            r#"{"category_id":1,"name":""}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn taxonomy_writes_require_admin() {
        let status = put_json(Role::Client, "/categories/1", r#"{"name":"Plumbing"}"#).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
