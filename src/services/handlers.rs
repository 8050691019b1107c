use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::auth::extractors::Principal;
use crate::response;
use crate::services::dto::{CreateServiceRequest, ServiceData, ServicesData, UpdateServiceRequest};
use crate::services::repo::{self, Service};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", post(create_service))
        .route(
            "/services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route(
            "/services/filter/:division_id/:district_id/:subdistrict_id/:category_id/:subcategory_id",
            get(filter_services),
        )
}

#[instrument(skip_all, fields(user_id = principal.user_id))]
async fn create_service(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateServiceRequest>,
) -> Response {
    if payload.title.trim().is_empty() || payload.area.trim().is_empty() {
        return response::fail(StatusCode::BAD_REQUEST, "title and area required");
    }

    let draft = Service {
        id: 0,
        active: true,
        user_id: principal.user_id,
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        division_id: payload.division_id,
        district_id: payload.district_id,
        subdistrict_id: payload.subdistrict_id,
        area: payload.area,
        title: payload.title,
        caption: payload.caption,
        description: payload.description,
        price: payload.price,
        features: payload.features,
        hours: payload.hours,
        days: payload.days,
        page_name: payload.page_name,
        page_link: payload.page_link,
        messenger_name: payload.messenger_name,
        messenger_link: payload.messenger_link,
        created_at: time::OffsetDateTime::UNIX_EPOCH,
    };

    match repo::create_service(&state.db, &draft).await {
        Ok(service) => {
            info!(service_id = service.id, "service created");
            response::ok("service created successfully", ServiceData { service })
        }
        Err(e) => {
            error!(error = %e, "create service failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot create service")
        }
    }
}

#[instrument(skip_all)]
async fn get_service(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match repo::get_service(&state.db, id).await {
        Ok(Some(service)) => response::ok("service fetched successfully", ServiceData { service }),
        Ok(None) => response::fail(StatusCode::NOT_FOUND, "service not found"),
        Err(e) => {
            error!(error = %e, service_id = id, "get service failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot fetch service")
        }
    }
}

#[instrument(skip_all, fields(user_id = principal.user_id))]
async fn update_service(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Response {
    let mut service = match repo::get_service(&state.db, id).await {
        Ok(Some(s)) => s,
        Ok(None) => return response::fail(StatusCode::NOT_FOUND, "service not found"),
        Err(e) => {
            error!(error = %e, service_id = id, "get service failed");
            return response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot fetch service");
        }
    };

    if service.user_id != principal.user_id {
        return response::fail(StatusCode::FORBIDDEN, "cannot edit someone else's service");
    }

    payload.apply(&mut service);

    match repo::update_service(&state.db, &service).await {
        Ok(service) => response::ok("service updated successfully", ServiceData { service }),
        Err(e) => {
            error!(error = %e, service_id = id, "update service failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot update service")
        }
    }
}

#[instrument(skip_all, fields(user_id = principal.user_id))]
async fn delete_service(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Response {
    let service = match repo::get_service(&state.db, id).await {
        Ok(Some(s)) => s,
        Ok(None) => return response::fail(StatusCode::NOT_FOUND, "service not found"),
        Err(e) => {
            error!(error = %e, service_id = id, "get service failed");
            return response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot fetch service");
        }
    };

    if service.user_id != principal.user_id {
        return response::fail(StatusCode::FORBIDDEN, "cannot delete someone else's service");
    }

    match repo::delete_service(&state.db, id).await {
        Ok(_) => response::ok_empty("service deleted successfully"),
        Err(e) => {
            error!(error = %e, service_id = id, "delete service failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot delete service")
        }
    }
}

#[instrument(skip_all)]
async fn filter_services(
    State(state): State<AppState>,
    Path((division_id, district_id, subdistrict_id, category_id, subcategory_id)): Path<(
        i32,
        i32,
        i32,
        i64,
        i64,
    )>,
) -> Response {
    match repo::filter_services(
        &state.db,
        division_id,
        district_id,
        subdistrict_id,
        category_id,
        subcategory_id,
    )
    .await
    {
        Ok(services) => response::ok("services fetched successfully", ServicesData { services }),
        Err(e) => {
            error!(error = %e, "filter services failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot fetch services")
        }
    }
}
