use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, instrument};

use crate::auth::extractors::Principal;
use crate::locations::repo::{self, CountrySummary, Location};
use crate::response;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/locations", post(create_location))
        .route(
            "/locations/:code",
            get(get_country).put(update_location).delete(delete_location),
        )
}

#[derive(Serialize)]
struct CountriesData {
    countries: Vec<CountrySummary>,
}

#[derive(Serialize)]
struct CountryData {
    country: Location,
}

#[instrument(skip_all)]
async fn list_countries(State(state): State<AppState>) -> Response {
    match repo::list_countries(&state.db).await {
        Ok(countries) => response::ok("countries fetched", CountriesData { countries }),
        Err(e) => {
            error!(error = %e, "list countries failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot fetch countries")
        }
    }
}

#[instrument(skip_all)]
async fn get_country(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match repo::get_by_code(&state.db, &code).await {
        Ok(Some(country)) => response::ok("country fetched", CountryData { country }),
        Ok(None) => response::fail(StatusCode::NOT_FOUND, "country not found"),
        Err(e) => {
            error!(error = %e, %code, "get country failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot fetch country")
        }
    }
}

fn require_admin(principal: &Principal) -> Option<Response> {
    if principal.is_superadmin() {
        None
    } else {
        Some(response::fail(StatusCode::FORBIDDEN, "admin access required"))
    }
}

#[instrument(skip_all)]
async fn create_location(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<Location>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    if payload.country_code.trim().is_empty() || payload.country_name.trim().is_empty() {
        return response::fail(StatusCode::BAD_REQUEST, "country code and name required");
    }
    match repo::create(&state.db, &payload).await {
        Ok(country) => response::ok("country created", CountryData { country }),
        Err(e) => {
            error!(error = %e, "create country failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot create country")
        }
    }
}

#[instrument(skip_all)]
async fn update_location(
    State(state): State<AppState>,
    principal: Principal,
    Path(code): Path<String>,
    Json(payload): Json<Location>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    match repo::update(&state.db, &code, &payload).await {
        Ok(Some(country)) => response::ok("country updated", CountryData { country }),
        Ok(None) => response::fail(StatusCode::NOT_FOUND, "country not found"),
        Err(e) => {
            error!(error = %e, %code, "update country failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot update country")
        }
    }
}

#[instrument(skip_all)]
async fn delete_location(
    State(state): State<AppState>,
    principal: Principal,
    Path(code): Path<String>,
) -> Response {
    if let Some(denied) = require_admin(&principal) {
        return denied;
    }
    match repo::delete(&state.db, &code).await {
        Ok(true) => response::ok_empty("country deleted"),
        Ok(false) => response::fail(StatusCode::NOT_FOUND, "country not found"),
        Err(e) => {
            error!(error = %e, %code, "delete country failed");
            response::fail(StatusCode::INTERNAL_SERVER_ERROR, "cannot delete country")
        }
    }
}
