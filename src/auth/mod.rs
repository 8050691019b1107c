use axum::Router;

use crate::state::AppState;

mod dto;
pub mod error;
pub(crate) mod extractors;
pub mod google;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod service;
mod token;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
