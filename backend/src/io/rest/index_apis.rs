use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use tracing::info;

use super::auth::CurrentDriver;
use super::responses::error_response;
use crate::AppState;
use shared::IndexResponse;

/// Home page counters; every call counts as a visit of the current session
pub async fn index(State(state): State<AppState>, Extension(current): Extension<CurrentDriver>) -> impl IntoResponse {
    info!("GET / - driver: {}", current.driver.username);

    match state.index_service.fleet_summary(&current.session_key).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(IndexResponse {
                num_drivers: summary.num_drivers,
                num_cars: summary.num_cars,
                num_manufacturers: summary.num_manufacturers,
                num_visits: summary.num_visits,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "build fleet summary"),
    }
}
