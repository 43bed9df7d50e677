//! # REST API for Drivers
//!
//! Driver registration, list with `?username=` search, detail with assigned cars,
//! license number update and delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::mappers::DriverMapper;
use super::responses::{error_response, redirect_with};
use crate::domain::SearchTerm;
use crate::AppState;
use shared::{CreateDriverRequest, DriverSearchQuery, UpdateDriverLicenseRequest};

const LIST_PATH: &str = "/drivers/";

pub async fn list_drivers(
    State(state): State<AppState>,
    Query(query): Query<DriverSearchQuery>,
) -> impl IntoResponse {
    info!("GET /drivers/ - query: {:?}", query);

    let search = SearchTerm::from_param(query.username.as_deref());
    match state.driver_service.list_drivers(search.as_ref()).await {
        Ok(drivers) => {
            let search = search.map(|term| term.as_str().to_string());
            (StatusCode::OK, Json(DriverMapper::to_list_dto(drivers, search))).into_response()
        }
        Err(e) => error_response(e, "list drivers"),
    }
}

/// Register a new driver
pub async fn create_driver(
    State(state): State<AppState>,
    Json(request): Json<CreateDriverRequest>,
) -> impl IntoResponse {
    // Passwords stay out of the log
    info!(
        "POST /drivers/create/ - username: {}, license_number: {}",
        request.username, request.license_number
    );

    match state
        .driver_service
        .create_driver(DriverMapper::to_create_command(request))
        .await
    {
        Ok(driver) => redirect_with(LIST_PATH, DriverMapper::to_dto(driver)),
        Err(e) => error_response(e, "create driver"),
    }
}

/// Get a driver with the cars they are assigned to
pub async fn get_driver(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /drivers/{}/", id);

    match state.driver_service.get_driver_detail(id).await {
        Ok((driver, cars)) => (StatusCode::OK, Json(DriverMapper::to_detail_dto(driver, cars))).into_response(),
        Err(e) => error_response(e, "get driver"),
    }
}

pub async fn update_driver_license(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDriverLicenseRequest>,
) -> impl IntoResponse {
    info!("POST /drivers/{}/update/ - request: {:?}", id, request);

    match state
        .driver_service
        .update_license_number(id, DriverMapper::to_update_license_command(request))
        .await
    {
        Ok(driver) => redirect_with(&format!("/drivers/{}/", id), DriverMapper::to_dto(driver)),
        Err(e) => error_response(e, "update driver license"),
    }
}

pub async fn delete_driver(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("POST /drivers/{}/delete/", id);

    match state.driver_service.delete_driver(id).await {
        Ok(driver) => redirect_with(LIST_PATH, DriverMapper::to_dto(driver)),
        Err(e) => error_response(e, "delete driver"),
    }
}
