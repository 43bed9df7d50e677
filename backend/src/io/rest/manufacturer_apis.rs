//! # REST API for Manufacturers
//!
//! List with `?name=` search, create, detail, update and delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::mappers::ManufacturerMapper;
use super::responses::{error_response, redirect_with};
use crate::domain::SearchTerm;
use crate::AppState;
use shared::{ManufacturerFormRequest, ManufacturerSearchQuery};

const LIST_PATH: &str = "/manufacturers/";

/// List manufacturers, optionally filtered by name
pub async fn list_manufacturers(
    State(state): State<AppState>,
    Query(query): Query<ManufacturerSearchQuery>,
) -> impl IntoResponse {
    info!("GET /manufacturers/ - query: {:?}", query);

    let search = SearchTerm::from_param(query.name.as_deref());
    match state.manufacturer_service.list_manufacturers(search.as_ref()).await {
        Ok(manufacturers) => {
            let search = search.map(|term| term.as_str().to_string());
            (StatusCode::OK, Json(ManufacturerMapper::to_list_dto(manufacturers, search))).into_response()
        }
        Err(e) => error_response(e, "list manufacturers"),
    }
}

pub async fn create_manufacturer(
    State(state): State<AppState>,
    Json(request): Json<ManufacturerFormRequest>,
) -> impl IntoResponse {
    info!("POST /manufacturers/create/ - request: {:?}", request);

    match state
        .manufacturer_service
        .create_manufacturer(ManufacturerMapper::to_command(request))
        .await
    {
        Ok(manufacturer) => redirect_with(LIST_PATH, ManufacturerMapper::to_dto(manufacturer)),
        Err(e) => error_response(e, "create manufacturer"),
    }
}

pub async fn get_manufacturer(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /manufacturers/{}/", id);

    match state.manufacturer_service.get_manufacturer(id).await {
        Ok(manufacturer) => (StatusCode::OK, Json(ManufacturerMapper::to_dto(manufacturer))).into_response(),
        Err(e) => error_response(e, "get manufacturer"),
    }
}

pub async fn update_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ManufacturerFormRequest>,
) -> impl IntoResponse {
    info!("POST /manufacturers/{}/update/ - request: {:?}", id, request);

    match state
        .manufacturer_service
        .update_manufacturer(id, ManufacturerMapper::to_command(request))
        .await
    {
        Ok(manufacturer) => redirect_with(LIST_PATH, ManufacturerMapper::to_dto(manufacturer)),
        Err(e) => error_response(e, "update manufacturer"),
    }
}

/// Delete a manufacturer together with its cars
pub async fn delete_manufacturer(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("POST /manufacturers/{}/delete/", id);

    match state.manufacturer_service.delete_manufacturer(id).await {
        Ok(manufacturer) => redirect_with(LIST_PATH, ManufacturerMapper::to_dto(manufacturer)),
        Err(e) => error_response(e, "delete manufacturer"),
    }
}
