//! # REST API for Cars
//!
//! List with `?model=` search, create, detail, update, delete, and the assignment
//! toggle for the logged-in driver.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use tracing::info;

use super::auth::CurrentDriver;
use super::mappers::CarMapper;
use super::responses::{error_response, redirect_with};
use crate::domain::SearchTerm;
use crate::AppState;
use shared::{CarFormRequest, CarSearchQuery};

const LIST_PATH: &str = "/cars/";

pub async fn list_cars(State(state): State<AppState>, Query(query): Query<CarSearchQuery>) -> impl IntoResponse {
    info!("GET /cars/ - query: {:?}", query);

    let search = SearchTerm::from_param(query.model.as_deref());
    match state.car_service.list_cars(search.as_ref()).await {
        Ok(cars) => {
            let search = search.map(|term| term.as_str().to_string());
            (StatusCode::OK, Json(CarMapper::to_list_dto(cars, search))).into_response()
        }
        Err(e) => error_response(e, "list cars"),
    }
}

pub async fn create_car(State(state): State<AppState>, Json(request): Json<CarFormRequest>) -> impl IntoResponse {
    info!("POST /cars/create/ - request: {:?}", request);

    match state.car_service.create_car(CarMapper::to_command(request)).await {
        Ok(car) => redirect_with(LIST_PATH, CarMapper::to_dto(car)),
        Err(e) => error_response(e, "create car"),
    }
}

pub async fn get_car(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /cars/{}/", id);

    match state.car_service.get_car(id).await {
        Ok(car) => (StatusCode::OK, Json(CarMapper::to_dto(car))).into_response(),
        Err(e) => error_response(e, "get car"),
    }
}

pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CarFormRequest>,
) -> impl IntoResponse {
    info!("POST /cars/{}/update/ - request: {:?}", id, request);

    match state.car_service.update_car(id, CarMapper::to_command(request)).await {
        Ok(car) => redirect_with(&format!("/cars/{}/", id), CarMapper::to_dto(car)),
        Err(e) => error_response(e, "update car"),
    }
}

pub async fn delete_car(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("POST /cars/{}/delete/", id);

    match state.car_service.delete_car(id).await {
        Ok(car) => redirect_with(LIST_PATH, CarMapper::to_dto(car)),
        Err(e) => error_response(e, "delete car"),
    }
}

/// Assign the logged-in driver to the car, or unassign them if already assigned
pub async fn toggle_assign(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentDriver>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("POST /cars/{}/toggle-assign/ - driver: {}", id, current.driver.username);

    let result = match state.car_service.toggle_assignment(id, current.driver.id).await {
        Ok(_) => state.car_service.get_car(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(car) => redirect_with(&format!("/cars/{}/", id), CarMapper::to_dto(car)),
        Err(e) => error_response(e, "toggle car assignment"),
    }
}
