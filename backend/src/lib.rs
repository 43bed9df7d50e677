//! # Taxi Service Backend
//!
//! Fleet management for a taxi service: manufacturers, drivers and cars, with
//! search, driver-to-car assignment and session-based login.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, session middleware)
//!     ↓
//! Domain Layer (services, validation, password hashing)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```
//!
//! [`initialize_backend`] wires the layers together from an [`AppConfig`] and
//! [`create_router`] exposes them over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::AppConfig;
use domain::commands::drivers::CreateDriverCommand;
use domain::{AuthService, CarService, DriverService, IndexService, ManufacturerService, PasswordHasher};
use io::rest::{auth_apis, car_apis, driver_apis, index_apis, manufacturer_apis};
use storage::{CarRepository, DbConnection, DriverRepository, DriverStorage, ManufacturerRepository, SessionRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub manufacturer_service: ManufacturerService,
    pub driver_service: DriverService,
    pub car_service: CarService,
    pub auth_service: AuthService,
    pub index_service: IndexService,
}

impl AppState {
    /// Build every service on top of one database connection
    pub fn new(db: DbConnection, config: &AppConfig) -> Self {
        let manufacturers = Arc::new(ManufacturerRepository::new(db.clone()));
        let drivers = Arc::new(DriverRepository::new(db.clone()));
        let cars = Arc::new(CarRepository::new(db.clone()));
        let sessions = Arc::new(SessionRepository::new(db));
        let hasher = PasswordHasher::new(config.password_iterations);

        Self {
            manufacturer_service: ManufacturerService::new(manufacturers.clone()),
            driver_service: DriverService::new(drivers.clone(), cars.clone(), hasher),
            car_service: CarService::new(cars.clone(), manufacturers.clone(), drivers.clone()),
            auth_service: AuthService::new(drivers.clone(), sessions.clone(), config.session_ttl(), hasher),
            index_service: IndexService::new(manufacturers, drivers, cars, sessions),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain model");
    let app_state = AppState::new(db.clone(), config);

    if let Some(bootstrap) = &config.bootstrap_driver {
        let drivers = DriverRepository::new(db);
        if drivers.get_driver_by_username(&bootstrap.username).await?.is_none() {
            info!("Creating bootstrap driver: {}", bootstrap.username);
            app_state
                .driver_service
                .create_driver(CreateDriverCommand {
                    username: bootstrap.username.clone(),
                    password1: bootstrap.password.clone(),
                    password2: bootstrap.password.clone(),
                    license_number: bootstrap.license_number.clone(),
                    ..Default::default()
                })
                .await
                .context("Failed to create bootstrap driver")?;
        }
    }

    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let cors = match &config.cors_allowed_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::new(),
    };

    // Everything except login needs a session
    let protected_routes = Router::new()
        .route("/", get(index_apis::index))
        .route("/accounts/logout/", post(auth_apis::logout))
        .route("/manufacturers/", get(manufacturer_apis::list_manufacturers))
        .route("/manufacturers/create/", post(manufacturer_apis::create_manufacturer))
        .route("/manufacturers/:id/", get(manufacturer_apis::get_manufacturer))
        .route("/manufacturers/:id/update/", post(manufacturer_apis::update_manufacturer))
        .route("/manufacturers/:id/delete/", post(manufacturer_apis::delete_manufacturer))
        .route("/drivers/", get(driver_apis::list_drivers))
        .route("/drivers/create/", post(driver_apis::create_driver))
        .route("/drivers/:id/", get(driver_apis::get_driver))
        .route("/drivers/:id/update/", post(driver_apis::update_driver_license))
        .route("/drivers/:id/delete/", post(driver_apis::delete_driver))
        .route("/cars/", get(car_apis::list_cars))
        .route("/cars/create/", post(car_apis::create_car))
        .route("/cars/:id/", get(car_apis::get_car))
        .route("/cars/:id/update/", post(car_apis::update_car))
        .route("/cars/:id/delete/", post(car_apis::delete_car))
        .route("/cars/:id/toggle-assign/", post(car_apis::toggle_assign))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            io::rest::auth::require_login,
        ));

    let router = Router::new()
        .route("/accounts/login/", post(auth_apis::login))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    Ok(router)
}
