//! # Domain Module
//!
//! Business rules of the taxi service: form validation, password hashing, the
//! driver/car assignment toggle and login sessions.
//!
//! Services depend only on the storage traits, never on SQLite directly, and speak
//! in domain models and commands. The REST layer maps the `shared` DTOs to commands
//! on the way in and models back to DTOs on the way out.
//!
//! ## Module Organization
//!
//! - **manufacturer_service**: manufacturer CRUD and name search
//! - **driver_service**: driver registration, license updates and username search
//! - **car_service**: car CRUD, model search and driver assignment
//! - **auth_service**: login, logout and session resolution
//! - **index_service**: fleet counters and the per-session visit counter
//! - **validation**: form error collection and the license number validator
//! - **password**: PBKDF2 password hashing
//!
//! ## Business Rules
//!
//! - License numbers are three uppercase letters followed by five digits
//! - Usernames are unique
//! - A car belongs to exactly one manufacturer; the car form needs at least one driver
//! - Failed validation never persists anything

pub mod auth_service;
pub mod car_service;
pub mod commands;
pub mod driver_service;
pub mod errors;
pub mod index_service;
pub mod manufacturer_service;
pub mod models;
pub mod password;
pub mod search;
pub mod validation;

pub use auth_service::AuthService;
pub use car_service::CarService;
pub use driver_service::DriverService;
pub use errors::{ServiceError, ServiceResult};
pub use index_service::IndexService;
pub use manufacturer_service::ManufacturerService;
pub use password::PasswordHasher;
pub use search::SearchTerm;
pub use validation::FormErrors;
