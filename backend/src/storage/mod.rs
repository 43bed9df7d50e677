//! # Storage Module
//!
//! Handles all data persistence for the taxi service.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite repositories in
//! [`repositories`] implement them over a single shared [`DbConnection`].
//!
//! ## Tables
//!
//! - **manufacturers**: name and country
//! - **drivers**: accounts with hashed passwords and license numbers
//! - **cars**: model plus a manufacturer reference
//! - **car_drivers**: many-to-many link between cars and drivers
//! - **sessions**: login sessions with a visit counter
//!
//! Foreign keys are enforced, so deleting a manufacturer removes its cars and deleting
//! a car or driver removes the matching `car_drivers` rows and sessions.

pub mod connection;
pub mod repositories;
pub mod traits;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::{CarRepository, DriverRepository, ManufacturerRepository, SessionRepository};
pub use traits::{CarStorage, DriverStorage, ManufacturerStorage, SessionStorage, UsernameTaken};
