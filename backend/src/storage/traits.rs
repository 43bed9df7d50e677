//! # Storage Traits
//!
//! Storage abstraction traits that let the domain services work with any backend.
//! The SQLite repositories in [`super::repositories`] are the production implementations.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{Car, Driver, Manufacturer, NewCar, NewDriver, NewManufacturer, Session};
use crate::domain::search::SearchTerm;

/// Trait defining the interface for manufacturer storage operations
#[async_trait]
pub trait ManufacturerStorage: Send + Sync {
    /// Store a new manufacturer and return it with its assigned ID
    async fn store_manufacturer(&self, manufacturer: &NewManufacturer) -> Result<Manufacturer>;

    async fn get_manufacturer(&self, id: i64) -> Result<Option<Manufacturer>>;

    /// List manufacturers ordered by name, optionally narrowed to names containing the term
    async fn list_manufacturers(&self, filter: Option<&SearchTerm>) -> Result<Vec<Manufacturer>>;

    /// Returns false if no manufacturer has this ID
    async fn update_manufacturer(&self, manufacturer: &Manufacturer) -> Result<bool>;

    /// Delete a manufacturer together with its cars.
    /// Returns false if no manufacturer has this ID
    async fn delete_manufacturer(&self, id: i64) -> Result<bool>;

    async fn count_manufacturers(&self) -> Result<i64>;
}

/// Raised by [`DriverStorage::store_driver`] when another driver already holds the username
#[derive(Debug, thiserror::Error)]
#[error("Username already taken: {0}")]
pub struct UsernameTaken(pub String);

/// Trait defining the interface for driver storage operations
#[async_trait]
pub trait DriverStorage: Send + Sync {
    /// Store a new driver and return it with its assigned ID.
    /// Fails with [`UsernameTaken`] if the username is in use.
    async fn store_driver(&self, driver: &NewDriver) -> Result<Driver>;

    async fn get_driver(&self, id: i64) -> Result<Option<Driver>>;

    async fn get_driver_by_username(&self, username: &str) -> Result<Option<Driver>>;

    /// Of the given IDs, return those that belong to no driver
    async fn find_missing_driver_ids(&self, ids: &[i64]) -> Result<Vec<i64>>;

    /// List drivers ordered by username, optionally narrowed to usernames containing the term
    async fn list_drivers(&self, filter: Option<&SearchTerm>) -> Result<Vec<Driver>>;

    /// Returns false if no driver has this ID
    async fn update_license_number(&self, id: i64, license_number: &str) -> Result<bool>;

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()>;

    /// Delete a driver, their sessions and car assignments.
    /// Returns false if no driver has this ID
    async fn delete_driver(&self, id: i64) -> Result<bool>;

    async fn count_drivers(&self) -> Result<i64>;
}

/// Trait defining the interface for car storage operations
#[async_trait]
pub trait CarStorage: Send + Sync {
    /// Store a new car with its driver set and return it fully loaded
    async fn store_car(&self, car: &NewCar) -> Result<Car>;

    async fn get_car(&self, id: i64) -> Result<Option<Car>>;

    /// List cars in creation order, optionally narrowed to models containing the term
    async fn list_cars(&self, filter: Option<&SearchTerm>) -> Result<Vec<Car>>;

    /// List the cars a driver is assigned to
    async fn list_cars_for_driver(&self, driver_id: i64) -> Result<Vec<Car>>;

    /// Replace a car's fields and driver set. Returns false if no car has this ID
    async fn update_car(&self, id: i64, car: &NewCar) -> Result<bool>;

    /// Returns false if no car has this ID
    async fn delete_car(&self, id: i64) -> Result<bool>;

    /// Adding an already assigned driver is a no-op
    async fn add_driver(&self, car_id: i64, driver_id: i64) -> Result<()>;

    async fn remove_driver(&self, car_id: i64, driver_id: i64) -> Result<()>;

    async fn count_cars(&self) -> Result<i64>;
}

/// Trait defining the interface for session storage operations
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn store_session(&self, session: &Session) -> Result<()>;

    async fn get_session(&self, key: &str) -> Result<Option<Session>>;

    /// Increment the visit counter and return the new value, or None for an unknown key
    async fn increment_visits(&self, key: &str) -> Result<Option<i64>>;

    async fn delete_session(&self, key: &str) -> Result<()>;

    /// Remove sessions that expired before `now`. Returns the number removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}
