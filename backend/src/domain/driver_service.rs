use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::commands::drivers::{CreateDriverCommand, UpdateLicenseCommand};
use super::errors::{ServiceError, ServiceResult};
use super::models::{Car, Driver, NewDriver};
use super::password::PasswordHasher;
use super::search::SearchTerm;
use super::validation::{validate_license_number, FormErrors};
use crate::storage::{CarStorage, DriverStorage, UsernameTaken};

const MAX_USERNAME_LENGTH: usize = 150;
const MAX_NAME_LENGTH: usize = 150;

pub const PASSWORD_MISMATCH_MESSAGE: &str = "The two password fields didn't match.";
pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";

/// Service for managing driver accounts
#[derive(Clone)]
pub struct DriverService {
    drivers: Arc<dyn DriverStorage>,
    cars: Arc<dyn CarStorage>,
    hasher: PasswordHasher,
}

impl DriverService {
    pub fn new(drivers: Arc<dyn DriverStorage>, cars: Arc<dyn CarStorage>, hasher: PasswordHasher) -> Self {
        Self { drivers, cars, hasher }
    }

    /// Register a new driver. The password is stored hashed.
    pub async fn create_driver(&self, command: CreateDriverCommand) -> ServiceResult<Driver> {
        info!("Creating driver: username={}", command.username);

        let mut errors = Self::validate_create_command(&command);
        let username = command.username.trim();
        if !errors.has_error("username") && self.drivers.get_driver_by_username(username).await?.is_some() {
            errors.add("username", DUPLICATE_USERNAME_MESSAGE);
        }
        errors.into_result()?;

        // Key stretching is CPU bound
        let hasher = self.hasher;
        let raw_password = command.password1.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&raw_password))
            .await
            .map_err(anyhow::Error::from)??;

        let new_driver = NewDriver {
            username: username.to_string(),
            password_hash,
            first_name: command.first_name.trim().to_string(),
            last_name: command.last_name.trim().to_string(),
            license_number: command.license_number.trim().to_string(),
            date_joined: Utc::now(),
        };
        // A concurrent registration can claim the username while the password is hashed
        let driver = match self.drivers.store_driver(&new_driver).await {
            Ok(driver) => driver,
            Err(e) if e.is::<UsernameTaken>() => {
                warn!("Username taken during creation: {}", new_driver.username);
                let mut errors = FormErrors::new();
                errors.add("username", DUPLICATE_USERNAME_MESSAGE);
                return Err(ServiceError::Validation(errors));
            }
            Err(e) => return Err(e.into()),
        };

        info!("Created driver: {} with ID: {}", driver, driver.id);
        Ok(driver)
    }

    pub async fn get_driver(&self, id: i64) -> ServiceResult<Driver> {
        self.drivers.get_driver(id).await?.ok_or_else(|| {
            warn!("Driver not found: {}", id);
            ServiceError::not_found("Driver", id)
        })
    }

    /// Get a driver together with the cars they are assigned to
    pub async fn get_driver_detail(&self, id: i64) -> ServiceResult<(Driver, Vec<Car>)> {
        let driver = self.get_driver(id).await?;
        let cars = self.cars.list_cars_for_driver(id).await?;

        info!("Driver {} is assigned to {} cars", driver.username, cars.len());
        Ok((driver, cars))
    }

    /// List drivers, narrowed to usernames containing the search term if one is given
    pub async fn list_drivers(&self, search: Option<&SearchTerm>) -> ServiceResult<Vec<Driver>> {
        info!("Listing drivers, search: {:?}", search.map(SearchTerm::as_str));

        let drivers = self.drivers.list_drivers(search).await?;

        info!("Found {} drivers", drivers.len());
        Ok(drivers)
    }

    pub async fn update_license_number(&self, id: i64, command: UpdateLicenseCommand) -> ServiceResult<Driver> {
        info!("Updating license number of driver: {}", id);

        let mut driver = self.get_driver(id).await?;

        let license_number = command.license_number.trim();
        let mut errors = FormErrors::new();
        Self::check_license_number(&mut errors, license_number);
        errors.into_result()?;

        if !self.drivers.update_license_number(id, license_number).await? {
            return Err(ServiceError::not_found("Driver", id));
        }
        driver.license_number = license_number.to_string();

        info!("Updated license number of driver: {}", driver.username);
        Ok(driver)
    }

    /// Delete a driver along with their sessions and car assignments
    pub async fn delete_driver(&self, id: i64) -> ServiceResult<Driver> {
        info!("Deleting driver: {}", id);

        let driver = self.get_driver(id).await?;
        if !self.drivers.delete_driver(id).await? {
            warn!("Driver not found: {}", id);
            return Err(ServiceError::not_found("Driver", id));
        }

        info!("Deleted driver: {}", driver);
        Ok(driver)
    }

    /// Validate the creation form fields that need no storage lookup
    fn validate_create_command(command: &CreateDriverCommand) -> FormErrors {
        let mut errors = FormErrors::new();

        let username = command.username.trim();
        if errors.require("username", username) {
            errors.check_max_length("username", username, MAX_USERNAME_LENGTH);
        }

        let has_password1 = errors.require_unstripped("password1", &command.password1);
        let has_password2 = errors.require_unstripped("password2", &command.password2);
        if has_password1 && has_password2 && command.password1 != command.password2 {
            errors.add("password2", PASSWORD_MISMATCH_MESSAGE);
        }

        Self::check_license_number(&mut errors, command.license_number.trim());

        errors.check_max_length("first_name", command.first_name.trim(), MAX_NAME_LENGTH);
        errors.check_max_length("last_name", command.last_name.trim(), MAX_NAME_LENGTH);

        errors
    }

    fn check_license_number(errors: &mut FormErrors, license_number: &str) {
        if errors.require("license_number", license_number) {
            if let Err(e) = validate_license_number(license_number) {
                errors.add("license_number", e.to_string());
            }
        }
    }
}
