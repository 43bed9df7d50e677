use std::sync::Arc;
use tracing::{info, warn};

use super::commands::manufacturers::ManufacturerCommand;
use super::errors::{ServiceError, ServiceResult};
use super::models::{Manufacturer, NewManufacturer};
use super::search::SearchTerm;
use super::validation::FormErrors;
use crate::storage::ManufacturerStorage;

const MAX_NAME_LENGTH: usize = 255;

/// Service for managing car manufacturers
#[derive(Clone)]
pub struct ManufacturerService {
    manufacturers: Arc<dyn ManufacturerStorage>,
}

impl ManufacturerService {
    pub fn new(manufacturers: Arc<dyn ManufacturerStorage>) -> Self {
        Self { manufacturers }
    }

    /// Create a new manufacturer
    pub async fn create_manufacturer(&self, command: ManufacturerCommand) -> ServiceResult<Manufacturer> {
        info!("Creating manufacturer: name={}, country={}", command.name, command.country);

        let fields = Self::validate(&command)?;
        let manufacturer = self.manufacturers.store_manufacturer(&fields).await?;

        info!("Created manufacturer: {} with ID: {}", manufacturer, manufacturer.id);
        Ok(manufacturer)
    }

    pub async fn get_manufacturer(&self, id: i64) -> ServiceResult<Manufacturer> {
        self.manufacturers
            .get_manufacturer(id)
            .await?
            .ok_or_else(|| {
                warn!("Manufacturer not found: {}", id);
                ServiceError::not_found("Manufacturer", id)
            })
    }

    /// List manufacturers, narrowed to names containing the search term if one is given
    pub async fn list_manufacturers(&self, search: Option<&SearchTerm>) -> ServiceResult<Vec<Manufacturer>> {
        info!("Listing manufacturers, search: {:?}", search.map(SearchTerm::as_str));

        let manufacturers = self.manufacturers.list_manufacturers(search).await?;

        info!("Found {} manufacturers", manufacturers.len());
        Ok(manufacturers)
    }

    pub async fn update_manufacturer(&self, id: i64, command: ManufacturerCommand) -> ServiceResult<Manufacturer> {
        info!("Updating manufacturer: {}", id);

        // Unknown IDs are reported before form errors
        self.get_manufacturer(id).await?;
        let fields = Self::validate(&command)?;

        let manufacturer = Manufacturer {
            id,
            name: fields.name,
            country: fields.country,
        };
        if !self.manufacturers.update_manufacturer(&manufacturer).await? {
            return Err(ServiceError::not_found("Manufacturer", id));
        }

        info!("Updated manufacturer: {} with ID: {}", manufacturer, id);
        Ok(manufacturer)
    }

    /// Delete a manufacturer and, with it, all of its cars
    pub async fn delete_manufacturer(&self, id: i64) -> ServiceResult<Manufacturer> {
        info!("Deleting manufacturer: {}", id);

        let manufacturer = self.get_manufacturer(id).await?;
        if !self.manufacturers.delete_manufacturer(id).await? {
            warn!("Manufacturer not found: {}", id);
            return Err(ServiceError::not_found("Manufacturer", id));
        }

        info!("Deleted manufacturer: {}", manufacturer);
        Ok(manufacturer)
    }

    /// Validate the manufacturer form and return the cleaned fields
    fn validate(command: &ManufacturerCommand) -> ServiceResult<NewManufacturer> {
        let mut errors = FormErrors::new();
        let name = command.name.trim();
        let country = command.country.trim();

        if errors.require("name", name) {
            errors.check_max_length("name", name, MAX_NAME_LENGTH);
        }
        if errors.require("country", country) {
            errors.check_max_length("country", country, MAX_NAME_LENGTH);
        }
        errors.into_result()?;

        Ok(NewManufacturer {
            name: name.to_string(),
            country: country.to_string(),
        })
    }
}
