use std::sync::Arc;
use tracing::{info, warn};

use super::commands::cars::{AssignmentChange, CarCommand};
use super::errors::{ServiceError, ServiceResult};
use super::models::{Car, NewCar};
use super::search::SearchTerm;
use super::validation::{FormErrors, INVALID_CHOICE_MESSAGE, REQUIRED_MESSAGE};
use crate::storage::{CarStorage, DriverStorage, ManufacturerStorage};

const MAX_MODEL_LENGTH: usize = 255;

/// Service for managing cars and their driver assignments
#[derive(Clone)]
pub struct CarService {
    cars: Arc<dyn CarStorage>,
    manufacturers: Arc<dyn ManufacturerStorage>,
    drivers: Arc<dyn DriverStorage>,
}

impl CarService {
    pub fn new(
        cars: Arc<dyn CarStorage>,
        manufacturers: Arc<dyn ManufacturerStorage>,
        drivers: Arc<dyn DriverStorage>,
    ) -> Self {
        Self {
            cars,
            manufacturers,
            drivers,
        }
    }

    pub async fn create_car(&self, command: CarCommand) -> ServiceResult<Car> {
        info!(
            "Creating car: model={}, manufacturer={:?}, drivers={:?}",
            command.model, command.manufacturer_id, command.driver_ids
        );

        let fields = self.validate(&command).await?;
        let car = self.cars.store_car(&fields).await?;

        info!("Created car: {} with ID: {}", car, car.id);
        Ok(car)
    }

    pub async fn get_car(&self, id: i64) -> ServiceResult<Car> {
        self.cars.get_car(id).await?.ok_or_else(|| {
            warn!("Car not found: {}", id);
            ServiceError::not_found("Car", id)
        })
    }

    /// List cars, narrowed to models containing the search term if one is given
    pub async fn list_cars(&self, search: Option<&SearchTerm>) -> ServiceResult<Vec<Car>> {
        info!("Listing cars, search: {:?}", search.map(SearchTerm::as_str));

        let cars = self.cars.list_cars(search).await?;

        info!("Found {} cars", cars.len());
        Ok(cars)
    }

    /// Replace a car's model, manufacturer and full driver set
    pub async fn update_car(&self, id: i64, command: CarCommand) -> ServiceResult<Car> {
        info!("Updating car: {}", id);

        self.get_car(id).await?;
        let fields = self.validate(&command).await?;

        if !self.cars.update_car(id, &fields).await? {
            return Err(ServiceError::not_found("Car", id));
        }
        let car = self.get_car(id).await?;

        info!("Updated car: {} with ID: {}", car, id);
        Ok(car)
    }

    pub async fn delete_car(&self, id: i64) -> ServiceResult<Car> {
        info!("Deleting car: {}", id);

        let car = self.get_car(id).await?;
        if !self.cars.delete_car(id).await? {
            warn!("Car not found: {}", id);
            return Err(ServiceError::not_found("Car", id));
        }

        info!("Deleted car: {}", car);
        Ok(car)
    }

    /// Assign the driver to the car, or unassign them if they already drive it
    pub async fn toggle_assignment(&self, car_id: i64, driver_id: i64) -> ServiceResult<AssignmentChange> {
        let car = self.get_car(car_id).await?;

        let change = if car.has_driver(driver_id) {
            self.cars.remove_driver(car_id, driver_id).await?;
            AssignmentChange::Unassigned
        } else {
            self.cars.add_driver(car_id, driver_id).await?;
            AssignmentChange::Assigned
        };

        info!("Driver {} {:?} on car {}", driver_id, change, car);
        Ok(change)
    }

    /// Validate the car form against storage and return the cleaned fields
    async fn validate(&self, command: &CarCommand) -> ServiceResult<NewCar> {
        let mut errors = FormErrors::new();

        let model = command.model.trim();
        if errors.require("model", model) {
            errors.check_max_length("model", model, MAX_MODEL_LENGTH);
        }

        let manufacturer_id = match command.manufacturer_id {
            None => {
                errors.add("manufacturer", REQUIRED_MESSAGE);
                None
            }
            Some(id) => {
                if self.manufacturers.get_manufacturer(id).await?.is_none() {
                    errors.add("manufacturer", INVALID_CHOICE_MESSAGE);
                }
                Some(id)
            }
        };

        let mut driver_ids = command.driver_ids.clone();
        driver_ids.sort_unstable();
        driver_ids.dedup();
        if driver_ids.is_empty() {
            errors.add("drivers", REQUIRED_MESSAGE);
        } else {
            for missing in self.drivers.find_missing_driver_ids(&driver_ids).await? {
                errors.add(
                    "drivers",
                    format!(
                        "Select a valid choice. {} is not one of the available choices.",
                        missing
                    ),
                );
            }
        }

        errors.into_result()?;
        let manufacturer_id =
            manufacturer_id.ok_or_else(|| anyhow::anyhow!("Manufacturer missing after validation"))?;

        Ok(NewCar {
            model: model.to_string(),
            manufacturer_id,
            driver_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Driver, Manufacturer, NewDriver, NewManufacturer};
    use crate::storage::{CarRepository, DbConnection, DriverRepository, ManufacturerRepository};
    use chrono::Utc;

    struct Fixture {
        service: CarService,
        manufacturers: Arc<ManufacturerRepository>,
        drivers: Arc<DriverRepository>,
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let manufacturers = Arc::new(ManufacturerRepository::new(db.clone()));
        let drivers = Arc::new(DriverRepository::new(db.clone()));
        Fixture {
            service: CarService::new(
                Arc::new(CarRepository::new(db)),
                manufacturers.clone(),
                drivers.clone(),
            ),
            manufacturers,
            drivers,
        }
    }

    async fn manufacturer(fixture: &Fixture, name: &str) -> Manufacturer {
        fixture
            .manufacturers
            .store_manufacturer(&NewManufacturer {
                name: name.to_string(),
                country: "Italy".to_string(),
            })
            .await
            .unwrap()
    }

    async fn driver(fixture: &Fixture, username: &str) -> Driver {
        fixture
            .drivers
            .store_driver(&NewDriver {
                username: username.to_string(),
                password_hash: "pbkdf2_sha256$1$00$00".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                license_number: "ABC12345".to_string(),
                date_joined: Utc::now(),
            })
            .await
            .unwrap()
    }

    fn command(model: &str, manufacturer_id: Option<i64>, driver_ids: Vec<i64>) -> CarCommand {
        CarCommand {
            model: model.to_string(),
            manufacturer_id,
            driver_ids,
        }
    }

    fn form_errors(result: ServiceResult<Car>) -> FormErrors {
        match result {
            Err(ServiceError::Validation(errors)) => errors,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_car() {
        let fixture = setup_test().await;
        let alfa = manufacturer(&fixture, "Alfa Romeo").await;
        let bob = driver(&fixture, "bob").await;
        let alice = driver(&fixture, "alice").await;

        let car = fixture
            .service
            .create_car(command("8C", Some(alfa.id), vec![bob.id, alice.id, bob.id]))
            .await
            .expect("Failed to create car");

        assert_eq!(car.to_string(), "Alfa Romeo 8C");
        let usernames: Vec<&str> = car.drivers.iter().map(|d| d.username.as_str()).collect();
        assert_eq!(usernames, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_create_car_validation() {
        let fixture = setup_test().await;

        let errors = form_errors(fixture.service.create_car(command("", None, vec![])).await);
        assert_eq!(errors.get("model").unwrap(), &[REQUIRED_MESSAGE.to_string()]);
        assert_eq!(errors.get("manufacturer").unwrap(), &[REQUIRED_MESSAGE.to_string()]);
        assert_eq!(errors.get("drivers").unwrap(), &[REQUIRED_MESSAGE.to_string()]);

        let errors = form_errors(fixture.service.create_car(command("8C", Some(42), vec![7])).await);
        assert_eq!(errors.get("manufacturer").unwrap(), &[INVALID_CHOICE_MESSAGE.to_string()]);
        assert_eq!(
            errors.get("drivers").unwrap(),
            &["Select a valid choice. 7 is not one of the available choices.".to_string()]
        );

        assert!(fixture.service.list_cars(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_cars() {
        let fixture = setup_test().await;
        let alfa = manufacturer(&fixture, "Alfa Romeo").await;
        let bob = driver(&fixture, "bob").await;
        for model in ["Giulia", "Stelvio", "8C"] {
            fixture
                .service
                .create_car(command(model, Some(alfa.id), vec![bob.id]))
                .await
                .unwrap();
        }

        let term = SearchTerm::from_param(Some("giu"));
        let found = fixture.service.list_cars(term.as_ref()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].model, "Giulia");

        let models: Vec<String> = fixture
            .service
            .list_cars(None)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.model)
            .collect();
        assert_eq!(models, vec!["Giulia", "Stelvio", "8C"]);
    }

    #[tokio::test]
    async fn test_update_car() {
        let fixture = setup_test().await;
        let alfa = manufacturer(&fixture, "Alfa Romeo").await;
        let fiat = manufacturer(&fixture, "Fiat").await;
        let bob = driver(&fixture, "bob").await;
        let alice = driver(&fixture, "alice").await;
        let car = fixture
            .service
            .create_car(command("8C", Some(alfa.id), vec![bob.id]))
            .await
            .unwrap();

        let updated = fixture
            .service
            .update_car(car.id, command("Panda", Some(fiat.id), vec![alice.id]))
            .await
            .unwrap();
        assert_eq!(updated.to_string(), "Fiat Panda");
        assert!(updated.has_driver(alice.id));
        assert!(!updated.has_driver(bob.id));

        let missing = fixture
            .service
            .update_car(999, command("Panda", Some(fiat.id), vec![alice.id]))
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));

        let invalid = fixture.service.update_car(car.id, command("Panda", Some(fiat.id), vec![])).await;
        assert!(matches!(invalid, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_toggle_assignment() {
        let fixture = setup_test().await;
        let alfa = manufacturer(&fixture, "Alfa Romeo").await;
        let bob = driver(&fixture, "bob").await;
        let alice = driver(&fixture, "alice").await;
        let car = fixture
            .service
            .create_car(command("8C", Some(alfa.id), vec![bob.id]))
            .await
            .unwrap();

        let change = fixture.service.toggle_assignment(car.id, alice.id).await.unwrap();
        assert_eq!(change, AssignmentChange::Assigned);
        assert!(fixture.service.get_car(car.id).await.unwrap().has_driver(alice.id));

        let change = fixture.service.toggle_assignment(car.id, alice.id).await.unwrap();
        assert_eq!(change, AssignmentChange::Unassigned);
        assert!(!fixture.service.get_car(car.id).await.unwrap().has_driver(alice.id));

        let missing = fixture.service.toggle_assignment(999, alice.id).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_car() {
        let fixture = setup_test().await;
        let alfa = manufacturer(&fixture, "Alfa Romeo").await;
        let bob = driver(&fixture, "bob").await;
        let car = fixture
            .service
            .create_car(command("8C", Some(alfa.id), vec![bob.id]))
            .await
            .unwrap();

        fixture.service.delete_car(car.id).await.unwrap();

        assert!(matches!(fixture.service.get_car(car.id).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(fixture.service.delete_car(car.id).await, Err(ServiceError::NotFound { .. })));
    }
}
