use std::fmt;

use super::{Driver, Manufacturer};

/// Domain model for a car, loaded together with its manufacturer and drivers
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: i64,
    pub model: String,
    pub manufacturer: Manufacturer,
    /// Assigned drivers, ordered by username
    pub drivers: Vec<Driver>,
}

impl Car {
    pub fn has_driver(&self, driver_id: i64) -> bool {
        self.drivers.iter().any(|driver| driver.id == driver_id)
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.manufacturer.name, self.model)
    }
}

/// Car fields as written to storage; also used for updates
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub model: String,
    pub manufacturer_id: i64,
    pub driver_ids: Vec<i64>,
}
