use std::sync::Arc;
use tracing::info;

use super::commands::index::FleetSummary;
use super::errors::ServiceResult;
use crate::storage::{CarStorage, DriverStorage, ManufacturerStorage, SessionStorage};

/// Builds the home page counters
#[derive(Clone)]
pub struct IndexService {
    manufacturers: Arc<dyn ManufacturerStorage>,
    drivers: Arc<dyn DriverStorage>,
    cars: Arc<dyn CarStorage>,
    sessions: Arc<dyn SessionStorage>,
}

impl IndexService {
    pub fn new(
        manufacturers: Arc<dyn ManufacturerStorage>,
        drivers: Arc<dyn DriverStorage>,
        cars: Arc<dyn CarStorage>,
        sessions: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            manufacturers,
            drivers,
            cars,
            sessions,
        }
    }

    /// Count the fleet and record one more home page visit for the session
    pub async fn fleet_summary(&self, session_key: &str) -> ServiceResult<FleetSummary> {
        let num_visits = self.sessions.increment_visits(session_key).await?.unwrap_or(0);

        let summary = FleetSummary {
            num_drivers: self.drivers.count_drivers().await?,
            num_cars: self.cars.count_cars().await?,
            num_manufacturers: self.manufacturers.count_manufacturers().await?,
            num_visits,
        };

        info!("Fleet summary: {:?}", summary);
        Ok(summary)
    }
}
