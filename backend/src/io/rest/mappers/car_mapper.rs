use crate::domain::commands::cars::CarCommand;
use crate::domain::models::Car as DomainCar;
use shared::{Car as SharedCar, CarFormRequest, CarListResponse};

use super::{DriverMapper, ManufacturerMapper};

pub struct CarMapper;

impl CarMapper {
    pub fn to_dto(domain: DomainCar) -> SharedCar {
        let display = domain.to_string();
        SharedCar {
            id: domain.id,
            model: domain.model,
            manufacturer: ManufacturerMapper::to_dto(domain.manufacturer),
            drivers: domain.drivers.into_iter().map(DriverMapper::to_dto).collect(),
            display,
        }
    }

    pub fn to_list_dto(cars: Vec<DomainCar>, search: Option<String>) -> CarListResponse {
        CarListResponse {
            car_list: cars.into_iter().map(Self::to_dto).collect(),
            search,
        }
    }

    pub fn to_command(request: CarFormRequest) -> CarCommand {
        CarCommand {
            model: request.model,
            manufacturer_id: request.manufacturer,
            driver_ids: request.drivers,
        }
    }
}
