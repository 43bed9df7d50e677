use crate::domain::commands::auth::LoginCommand;
use crate::domain::commands::drivers::{CreateDriverCommand, UpdateLicenseCommand};
use crate::domain::models::{Car as DomainCar, Driver as DomainDriver};
use shared::{
    CreateDriverRequest, Driver as SharedDriver, DriverDetailResponse, DriverListResponse, LoginRequest,
    UpdateDriverLicenseRequest,
};

use super::CarMapper;

/// Mapper between driver DTOs and the domain model.
/// The password hash is never copied into a DTO.
pub struct DriverMapper;

impl DriverMapper {
    pub fn to_dto(domain: DomainDriver) -> SharedDriver {
        let display = domain.to_string();
        SharedDriver {
            id: domain.id,
            username: domain.username,
            first_name: domain.first_name,
            last_name: domain.last_name,
            license_number: domain.license_number,
            date_joined: domain.date_joined.to_rfc3339(),
            last_login: domain.last_login.map(|at| at.to_rfc3339()),
            display,
        }
    }

    pub fn to_list_dto(drivers: Vec<DomainDriver>, search: Option<String>) -> DriverListResponse {
        DriverListResponse {
            driver_list: drivers.into_iter().map(Self::to_dto).collect(),
            search,
        }
    }

    pub fn to_detail_dto(driver: DomainDriver, cars: Vec<DomainCar>) -> DriverDetailResponse {
        DriverDetailResponse {
            driver: Self::to_dto(driver),
            cars: cars.into_iter().map(CarMapper::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateDriverRequest) -> CreateDriverCommand {
        CreateDriverCommand {
            username: request.username,
            password1: request.password1,
            password2: request.password2,
            license_number: request.license_number,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }

    pub fn to_update_license_command(request: UpdateDriverLicenseRequest) -> UpdateLicenseCommand {
        UpdateLicenseCommand {
            license_number: request.license_number,
        }
    }

    pub fn to_login_command(request: LoginRequest) -> LoginCommand {
        LoginCommand {
            username: request.username,
            password: request.password,
        }
    }
}
