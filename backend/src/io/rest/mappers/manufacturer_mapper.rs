use crate::domain::commands::manufacturers::ManufacturerCommand;
use crate::domain::models::Manufacturer as DomainManufacturer;
use shared::{Manufacturer as SharedManufacturer, ManufacturerFormRequest, ManufacturerListResponse};

/// Mapper between manufacturer DTOs and the domain model
pub struct ManufacturerMapper;

impl ManufacturerMapper {
    pub fn to_dto(domain: DomainManufacturer) -> SharedManufacturer {
        let display = domain.to_string();
        SharedManufacturer {
            id: domain.id,
            name: domain.name,
            country: domain.country,
            display,
        }
    }

    pub fn to_list_dto(manufacturers: Vec<DomainManufacturer>, search: Option<String>) -> ManufacturerListResponse {
        ManufacturerListResponse {
            manufacturer_list: manufacturers.into_iter().map(Self::to_dto).collect(),
            search,
        }
    }

    pub fn to_command(request: ManufacturerFormRequest) -> ManufacturerCommand {
        ManufacturerCommand {
            name: request.name,
            country: request.country,
        }
    }
}
