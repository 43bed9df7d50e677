//! Conversions between the `shared` wire DTOs and domain models/commands.

pub mod car_mapper;
pub mod driver_mapper;
pub mod manufacturer_mapper;

pub use car_mapper::CarMapper;
pub use driver_mapper::DriverMapper;
pub use manufacturer_mapper::ManufacturerMapper;
