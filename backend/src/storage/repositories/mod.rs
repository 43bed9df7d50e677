// Repository modules
pub mod car_repository;
pub mod driver_repository;
pub mod manufacturer_repository;
pub mod session_repository;

// Re-export repository types
pub use car_repository::CarRepository;
pub use driver_repository::DriverRepository;
pub use manufacturer_repository::ManufacturerRepository;
pub use session_repository::SessionRepository;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

/// Parse a timestamp column stored as RFC 3339 text
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid timestamp in database: {}", value))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Format a timestamp for storage. The fixed width keeps text comparison chronological
pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}
