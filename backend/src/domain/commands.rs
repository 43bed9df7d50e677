//! Domain-level command types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in the
//! `shared` crate to these internal types.

pub mod manufacturers {
    /// Input for creating or updating a manufacturer.
    #[derive(Debug, Clone, Default)]
    pub struct ManufacturerCommand {
        pub name: String,
        pub country: String,
    }
}

pub mod drivers {
    /// Input for registering a new driver account.
    #[derive(Debug, Clone, Default)]
    pub struct CreateDriverCommand {
        pub username: String,
        pub password1: String,
        pub password2: String,
        pub license_number: String,
        pub first_name: String,
        pub last_name: String,
    }

    /// Input for changing a driver's license number.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateLicenseCommand {
        pub license_number: String,
    }
}

pub mod cars {
    /// Input for creating or updating a car.
    #[derive(Debug, Clone, Default)]
    pub struct CarCommand {
        pub model: String,
        pub manufacturer_id: Option<i64>,
        pub driver_ids: Vec<i64>,
    }

    /// Outcome of toggling the current driver's assignment to a car.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum AssignmentChange {
        Assigned,
        Unassigned,
    }
}

pub mod auth {
    /// Input for logging in.
    #[derive(Debug, Clone, Default)]
    pub struct LoginCommand {
        pub username: String,
        pub password: String,
    }
}

pub mod index {
    /// Fleet counters shown on the home page.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FleetSummary {
        pub num_drivers: i64,
        pub num_cars: i64,
        pub num_manufacturers: i64,
        pub num_visits: i64,
    }
}
