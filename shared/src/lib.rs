use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A car manufacturer as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    pub country: String,
    /// Textual identity: "{name} {country}"
    pub display: String,
}

/// A driver account. The password hash never leaves the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Three uppercase letters followed by five digits, e.g. ABC12345
    pub license_number: String,
    /// Human-readable timestamp (RFC 3339)
    pub date_joined: String,
    /// Human-readable timestamp (RFC 3339), absent until the first login
    pub last_login: Option<String>,
    /// Textual identity: "{username} ({first_name} {last_name})"
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub model: String,
    pub manufacturer: Manufacturer,
    pub drivers: Vec<Driver>,
    /// Textual identity: "{manufacturer name} {model}"
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerListResponse {
    pub manufacturer_list: Vec<Manufacturer>,
    /// The effective search term, if the list was filtered
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverListResponse {
    pub driver_list: Vec<Driver>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarListResponse {
    pub car_list: Vec<Car>,
    pub search: Option<String>,
}

/// A driver together with the cars they are assigned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverDetailResponse {
    pub driver: Driver,
    pub cars: Vec<Car>,
}

/// Query parameters of the manufacturer list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerSearchQuery {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverSearchQuery {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarSearchQuery {
    pub model: Option<String>,
}

/// Query parameters of the login endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginQuery {
    /// Local path to continue to after logging in
    pub next: Option<String>,
}

/// Form data for creating or updating a manufacturer.
/// Missing fields deserialize as empty strings so the backend reports them as form errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerFormRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateDriverRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDriverLicenseRequest {
    #[serde(default)]
    pub license_number: String,
}

/// Form data for creating or updating a car
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarFormRequest {
    #[serde(default)]
    pub model: String,
    /// ID of an existing manufacturer
    #[serde(default)]
    pub manufacturer: Option<i64>,
    /// IDs of existing drivers
    #[serde(default)]
    pub drivers: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub driver: Driver,
    pub success_message: String,
}

/// Per-field validation messages. Non-field errors are listed under "__all__".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormErrorResponse {
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Counters shown on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResponse {
    pub num_drivers: i64,
    pub num_cars: i64,
    pub num_manufacturers: i64,
    /// Number of times the home page was visited in the current session
    pub num_visits: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_form_defaults_missing_fields() {
        let request: CarFormRequest = serde_json::from_str(r#"{"model": "X5"}"#).unwrap();

        assert_eq!(request.model, "X5");
        assert_eq!(request.manufacturer, None);
        assert!(request.drivers.is_empty());
    }

    #[test]
    fn test_create_driver_request_defaults_missing_fields() {
        let request: CreateDriverRequest =
            serde_json::from_str(r#"{"username": "dimka", "password1": "secret"}"#).unwrap();

        assert_eq!(request.username, "dimka");
        assert_eq!(request.password1, "secret");
        assert!(request.password2.is_empty());
        assert!(request.license_number.is_empty());
    }

    #[test]
    fn test_form_error_response_shape() {
        let mut errors = BTreeMap::new();
        errors.insert("country".to_string(), vec!["This field is required.".to_string()]);
        let response = FormErrorResponse { errors };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["errors"]["country"][0], "This field is required.");
    }
}
